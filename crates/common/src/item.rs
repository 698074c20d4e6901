use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::Text;

/// Which closed identifier set a lookup ran against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentifierKind {
    Material,
    ItemFlag,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material => f.write_str("material"),
            Self::ItemFlag => f.write_str("item flag"),
        }
    }
}

/// A stored identifier that does not resolve against its closed set.
///
/// Surfaces when reading items back out of a config store; it means the
/// stored data is corrupt or written by an incompatible version, so callers
/// must handle it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} identifier {value:?}")]
pub struct UnknownIdentifier {
    pub kind: IdentifierKind,
    pub value: String,
}

impl UnknownIdentifier {
    pub fn new(kind: IdentifierKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Every material an item stack can be made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Material {
    Stone,
    Cobblestone,
    Dirt,
    GrassBlock,
    Sand,
    Glass,
    OakLog,
    OakPlanks,
    Torch,
    Chest,
    IronIngot,
    GoldIngot,
    Diamond,
    Emerald,
    Stick,
    Paper,
    Book,
    Compass,
    Clock,
    Bow,
    Arrow,
    IronSword,
    DiamondSword,
    IronPickaxe,
    DiamondPickaxe,
    GoldenApple,
    EnderPearl,
}

impl Material {
    pub const ALL: &'static [Material] = &[
        Material::Stone,
        Material::Cobblestone,
        Material::Dirt,
        Material::GrassBlock,
        Material::Sand,
        Material::Glass,
        Material::OakLog,
        Material::OakPlanks,
        Material::Torch,
        Material::Chest,
        Material::IronIngot,
        Material::GoldIngot,
        Material::Diamond,
        Material::Emerald,
        Material::Stick,
        Material::Paper,
        Material::Book,
        Material::Compass,
        Material::Clock,
        Material::Bow,
        Material::Arrow,
        Material::IronSword,
        Material::DiamondSword,
        Material::IronPickaxe,
        Material::DiamondPickaxe,
        Material::GoldenApple,
        Material::EnderPearl,
    ];

    /// The identifier written into configs and shown in commands.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stone => "STONE",
            Self::Cobblestone => "COBBLESTONE",
            Self::Dirt => "DIRT",
            Self::GrassBlock => "GRASS_BLOCK",
            Self::Sand => "SAND",
            Self::Glass => "GLASS",
            Self::OakLog => "OAK_LOG",
            Self::OakPlanks => "OAK_PLANKS",
            Self::Torch => "TORCH",
            Self::Chest => "CHEST",
            Self::IronIngot => "IRON_INGOT",
            Self::GoldIngot => "GOLD_INGOT",
            Self::Diamond => "DIAMOND",
            Self::Emerald => "EMERALD",
            Self::Stick => "STICK",
            Self::Paper => "PAPER",
            Self::Book => "BOOK",
            Self::Compass => "COMPASS",
            Self::Clock => "CLOCK",
            Self::Bow => "BOW",
            Self::Arrow => "ARROW",
            Self::IronSword => "IRON_SWORD",
            Self::DiamondSword => "DIAMOND_SWORD",
            Self::IronPickaxe => "IRON_PICKAXE",
            Self::DiamondPickaxe => "DIAMOND_PICKAXE",
            Self::GoldenApple => "GOLDEN_APPLE",
            Self::EnderPearl => "ENDER_PEARL",
        }
    }

    /// Fallible lookup from a stored identifier.
    pub fn resolve(value: &str) -> Result<Self, UnknownIdentifier> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == value)
            .ok_or_else(|| UnknownIdentifier::new(IdentifierKind::Material, value))
    }
}

/// Behavior flags an item stack can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemFlag {
    HideEnchants,
    HideAttributes,
    HideUnbreakable,
    HideDyes,
    Soulbound,
    Untradeable,
}

impl ItemFlag {
    pub const ALL: &'static [ItemFlag] = &[
        ItemFlag::HideEnchants,
        ItemFlag::HideAttributes,
        ItemFlag::HideUnbreakable,
        ItemFlag::HideDyes,
        ItemFlag::Soulbound,
        ItemFlag::Untradeable,
    ];

    /// The identifier written into configs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HideEnchants => "HIDE_ENCHANTS",
            Self::HideAttributes => "HIDE_ATTRIBUTES",
            Self::HideUnbreakable => "HIDE_UNBREAKABLE",
            Self::HideDyes => "HIDE_DYES",
            Self::Soulbound => "SOULBOUND",
            Self::Untradeable => "UNTRADEABLE",
        }
    }

    /// Fallible lookup from a stored identifier.
    pub fn resolve(value: &str) -> Result<Self, UnknownIdentifier> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == value)
            .ok_or_else(|| UnknownIdentifier::new(IdentifierKind::ItemFlag, value))
    }
}

/// An inventory item description.
///
/// `flags` and `lore` are optional extras: empty collections mean "not
/// present" and are omitted from serialized forms entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub material: Material,
    pub name: Text,
    pub amount: i32,
    pub flags: BTreeSet<ItemFlag>,
    pub lore: Vec<Text>,
}

impl Item {
    /// A single unnamed item of the given material.
    pub fn new(material: Material) -> Self {
        Self {
            material,
            name: Text::default(),
            amount: 1,
            flags: BTreeSet::new(),
            lore: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_identifiers_resolve_back() {
        for m in Material::ALL {
            assert_eq!(Material::resolve(m.as_str()), Ok(*m));
        }
    }

    #[test]
    fn material_unknown_identifier_is_typed() {
        let err = Material::resolve("BEDROCK").unwrap_err();
        assert_eq!(err.kind, IdentifierKind::Material);
        assert_eq!(err.value, "BEDROCK");
        assert_eq!(err.to_string(), "unknown material identifier \"BEDROCK\"");
    }

    #[test]
    fn item_flag_identifiers_resolve_back() {
        for f in ItemFlag::ALL {
            assert_eq!(ItemFlag::resolve(f.as_str()), Ok(*f));
        }
        assert!(ItemFlag::resolve("GLOWING").is_err());
    }

    #[test]
    fn new_item_holds_one() {
        let item = Item::new(Material::EnderPearl);
        assert_eq!(item.amount, 1);
        assert!(item.flags.is_empty());
        assert!(item.lore.is_empty());
        assert_eq!(item.name.as_plain(), Some(""));
    }
}
