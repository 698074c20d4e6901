//! Location and item records on top of a store.
//!
//! Layouts under a prefix `P`:
//! ```text
//! P.World  P.X  P.Y  P.Z  P.Yaw  P.Pitch
//! P.Name  P.Material  P.Amount  [P.ItemFlags]  [P.Lore]
//! ```
//! Bracketed entries are written only when non-empty; readers treat the
//! missing sub-path as the empty collection.

use glam::DVec3;
use outpost_common::{
    COLOR_MARKER, IdentifierKind, Item, ItemFlag, Location, Material, Text, UnknownIdentifier,
    translate_color_codes,
};

use crate::store::Store;

impl Store {
    /// Write the six location fields under `path`.
    ///
    /// With `overwrite` false an already-populated `path` is left as-is
    /// (whole-prefix check, not per-field). Saves unconditionally, so any
    /// pending unrelated changes are flushed either way.
    pub fn set_location(&mut self, path: &str, location: &Location, overwrite: bool) {
        if overwrite || !self.contains(path) {
            self.set(&sub(path, "World"), location.world.as_str());
            self.set(&sub(path, "X"), location.position.x);
            self.set(&sub(path, "Y"), location.position.y);
            self.set(&sub(path, "Z"), location.position.z);
            self.set(&sub(path, "Yaw"), f64::from(location.yaw));
            self.set(&sub(path, "Pitch"), f64::from(location.pitch));
        }
        self.save();
    }

    /// Read a location back from the six conventional sub-paths.
    ///
    /// `None` only when nothing at all is stored under `path`; individually
    /// missing leaves fall back to their sentinels. The world identifier is
    /// not resolved against live worlds here.
    pub fn get_location(&self, path: &str) -> Option<Location> {
        if !self.contains(path) {
            return None;
        }
        Some(Location {
            world: self.get_string(&sub(path, "World")).unwrap_or_default(),
            position: DVec3::new(
                self.get_double(&sub(path, "X")),
                self.get_double(&sub(path, "Y")),
                self.get_double(&sub(path, "Z")),
            ),
            yaw: self.get_double(&sub(path, "Yaw")) as f32,
            pitch: self.get_double(&sub(path, "Pitch")) as f32,
        })
    }

    /// Write an item record under `path` and save.
    ///
    /// The display name is stored as its plain text; a client-resolved name
    /// stores as the empty string. Rich lore lines are dropped, and flags or
    /// lore that end up empty are not written at all.
    pub fn set_item(&mut self, path: &str, item: &Item) {
        self.set(&sub(path, "Name"), item.name.as_plain().unwrap_or(""));
        self.set(&sub(path, "Material"), item.material.as_str());
        self.set(&sub(path, "Amount"), item.amount);

        let flags: Vec<String> = item.flags.iter().map(|f| f.as_str().to_owned()).collect();
        if !flags.is_empty() {
            self.set(&sub(path, "ItemFlags"), flags);
        }
        let lore: Vec<String> = item
            .lore
            .iter()
            .filter_map(|line| line.as_plain().map(str::to_owned))
            .collect();
        if !lore.is_empty() {
            self.set(&sub(path, "Lore"), lore);
        }

        self.save();
    }

    /// Read an item record.
    ///
    /// The stored material is required: a missing or unknown identifier
    /// fails with [`UnknownIdentifier`], as does an unknown flag. A zero
    /// stored amount keeps the default quantity of one; name and lore are
    /// read through color-code translation.
    pub fn get_item(&self, path: &str) -> Result<Item, UnknownIdentifier> {
        let material = match self.get_string(&sub(path, "Material")) {
            Some(value) => Material::resolve(&value)?,
            None => return Err(UnknownIdentifier::new(IdentifierKind::Material, "")),
        };

        let mut item = Item::new(material);
        let amount = self.get_int(&sub(path, "Amount"));
        if amount != 0 {
            item.amount = amount;
        }
        if let Some(name) = self.get_formatted(&sub(path, "Name")) {
            item.name = Text::Plain(name);
        }
        for value in self.get_string_list(&sub(path, "ItemFlags")).unwrap_or_default() {
            item.flags.insert(ItemFlag::resolve(&value)?);
        }
        item.lore = self
            .get_string_list(&sub(path, "Lore"))
            .unwrap_or_default()
            .into_iter()
            .map(|line| Text::Plain(translate_color_codes(COLOR_MARKER, &line)))
            .collect();

        Ok(item)
    }
}

/// Join a prefix and a record key.
fn sub(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}
