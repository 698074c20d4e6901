//! The closed set of value kinds a store understands, and the document tree
//! they live in.
//!
//! Coercion is explicit per kind rather than delegated to the YAML library:
//! scalars render to strings, numeric kinds convert between each other,
//! booleans are strict, and collections never coerce to scalars.

use std::collections::BTreeMap;

/// A single stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// The absent-equivalent. Setting a path to `Null` removes it, and a
    /// loaded null leaf reads as absent.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// String coercion: scalars in display form, collections do not coerce.
    pub fn as_string(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Integer coercion: floats truncate toward zero, strings parse or
    /// give 0, everything else is 0.
    pub fn as_long(&self) -> i64 {
        match self {
            Self::Int(i) => *i,
            Self::Float(f) => *f as i64,
            Self::Str(s) => s.parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Float coercion: integers widen, strings parse or give 0.0.
    pub fn as_double(&self) -> f64 {
        match self {
            Self::Float(f) => *f,
            Self::Int(i) => *i as f64,
            Self::Str(s) => s.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Boolean coercion: strict, only a stored boolean can be true.
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Bool(true))
    }

    /// String-list coercion: scalar elements render as strings, nulls and
    /// nested collections inside the list are skipped. Non-lists do not
    /// coerce.
    pub fn as_string_list(&self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(items.iter().filter_map(Value::as_string).collect()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::List(v.into_iter().map(Value::Str).collect())
    }
}

/// The in-memory tree of named entries backing a store.
///
/// Every level is an ordered map, so serialization is deterministic. Paths
/// are dot-delimited and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: BTreeMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a path. `None` when any segment is missing, an intermediate
    /// segment is not a map, or the leaf is null.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            match current {
                Value::Map(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        (!current.is_null()).then_some(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Write a path, creating intermediate maps and replacing any non-map
    /// intermediate. Setting `Null` removes the entry instead.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        if value.is_null() {
            self.remove(path);
        } else {
            set_in(&mut self.root, path, value);
        }
    }

    /// Remove a path, returning the value that was there. Emptied
    /// intermediate maps are left in place.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        remove_in(&mut self.root, path)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The whole tree as a YAML mapping.
    pub fn to_yaml(&self) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(
            self.root
                .iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), value_to_yaml(v)))
                .collect(),
        )
    }

    /// Build a document from parsed YAML. A null root is the empty document;
    /// any other non-mapping root is `None`.
    pub fn from_yaml(value: serde_yaml::Value) -> Option<Self> {
        match value {
            serde_yaml::Value::Null => Some(Self::default()),
            serde_yaml::Value::Mapping(map) => Some(Self {
                root: yaml_map_to_tree(map),
            }),
            _ => None,
        }
    }
}

fn set_in(map: &mut BTreeMap<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_owned(), value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.to_owned())
                .or_insert_with(|| Value::Map(BTreeMap::new()));
            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(BTreeMap::new());
            }
            if let Value::Map(inner) = entry {
                set_in(inner, rest, value);
            }
        }
    }
}

fn remove_in(map: &mut BTreeMap<String, Value>, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => map.remove(path),
        Some((head, rest)) => match map.get_mut(head)? {
            Value::Map(inner) => remove_in(inner, rest),
            _ => None,
        },
    }
}

fn yaml_map_to_tree(map: serde_yaml::Mapping) -> BTreeMap<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| Some((yaml_key_to_string(&key)?, yaml_to_value(value))))
        .collect()
}

/// Mapping keys are stringified from scalars; complex keys are dropped.
fn yaml_key_to_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn yaml_to_value(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                Value::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        serde_yaml::Value::String(s) => Value::Str(s),
        serde_yaml::Value::Sequence(items) => {
            Value::List(items.into_iter().map(yaml_to_value).collect())
        }
        serde_yaml::Value::Mapping(map) => Value::Map(yaml_map_to_tree(map)),
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(tagged.value),
    }
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Int(i) => serde_yaml::Value::Number((*i).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::Str(s) => serde_yaml::Value::String(s.clone()),
        Value::List(items) => {
            serde_yaml::Value::Sequence(items.iter().map(value_to_yaml).collect())
        }
        Value::Map(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), value_to_yaml(v)))
                .collect(),
        ),
    }
}
