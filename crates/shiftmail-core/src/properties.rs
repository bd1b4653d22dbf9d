//! Property maps and the `ReadWritable` contract.
//!
//! Every persisted entity exposes its state as an ordered map of named
//! values and can be rebuilt from such a map. Decoding is tolerant: a
//! missing key, a `Null` value, or a value of the wrong type falls back to
//! the field's default instead of failing, so stored data written by an
//! older or newer schema still loads.

use crate::csv;
use crate::error::ModelError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single property value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyValue {
    #[default]
    Null,
    Text(String),
    Bool(bool),
    Integer(i64),
    Map(PropertyMap),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Integer(n) => write!(f, "{n}"),
            PropertyValue::Map(map) => write!(f, "{map}"),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(value: PropertyMap) -> Self {
        PropertyValue::Map(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

/// Insertion-ordered mapping from property name to value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(IndexMap<String, PropertyValue>);

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.0.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Text field: any non-null value is taken through its display form.
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            None | Some(PropertyValue::Null) => String::new(),
            Some(value) => value.to_string(),
        }
    }

    /// Boolean field: accepts `Bool`, "true"/"false" text and integers.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(PropertyValue::Bool(b)) => *b,
            Some(PropertyValue::Integer(n)) => *n != 0,
            Some(PropertyValue::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Integer field: accepts `Integer` and numeric text, else `default`.
    pub fn integer(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(PropertyValue::Integer(n)) => *n,
            Some(PropertyValue::Text(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Nested entity field. Anything other than a map reads as absent.
    pub fn map(&self, key: &str) -> Option<&PropertyMap> {
        match self.get(key) {
            Some(PropertyValue::Map(map)) => Some(map),
            _ => None,
        }
    }

    /// List field stored as a single CSV record.
    ///
    /// A record that does not parse is kept as one element rather than lost.
    pub fn list(&self, key: &str) -> Vec<String> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Vec::new();
        }
        csv::parse_record(&raw).unwrap_or_else(|err| {
            tracing::warn!("Malformed list in property '{}': {}", key, err);
            vec![raw]
        })
    }
}

impl fmt::Display for PropertyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for PropertyMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Symmetric, storage-agnostic serialization contract for a domain entity.
pub trait ReadWritable: Sized + Clone + PartialEq + fmt::Debug {
    /// Human-readable type name used in logs and errors.
    const TYPE_NAME: &'static str;

    /// Canonical property names, in serialization order.
    const FIELDS: &'static [&'static str];

    /// Current field values keyed exactly by [`Self::FIELDS`], in order.
    fn read_writable_properties(&self) -> PropertyMap;

    /// Rebuild an entity, substituting defaults for anything missing or mistyped.
    fn from_properties(properties: &PropertyMap) -> Self;

    /// Factory entry point for dynamically sourced maps.
    fn construct_read_writable(properties: Option<&PropertyMap>) -> Result<Self, ModelError> {
        properties
            .map(Self::from_properties)
            .ok_or(ModelError::NullArgument("properties"))
    }

    /// Decode one stored element.
    fn from_value(value: &PropertyValue) -> Result<Self, ModelError> {
        match value {
            PropertyValue::Null => Err(ModelError::NullArgument("element")),
            PropertyValue::Map(map) => Ok(Self::from_properties(map)),
            other => Err(ModelError::IllegalArgument(format!(
                "expected a {} property map, found '{}'",
                Self::TYPE_NAME,
                other
            ))),
        }
    }
}
