//! Field mapping produced by one parse pass

use std::collections::HashMap;

use serde::Serialize;

/// How a placeholder renders a field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Value is literal text
    Plain,
    /// Value contains line/paragraph break markers to be rendered as markup
    Rich,
}

/// One extracted field value with its declared render mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValue {
    pub value: String,
    pub mode: RenderMode,
}

impl FieldValue {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mode: RenderMode::Plain,
        }
    }

    pub fn rich(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            mode: RenderMode::Rich,
        }
    }
}

/// Flat mapping from field key to extracted value.
///
/// Rebuilt in full on every cycle; a key absent here simply means "no update
/// for that placeholder". Nothing is merged across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentMap {
    fields: HashMap<String, FieldValue>,
}

impl ContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
