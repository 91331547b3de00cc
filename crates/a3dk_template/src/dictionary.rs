//! The flat key-value form of a descriptor, as templates see it.

use crate::error::TemplateError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Key under which descriptors list the source directories to import.
pub const SOURCES_KEY: &str = "SOURCES";

/// An immutable mapping from template variable names to values.
///
/// Values are scalars (strings, numbers, booleans) or lists of nested
/// mappings iterated by `generate` blocks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dictionary {
    entries: Map<String, Value>,
}

impl Dictionary {
    /// Serializes a typed descriptor into a dictionary.
    ///
    /// The descriptor must serialize to a record (a struct or map).
    pub fn from_descriptor<T: Serialize>(descriptor: &T) -> Result<Self, TemplateError> {
        match serde_json::to_value(descriptor) {
            Ok(Value::Object(entries)) => Ok(Self { entries }),
            Ok(other) => Err(TemplateError::Descriptor(format!(
                "expected a record, found {other}"
            ))),
            Err(e) => Err(TemplateError::Descriptor(e.to_string())),
        }
    }

    /// Returns the value bound to `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns the underlying top-level mapping.
    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Source directories listed under `SOURCES`, if any.
    pub fn sources(&self) -> Vec<PathBuf> {
        self.entries
            .get(SOURCES_KEY)
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Formats a scalar value the way it is spliced into template text.
///
/// Returns `None` for lists and mappings.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
