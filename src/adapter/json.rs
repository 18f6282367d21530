use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use super::DocumentAdapter;
use super::Projection;
use crate::Error;
use crate::PathKey;
use crate::Result;

/// [`DocumentAdapter`] over `serde_json::Value`.
///
/// `Value::Null` is the empty sentinel. Objects are addressed by key and
/// arrays by decimal index; anything else resolves to `Null`.
#[derive(Debug, Clone, Copy)]
pub struct JsonAdapter {
    writable: bool,
}

impl Default for JsonAdapter {
    fn default() -> Self {
        Self { writable: true }
    }
}

impl JsonAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter for documents that are only ever replaced wholesale.
    ///
    /// `set` is a no-op, so `replace_at` notifies observers of the targeted
    /// path without changing the stored document.
    pub fn read_only() -> Self {
        Self { writable: false }
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Parses JSON text into a document value.
    pub fn parse(text: &str) -> Result<Value> {
        Ok(serde_json::from_str(text)?)
    }
}

fn child<'a>(
    value: &'a Value,
    segment: &str,
) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn child_mut<'a>(
    value: &'a mut Value,
    segment: &str,
) -> Option<&'a mut Value> {
    // Scalars and nulls on the way down become objects
    if !value.is_object() && !value.is_array() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Array(items) => segment.parse::<usize>().ok().and_then(move |i| items.get_mut(i)),
        Value::Object(map) => Some(map.entry(segment).or_insert(Value::Null)),
        _ => None,
    }
}

impl DocumentAdapter for JsonAdapter {
    type Value = Value;

    fn get(
        &self,
        document: &Value,
        path: &PathKey,
    ) -> Value {
        let mut current = document;
        for segment in path {
            match child(current, segment) {
                Some(next) => current = next,
                None => return Value::Null,
            }
        }
        current.clone()
    }

    fn get_child(
        &self,
        document: &Value,
        segment: &str,
    ) -> Value {
        child(document, segment).cloned().unwrap_or(Value::Null)
    }

    fn set(
        &self,
        document: &mut Value,
        path: &PathKey,
        value: Value,
    ) -> bool {
        if !self.writable {
            return false;
        }
        let mut current = document;
        for segment in path {
            match child_mut(current, segment) {
                Some(next) => current = next,
                None => return false,
            }
        }
        *current = value;
        true
    }

    fn equal(
        &self,
        a: &Value,
        b: &Value,
    ) -> bool {
        a == b
    }

    fn empty(
        &self,
        value: &Value,
    ) -> bool {
        value.is_null()
    }
}

impl<T: DeserializeOwned> Projection<T> for JsonAdapter {
    fn project(
        &self,
        path: &PathKey,
        value: Value,
    ) -> Result<T> {
        serde_json::from_value(value).map_err(|e| Error::Projection {
            path: path.to_string(),
            source: Box::new(e),
        })
    }
}
