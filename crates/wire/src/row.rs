// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed access to upstream row objects.
//!
//! Rows arrive as JSON objects. Entity ids are 64-bit numbers, timestamps
//! are `{"__timestamp_micros_since_unix_epoch__": n}` objects, and sum
//! types (options, enums) are `[tag, value]` arrays.

use cw_core::EntityId;
use serde_json::{Map, Value};
use thiserror::Error;

/// Key wrapping a microsecond timestamp.
pub const TIMESTAMP_KEY: &str = "__timestamp_micros_since_unix_epoch__";

/// A row is missing an expected field or has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("field `{0}` has an unexpected type")]
    WrongType(String),
    #[error("row is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn from_value(value: Value) -> Result<Self, DataShapeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DataShapeError::NotAnObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn require(&self, key: &str) -> Result<&Value, DataShapeError> {
        self.get(key).ok_or_else(|| DataShapeError::MissingField(key.to_string()))
    }

    /// Entity id given as a number or a decimal string.
    pub fn entity_id(&self, key: &str) -> Result<EntityId, DataShapeError> {
        match self.require(key)? {
            Value::Number(n) => Ok(EntityId::from(n.to_string())),
            Value::String(s) if !s.is_empty() => Ok(EntityId::from(s.as_str())),
            _ => Err(DataShapeError::WrongType(key.to_string())),
        }
    }

    pub fn i64(&self, key: &str) -> Result<i64, DataShapeError> {
        let value = self.require(key)?;
        as_i64(value).ok_or_else(|| DataShapeError::WrongType(key.to_string()))
    }

    pub fn i64_or(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(as_i64).unwrap_or(default)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn str(&self, key: &str) -> Result<&str, DataShapeError> {
        self.require(key)?.as_str().ok_or_else(|| DataShapeError::WrongType(key.to_string()))
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or(default)
    }

    pub fn array(&self, key: &str) -> &[Value] {
        self.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Microsecond timestamp, accepting the wrapped object, a `[tag, object]`
    /// option, or a bare number. Zero and absent both read as `None`.
    pub fn timestamp_micros(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(timestamp_micros).filter(|t| *t != 0)
    }

    /// First element of a `[tag, ...]` sum-type array.
    pub fn tag(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_array()?.first().and_then(as_i64)
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Integer from a JSON number, a float with no fraction, or a decimal string.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn timestamp_micros(value: &Value) -> Option<i64> {
    match value {
        Value::Object(map) => map.get(TIMESTAMP_KEY).and_then(as_i64),
        Value::Array(items) => items.get(1).and_then(timestamp_micros),
        other => as_i64(other),
    }
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
