//! Value types carried across the storage surface

use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// A value read from or written to the typed storage layer.
///
/// `Number` is an `f64` so that coercing non-numeric text can propagate
/// `NaN` instead of erroring. `Undefined` and `Null` are distinct: a
/// declared default of `Undefined` is seeded (as the text `undefined`)
/// while `Null` means "do not seed".
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Array(Vec<JsonValue>),
    Object(Map<String, JsonValue>),
}

impl StoreValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, StoreValue::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, StoreValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StoreValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StoreValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            StoreValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map<String, JsonValue>> {
        match self {
            StoreValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Convert into a JSON value for structured encoding.
    ///
    /// `Undefined` and non-finite numbers have no JSON form and collapse to
    /// `null`, matching what `JSON.stringify` does inside documents.
    pub fn into_json(self) -> JsonValue {
        match self {
            StoreValue::Undefined | StoreValue::Null => JsonValue::Null,
            StoreValue::Bool(b) => JsonValue::Bool(b),
            StoreValue::Number(n) => serde_json::Number::from_f64(n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            StoreValue::Text(s) => JsonValue::String(s),
            StoreValue::Array(items) => JsonValue::Array(items),
            StoreValue::Object(map) => JsonValue::Object(map),
        }
    }
}

/// Plain text form, used for every kind except array and object.
impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Undefined => f.write_str("undefined"),
            StoreValue::Null => f.write_str("null"),
            StoreValue::Bool(b) => write!(f, "{b}"),
            StoreValue::Number(n) => write!(f, "{n}"),
            StoreValue::Text(s) => f.write_str(s),
            StoreValue::Array(items) => {
                let json = JsonValue::Array(items.clone());
                f.write_str(&serde_json::to_string(&json).unwrap_or_else(|_| "[]".to_string()))
            }
            StoreValue::Object(map) => {
                let json = JsonValue::Object(map.clone());
                f.write_str(&serde_json::to_string(&json).unwrap_or_else(|_| "{}".to_string()))
            }
        }
    }
}

impl From<JsonValue> for StoreValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => StoreValue::Null,
            JsonValue::Bool(b) => StoreValue::Bool(b),
            JsonValue::Number(n) => n
                .as_f64()
                .map(StoreValue::Number)
                .unwrap_or_else(|| StoreValue::Text(n.to_string())),
            JsonValue::String(s) => StoreValue::Text(s),
            JsonValue::Array(items) => StoreValue::Array(items),
            JsonValue::Object(map) => StoreValue::Object(map),
        }
    }
}

impl From<bool> for StoreValue {
    fn from(b: bool) -> Self {
        StoreValue::Bool(b)
    }
}

impl From<f64> for StoreValue {
    fn from(n: f64) -> Self {
        StoreValue::Number(n)
    }
}

impl From<i32> for StoreValue {
    fn from(n: i32) -> Self {
        StoreValue::Number(n as f64)
    }
}

impl From<i64> for StoreValue {
    fn from(n: i64) -> Self {
        StoreValue::Number(n as f64)
    }
}

impl From<&str> for StoreValue {
    fn from(s: &str) -> Self {
        StoreValue::Text(s.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(s: String) -> Self {
        StoreValue::Text(s)
    }
}

impl From<Vec<JsonValue>> for StoreValue {
    fn from(items: Vec<JsonValue>) -> Self {
        StoreValue::Array(items)
    }
}

impl From<Map<String, JsonValue>> for StoreValue {
    fn from(map: Map<String, JsonValue>) -> Self {
        StoreValue::Object(map)
    }
}

impl<T: Into<StoreValue>> From<Option<T>> for StoreValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => StoreValue::Null,
        }
    }
}
