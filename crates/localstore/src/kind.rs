//! Property kinds and their text coercion
//!
//! Every declared property carries one `Kind`. The kind selects the
//! serialize/deserialize pair used between typed values and the plain
//! strings the backend stores.

use crate::value::StoreValue;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The closed set of value categories a declared property can coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }

    /// Coerce raw stored text into a typed value.
    ///
    /// Malformed structured text never errors: array-kind falls back to an
    /// empty array, object-kind to an empty map. A boolean is `true` only
    /// for the literal text `true`, and a number that fails to parse is
    /// `NaN`.
    pub fn decode(&self, raw: &str) -> StoreValue {
        match self {
            Kind::String => StoreValue::Text(raw.to_string()),
            Kind::Number => StoreValue::Number(raw.trim().parse().unwrap_or(f64::NAN)),
            Kind::Boolean => StoreValue::Bool(raw == "true"),
            Kind::Array => match serde_json::from_str::<JsonValue>(raw) {
                Ok(JsonValue::Array(items)) => StoreValue::Array(items),
                _ => StoreValue::Array(Vec::new()),
            },
            // A successful decode is returned whatever its shape; only a
            // failed decode falls back to the empty map.
            Kind::Object => match serde_json::from_str::<JsonValue>(raw) {
                Ok(value) => StoreValue::from(value),
                Err(_) => StoreValue::Object(serde_json::Map::new()),
            },
        }
    }

    /// Serialize a typed value into its stored text form.
    pub fn encode(&self, value: &StoreValue) -> String {
        match self {
            Kind::Array | Kind::Object => match value {
                StoreValue::Undefined => "undefined".to_string(),
                other => serde_json::to_string(&other.clone().into_json())
                    .unwrap_or_else(|_| "null".to_string()),
            },
            _ => value.to_string(),
        }
    }
}
