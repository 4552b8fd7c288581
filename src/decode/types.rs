//! Output record type

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One analytics row (a visit, an action summary, ...)
///
/// Numbers keep the exact digits the API sent; use [`Record::get_decimal`]
/// for arithmetic on monetary or metric fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(JsonObject);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a field
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    /// Get an integer field
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(JsonValue::as_i64)
    }

    /// Get a string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(JsonValue::as_str)
    }

    /// Get a numeric field (or numeric string) as an exact decimal
    pub fn get_decimal(&self, field: &str) -> Option<Decimal> {
        match self.0.get(field)? {
            JsonValue::Number(n) => parse_decimal(&n.to_string()),
            JsonValue::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
    }

    /// Set a field
    pub fn insert(&mut self, field: impl Into<String>, value: JsonValue) {
        self.0.insert(field.into(), value);
    }

    /// Field names in source order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying object
    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    /// Take the underlying object
    pub fn into_inner(self) -> JsonObject {
        self.0
    }
}

impl From<JsonObject> for Record {
    fn from(map: JsonObject) -> Self {
        Self(map)
    }
}

impl TryFrom<JsonValue> for Record {
    type Error = Error;

    fn try_from(value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(map) => Ok(Self(map)),
            other => Err(Error::decode(format!(
                "expected a JSON object record, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Short name of a JSON value's kind, for error messages
pub(crate) fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
