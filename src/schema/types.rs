//! Schema types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON Schema primitive type names used by the Matomo streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Object,
    Array,
    Null,
}

/// A `type` keyword: one name, or a list such as `["integer", "null"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonTypeOrArray {
    Single(JsonType),
    Multiple(Vec<JsonType>),
}

impl JsonTypeOrArray {
    /// `[t, "null"]`
    pub fn nullable(t: JsonType) -> Self {
        Self::Single(t).make_nullable()
    }

    /// Whether `null` is accepted
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Single(t) => *t == JsonType::Null,
            Self::Multiple(types) => types.contains(&JsonType::Null),
        }
    }

    /// Accept `null` in addition to the current types
    #[must_use]
    pub fn make_nullable(self) -> Self {
        match self {
            nullable if nullable.is_nullable() => nullable,
            Self::Single(t) => Self::Multiple(vec![t, JsonType::Null]),
            Self::Multiple(mut types) => {
                types.push(JsonType::Null);
                Self::Multiple(types)
            }
        }
    }
}

/// Schema of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub json_type: JsonTypeOrArray,

    /// Fields of an object value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaProperty>>,

    /// Element schema of an array value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaProperty>>,
}

impl SchemaProperty {
    fn of(json_type: JsonTypeOrArray) -> Self {
        Self {
            json_type,
            properties: None,
            items: None,
        }
    }

    /// A scalar field that may be null
    pub fn nullable(json_type: JsonType) -> Self {
        Self::of(JsonTypeOrArray::nullable(json_type))
    }

    /// An object with the given fields
    pub fn object(properties: BTreeMap<String, SchemaProperty>) -> Self {
        Self {
            properties: Some(properties),
            ..Self::of(JsonTypeOrArray::Single(JsonType::Object))
        }
    }

    /// An array of `items`
    pub fn array(items: SchemaProperty) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(JsonTypeOrArray::Single(JsonType::Array))
        }
    }

    /// Allow null for this field
    #[must_use]
    pub fn into_nullable(mut self) -> Self {
        self.json_type = self.json_type.make_nullable();
        self
    }

    pub fn is_nullable(&self) -> bool {
        self.json_type.is_nullable()
    }
}

/// Top-level schema of a stream's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchema {
    #[serde(rename = "type")]
    pub json_type: JsonType,

    #[serde(default)]
    pub properties: BTreeMap<String, SchemaProperty>,
}

impl Default for JsonSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSchema {
    /// An object schema with no fields
    pub fn new() -> Self {
        Self {
            json_type: JsonType::Object,
            properties: BTreeMap::new(),
        }
    }

    /// Declare a field
    pub fn add_property(&mut self, name: &str, property: SchemaProperty) {
        self.properties.insert(name.to_string(), property);
    }
}
