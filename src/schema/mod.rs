//! JSON Schema types
//!
//! Used to declare stream schemas in the catalog and the `SCHEMA`
//! messages that precede each stream's records.

mod types;

pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
