//! Stream definitions and the discovery catalog

use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named analytics stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamDefinition {
    /// Stream name
    pub name: String,
    /// Path appended to the API base URL (empty for the base URL itself)
    #[serde(default)]
    pub path: String,
    /// Primary key fields
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// Field records are sorted by, for incremental extraction
    #[serde(default)]
    pub replication_key: Option<String>,
    /// Record schema
    pub schema: JsonSchema,
}

impl StreamDefinition {
    /// Create a stream with an empty path and no replication key
    pub fn new(name: impl Into<String>, schema: JsonSchema) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            primary_keys: Vec::new(),
            replication_key: None,
            schema,
        }
    }

    /// Set the primary keys
    #[must_use]
    pub fn with_primary_keys(mut self, keys: &[&str]) -> Self {
        self.primary_keys = keys.iter().map(|k| (*k).to_string()).collect();
        self
    }

    /// Set the replication key
    #[must_use]
    pub fn with_replication_key(mut self, key: impl Into<String>) -> Self {
        self.replication_key = Some(key.into());
        self
    }

    /// Set the URL path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Catalog entry for this stream
    pub fn catalog_entry(&self) -> CatalogEntry {
        CatalogEntry {
            tap_stream_id: self.name.clone(),
            stream: self.name.clone(),
            key_properties: self.primary_keys.clone(),
            schema: self.schema.clone(),
            replication_key: self.replication_key.clone(),
        }
    }
}

/// One stream in the discovery catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tap_stream_id: String,
    pub stream: String,
    pub key_properties: Vec<String>,
    pub schema: JsonSchema,
    #[serde(default)]
    pub replication_key: Option<String>,
}

/// Discovery catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Catalog of every built-in stream
    pub fn discover() -> Self {
        Self::from_streams(&super::all_streams())
    }

    /// Catalog of the given streams
    pub fn from_streams(streams: &[StreamDefinition]) -> Self {
        Self {
            streams: streams.iter().map(StreamDefinition::catalog_entry).collect(),
        }
    }

    /// Stream names in catalog order
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.stream.as_str()).collect()
    }
}

/// Resolve stream names against the built-in streams
///
/// An empty selection means every stream.
pub fn select_streams(names: &[String]) -> Result<Vec<StreamDefinition>> {
    let available = super::all_streams();
    if names.is_empty() {
        return Ok(available);
    }

    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|s| s.name == *name)
                .cloned()
                .ok_or_else(|| Error::StreamNotFound {
                    stream: name.clone(),
                })
        })
        .collect()
}
