//! Engine types
//!
//! Message types and configuration for the sync engine.

use crate::decode::Record;
use crate::pagination::Cursor;
use crate::schema::JsonSchema;
use crate::streams::StreamDefinition;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A Singer message emitted during sync
///
/// Serialize-only: records carry arbitrary precision numbers, which do not
/// survive the buffering an internally tagged deserializer would need.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, sent once before the stream's records
    Schema {
        /// Stream name
        stream: String,
        /// Record schema
        schema: JsonSchema,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        bookmark_properties: Vec<String>,
    },
    /// One output record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: Record,
        /// When the page holding the record was fetched
        time_extracted: DateTime<Utc>,
    },
}

impl Message {
    /// Create the schema message for a stream
    pub fn schema(stream: &StreamDefinition) -> Self {
        Self::Schema {
            stream: stream.name.clone(),
            schema: stream.schema.clone(),
            key_properties: stream.primary_keys.clone(),
            bookmark_properties: stream.replication_key.iter().cloned().collect(),
        }
    }

    /// Create a record message
    pub fn record(stream: impl Into<String>, record: Record, time_extracted: DateTime<Utc>) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted,
        }
    }

    /// Stream this message belongs to
    pub fn stream(&self) -> &str {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => stream,
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number within the stream
    pub number: usize,
    /// Cursor the page was requested with
    pub cursor: Option<Cursor>,
    /// Records in source order
    pub records: Vec<Record>,
    /// When the response arrived
    pub fetched_at: DateTime<Utc>,
}

/// Configuration for sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Stop after this many pages per stream
    pub max_pages: Option<usize>,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }

    /// Fold another run's counters into these
    pub fn merge(&mut self, other: &SyncStats) {
        self.records_synced += other.records_synced;
        self.pages_fetched += other.pages_fetched;
        self.streams_synced += other.streams_synced;
        self.duration_ms += other.duration_ms;
    }
}
