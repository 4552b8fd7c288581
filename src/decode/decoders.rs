//! JSON record extraction
//!
//! Bodies are parsed with `serde_json`'s arbitrary precision numbers, so
//! every numeric leaf keeps its original digits and never passes through
//! binary floating point.

use super::types::{json_kind, Record};
use crate::error::{Error, Result};
use serde_json::Value;

/// Default record selector: every element of the top-level value
pub const DEFAULT_RECORDS_PATH: &str = "$[*]";

/// JSON decoder with record path extraction
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    record_path: String,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self {
            record_path: DEFAULT_RECORDS_PATH.to_string(),
        }
    }
}

impl JsonDecoder {
    /// Create a decoder selecting the top-level collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: path.into(),
        }
    }

    /// The record path
    pub fn record_path(&self) -> &str {
        &self.record_path
    }

    /// Parse a page body, preserving numeric precision
    pub fn parse(&self, body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })
    }

    /// Select the records of a parsed page
    ///
    /// The returned iterator is lazy and single-pass; nothing is kept
    /// between pages.
    pub fn extract(&self, payload: Value) -> Result<Records> {
        let candidates = self.select(payload)?;
        Ok(Records {
            inner: candidates.into_iter(),
            path: self.record_path.clone(),
        })
    }

    /// Parse and extract every record of a page body
    pub fn decode(&self, body: &str) -> Result<Vec<Record>> {
        let payload = self.parse(body)?;
        self.extract(payload)?.collect()
    }

    fn select(&self, payload: Value) -> Result<Vec<Value>> {
        let path = self.record_path.as_str();
        if is_top_level(path) {
            return Ok(candidates(payload));
        }

        if path.contains('*') || path.contains('[') || path.contains("..") {
            return extract_with_jsonpath(&payload, path);
        }

        Ok(extract_simple_path(payload, path).map_or_else(Vec::new, candidates))
    }
}

/// Records of one page
#[derive(Debug)]
pub struct Records {
    inner: std::vec::IntoIter<Value>,
    path: String,
}

impl Iterator for Records {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        Some(match value {
            Value::Object(map) => Ok(Record::from(map)),
            other => Err(Error::extraction(
                self.path.clone(),
                format!("expected an object record, got {}", json_kind(&other)),
            )),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Records {}

fn is_top_level(path: &str) -> bool {
    matches!(path, "$" | "$[*]" | "$.*" | "")
}

/// Arrays contribute their elements; a non-empty object is one record
fn candidates(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => vec![],
        Value::Object(map) if map.is_empty() => vec![],
        other => vec![other],
    }
}

/// Walk a dotted path such as `$.data.rows`
fn extract_simple_path(value: Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        current = match current {
            Value::Object(mut map) => map.remove(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Extract using jsonpath-rust for wildcard and bracket paths
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
