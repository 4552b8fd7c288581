//! Pagination strategy implementations
//!
//! Each strategy is a plain value with pure `has_more`/`get_next`
//! functions; `advance` is the only method that mutates cursor state.

use super::types::{is_empty_page, page_len, Cursor};
use crate::config::PageSize;
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset-based pagination using `filter_offset`
///
/// Starts at offset 0 and moves forward by the number of rows in each
/// non-empty page. An empty page (or `filter_limit=-1`) ends the stream.
///
/// The offset is a running row count, not `offset + filter_limit`. The two
/// agree while pages are full, so after `n` full pages the offset is
/// `n * filter_limit`. After a short page (`[a, b]` then `[c]` with a limit
/// of 2) the next request asks for offset 3, directly after the last row
/// received.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    current_offset: u64,
    page_size: PageSize,
    finished: bool,
}

impl OffsetPaginator {
    /// Create a paginator positioned at offset 0
    pub fn new(page_size: PageSize) -> Self {
        Self {
            current_offset: 0,
            page_size,
            finished: false,
        }
    }

    /// Current offset
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Configured page size
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// `filter_limit=-1` disables pagination permanently
    pub fn is_disabled(&self) -> bool {
        self.page_size.is_unlimited()
    }

    /// Whether exhaustion has been signalled
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Cursor for the upcoming request; none when disabled
    pub fn cursor(&self) -> Option<Cursor> {
        if self.is_disabled() {
            None
        } else {
            Some(Cursor::Offset(self.current_offset))
        }
    }

    /// Non-empty pages may be followed by more data
    pub fn has_more(&self, body: &Value) -> bool {
        !self.is_disabled() && !is_empty_page(body)
    }

    /// Offset following `body`
    pub fn get_next(&self, body: &Value) -> Option<Cursor> {
        if !self.has_more(body) {
            return None;
        }
        Some(Cursor::Offset(self.current_offset + page_len(body)))
    }

    /// Move past `body`
    pub fn advance(&mut self, body: &Value) -> Option<Cursor> {
        let next = self.get_next(body);
        match &next {
            Some(Cursor::Offset(offset)) => self.current_offset = *offset,
            _ => self.finished = true,
        }
        next
    }
}

// ============================================================================
// Token Pagination
// ============================================================================

/// Token-based pagination using the `page` parameter
///
/// The next token is read verbatim from `token_path` in each response;
/// a missing, null or empty token ends the stream.
#[derive(Debug, Clone)]
pub struct TokenPaginator {
    token_path: String,
    page_size: PageSize,
    current: Option<String>,
    finished: bool,
}

impl TokenPaginator {
    /// Create a paginator reading tokens from `token_path`
    pub fn new(token_path: impl Into<String>, page_size: PageSize) -> Result<Self> {
        let token_path = token_path.into();
        if needs_jsonpath(&token_path) {
            compile(&token_path)?;
        }
        Ok(Self {
            token_path,
            page_size,
            current: None,
            finished: false,
        })
    }

    /// JSONPath of the token
    pub fn token_path(&self) -> &str {
        &self.token_path
    }

    /// `filter_limit=-1` disables pagination permanently
    pub fn is_disabled(&self) -> bool {
        self.page_size.is_unlimited()
    }

    /// Whether exhaustion has been signalled
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Token for the upcoming request; none on the first page
    pub fn cursor(&self) -> Option<Cursor> {
        if self.is_disabled() {
            return None;
        }
        self.current.clone().map(Cursor::Token)
    }

    /// A token present in `body` means there is another page
    pub fn has_more(&self, body: &Value) -> bool {
        !self.is_disabled() && self.extract_token(body).is_some()
    }

    /// Token following `body`
    pub fn get_next(&self, body: &Value) -> Option<Cursor> {
        if self.is_disabled() {
            return None;
        }
        self.extract_token(body).map(Cursor::Token)
    }

    /// Move past `body`
    pub fn advance(&mut self, body: &Value) -> Option<Cursor> {
        let next = self.get_next(body);
        match &next {
            Some(Cursor::Token(token)) => self.current = Some(token.clone()),
            _ => {
                self.current = None;
                self.finished = true;
            }
        }
        next
    }

    fn extract_token(&self, body: &Value) -> Option<String> {
        let found = if needs_jsonpath(&self.token_path) {
            compile(&self.token_path)
                .ok()
                .and_then(|jp| first_match(jp.find(body)))
        } else {
            lookup_dotted(body, &self.token_path).cloned()
        };
        found.and_then(|v| token_text(&v))
    }
}

/// Dotted paths like `$.next_page` or `$.meta.next` are walked directly
fn needs_jsonpath(path: &str) -> bool {
    path.contains('[') || path.contains('*') || path.contains("..")
}

fn compile(path: &str) -> Result<jsonpath_rust::JsonPath> {
    jsonpath_rust::JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))
}

fn first_match(found: Value) -> Option<Value> {
    match found {
        Value::Array(items) => items.into_iter().next(),
        Value::Null => None,
        other => Some(other),
    }
}

fn lookup_dotted<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        _ => None,
    })
}

/// Render a token value as query text
fn token_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}
