//! Pagination types
//!
//! `Cursor` identifies where the next page begins; `Paginator` is the
//! strategy value that owns cursor state for one in-flight stream.

use super::strategies::{OffsetPaginator, TokenPaginator};
use crate::config::{MatomoConfig, PaginationStyle};
use crate::error::Result;
use serde_json::Value;

/// Query parameter carrying an offset cursor
pub const OFFSET_PARAM: &str = "filter_offset";

/// Query parameter carrying a token cursor
pub const TOKEN_PARAM: &str = "page";

/// Position of the next page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// Number of rows already fetched
    Offset(u64),
    /// Opaque continuation value returned by the API
    Token(String),
}

impl Cursor {
    /// Query parameter name for this cursor kind
    pub fn query_param(&self) -> &'static str {
        match self {
            Self::Offset(_) => OFFSET_PARAM,
            Self::Token(_) => TOKEN_PARAM,
        }
    }

    /// Query parameter value
    pub fn query_value(&self) -> String {
        match self {
            Self::Offset(offset) => offset.to_string(),
            Self::Token(token) => token.clone(),
        }
    }

    /// The offset, for offset cursors
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::Offset(offset) => Some(*offset),
            Self::Token(_) => None,
        }
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.query_param(), self.query_value())
    }
}

/// Pagination strategy, chosen once at stream start
///
/// Exclusively owned by one stream sync; the cursor it holds is only ever
/// changed by [`Paginator::advance`].
#[derive(Debug, Clone)]
pub enum Paginator {
    /// `filter_offset` pagination
    Offset(OffsetPaginator),
    /// `page` token pagination
    Token(TokenPaginator),
}

impl Paginator {
    /// Build the paginator selected by the configuration
    pub fn from_config(config: &MatomoConfig) -> Result<Self> {
        match config.pagination {
            PaginationStyle::Offset => Ok(Self::Offset(OffsetPaginator::new(config.filter_limit))),
            PaginationStyle::Token => Ok(Self::Token(TokenPaginator::new(
                config.next_page_path.clone(),
                config.filter_limit,
            )?)),
        }
    }

    /// Cursor to send with the upcoming request
    pub fn cursor(&self) -> Option<Cursor> {
        match self {
            Self::Offset(p) => p.cursor(),
            Self::Token(p) => p.cursor(),
        }
    }

    /// Whether `body` implies another page should be fetched
    pub fn has_more(&self, body: &Value) -> bool {
        match self {
            Self::Offset(p) => p.has_more(body),
            Self::Token(p) => p.has_more(body),
        }
    }

    /// Cursor following `body`, or `None` when pagination is exhausted
    pub fn get_next(&self, body: &Value) -> Option<Cursor> {
        match self {
            Self::Offset(p) => p.get_next(body),
            Self::Token(p) => p.get_next(body),
        }
    }

    /// Record `body` as the latest page and move to the next cursor
    pub fn advance(&mut self, body: &Value) -> Option<Cursor> {
        match self {
            Self::Offset(p) => p.advance(body),
            Self::Token(p) => p.advance(body),
        }
    }

    /// Whether the last advance signalled exhaustion
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Offset(p) => p.is_finished(),
            Self::Token(p) => p.is_finished(),
        }
    }

    /// Whether `filter_limit=-1` turned pagination off
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Offset(p) => p.is_disabled(),
            Self::Token(p) => p.is_disabled(),
        }
    }
}

/// A page is empty when it is `null`, `[]` or `{}`
pub fn is_empty_page(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Number of rows a page contributes to the running offset
pub fn page_len(body: &Value) -> u64 {
    match body {
        Value::Array(items) => items.len() as u64,
        other if is_empty_page(other) => 0,
        _ => 1,
    }
}
