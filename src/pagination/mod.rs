//! Pagination module
//!
//! Supports: Offset (`filter_offset`), Token (`page`)
//!
//! # Overview
//!
//! A `Paginator` owns the cursor for one stream sync. After each page the
//! orchestrator hands it the parsed response; the paginator decides whether
//! another page exists and which cursor the next request carries. A page
//! size of `-1` disables pagination for the run, so exactly one request is
//! made in either style.

mod strategies;
mod types;

pub use strategies::{OffsetPaginator, TokenPaginator};
pub use types::{is_empty_page, page_len, Cursor, Paginator, OFFSET_PARAM, TOKEN_PARAM};

#[cfg(test)]
mod tests;
