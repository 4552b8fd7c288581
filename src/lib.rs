// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-matomo
//!
//! Extracts analytics records from the Matomo reporting API and emits them
//! as Singer messages.
//!
//! ## Features
//!
//! - **Offset and token pagination**: `filter_offset` running counts or a
//!   `page` token read from each response; `filter_limit=-1` fetches
//!   everything in one request
//! - **API error detection**: `{"result": "error"}` bodies abort the stream
//! - **Exact numbers**: numeric values keep their original digits end to end
//! - **Lazy paging**: one page in memory at a time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_matomo::{HttpClient, HttpClientConfig, MatomoConfig, SyncEngine};
//! use tap_matomo::streams::visits_details;
//!
//! #[tokio::main]
//! async fn main() -> tap_matomo::Result<()> {
//!     let config = MatomoConfig::from_file("config.json")?;
//!     config.validate()?;
//!
//!     let client = HttpClient::with_config(HttpClientConfig::from_settings(&config.http))?;
//!     let engine = SyncEngine::new(client, config);
//!
//!     engine
//!         .sync_stream(&visits_details(), &mut |message| {
//!             println!("{}", serde_json::to_string(&message)?);
//!             Ok(())
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        SyncEngine                            │
//! │  cursor → request → transport → validate → records → advance │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬───────────┬──────┴──────┬────────────┬───────────┐
//! │  Request  │   HTTP    │  Paginate   │  Validate  │  Decode   │
//! ├───────────┼───────────┼─────────────┼────────────┼───────────┤
//! │ module    │ Form POST │ Offset      │ result=    │ $[*]      │
//! │ method    │ Retry     │ Token       │  "error"   │ Decimals  │
//! │ idSite... │ Rate Limit│ -1 disables │            │           │
//! └───────────┴───────────┴─────────────┴────────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Page request construction
pub mod request;

/// Pagination strategies
pub mod pagination;

/// API-level response validation
pub mod validate;

/// Record extraction from JSON pages
pub mod decode;

/// HTTP transport with retry and rate limiting
pub mod http;

/// JSON Schema types
pub mod schema;

/// Built-in streams and the discovery catalog
pub mod streams;

/// Main execution engine
pub mod engine;

/// Singer message output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{MatomoConfig, PageSize, PaginationStyle};
pub use decode::{JsonDecoder, Record};
pub use engine::{Message, SyncConfig, SyncEngine, SyncStats};
pub use http::{HttpClient, HttpClientConfig, RawResponse, Transport};
pub use pagination::{Cursor, Paginator};
pub use request::{RequestBuilder, RequestDescriptor};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
