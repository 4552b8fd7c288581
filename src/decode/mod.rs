//! Response decoder module
//!
//! # Overview
//!
//! Turns a validated page body into output records. The whole top-level
//! value is treated as the collection of candidate records (`$[*]`), each
//! element becoming one `Record` in source order.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, Records, DEFAULT_RECORDS_PATH};
pub use types::Record;
