//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `spec` - Print the configuration schema
//! - `check` - Test connection to the API
//! - `discover` - List available streams
//! - `read` - Extract data from streams

mod commands;
mod runner;

pub use commands::{parse_stream_list, Cli, Commands};
pub use runner::Runner;
