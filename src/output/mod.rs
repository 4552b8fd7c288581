//! Output module
//!
//! Serializes Singer messages to line-delimited JSON on stdout.

mod writer;

pub use writer::MessageWriter;

#[cfg(test)]
mod tests;
