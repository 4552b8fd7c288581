//! Singer message writer
//!
//! Writes one JSON object per line. Records are serialized straight from
//! their parsed form, so numbers go out with the digits they came in with.

use crate::engine::Message;
use crate::error::{Error, Result};
use std::io::{self, Stdout, Write};

/// Line-delimited JSON writer for Singer messages
pub struct MessageWriter<W: Write> {
    /// Destination
    out: W,
    /// Number of RECORD messages written
    records_written: usize,
    /// Number of messages written
    messages_written: usize,
}

impl MessageWriter<Stdout> {
    /// Writer targeting standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> MessageWriter<W> {
    /// Create a writer over any destination
    pub fn new(out: W) -> Self {
        Self {
            out,
            records_written: 0,
            messages_written: 0,
        }
    }

    /// Write one message as a single line
    pub fn write(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message).map_err(|e| Error::Output {
            message: format!("Failed to serialize {} message: {e}", message.stream()),
        })?;
        self.out.write_all(b"\n")?;

        self.messages_written += 1;
        if message.is_record() {
            self.records_written += 1;
        }
        Ok(())
    }

    /// Write an arbitrary JSON document (spec, catalog, check result) as one line
    pub fn write_json(&mut self, value: &impl serde::Serialize) -> Result<()> {
        serde_json::to_writer(&mut self.out, value).map_err(|e| Error::Output {
            message: format!("Failed to serialize output: {e}"),
        })?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Get the number of records written so far
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Get the number of messages written so far
    #[must_use]
    pub fn messages_written(&self) -> usize {
        self.messages_written
    }

    /// Take back the destination
    pub fn into_inner(self) -> W {
        self.out
    }
}
