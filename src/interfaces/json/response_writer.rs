use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// Writes response documents as pretty-printed JSON, one per call.
pub struct ResponseWriter<W: Write> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write<T: Serialize>(&mut self, document: &T) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
