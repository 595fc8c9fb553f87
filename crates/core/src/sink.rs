//! Destinations for generated declaration lines.

use std::io::Write;

use crate::error::Result;

/// Receives declaration lines in traversal order.
pub trait DeclarationSink {
    /// Accept one complete declaration line, without a line terminator.
    fn accept(&mut self, line: &str) -> Result<()>;
}

impl DeclarationSink for Vec<String> {
    fn accept(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each declaration as a `\n`-terminated line.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush buffered lines to the inner writer.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the inner writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> DeclarationSink for WriterSink<W> {
    fn accept(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}
