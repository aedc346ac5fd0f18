//! Mutex-guarded adapter for any `std::io::Write`

use super::Sink;
use crate::core::Result;
use parking_lot::Mutex;
use std::io::Write;

pub struct LockedSink<W: Write + Send> {
    writer: Mutex<W>,
    name: String,
}

impl<W: Write + Send> LockedSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named(writer, "writer")
    }

    pub fn named(writer: W, name: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: name.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Sink for LockedSink<W> {
    fn write_all(&self, buf: &[u8]) -> Result<()> {
        self.writer.lock().write_all(buf)?;
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
