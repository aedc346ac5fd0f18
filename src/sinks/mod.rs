//! Output destinations
//!
//! A [`Sink`] receives fully encoded lines. Every implementation serializes
//! its writes, so concurrent loggers never interleave partial lines.

pub mod async_sink;
pub mod console;
pub mod file;
pub mod locked;
pub mod memory;
pub mod multi;

pub use async_sink::AsyncSink;
pub use console::ConsoleSink;
pub use file::FileSink;
pub use locked::LockedSink;
pub use memory::MemorySink;
pub use multi::MultiSink;

use crate::core::Result;

pub trait Sink: Send + Sync {
    /// Write one complete encoded record.
    fn write_all(&self, buf: &[u8]) -> Result<()>;

    /// Flush anything buffered down to the destination.
    fn sync(&self) -> Result<()>;

    fn name(&self) -> &str;
}

/// Accepts and drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardSink;

impl Sink for DiscardSink {
    fn write_all(&self, _buf: &[u8]) -> Result<()> {
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}
