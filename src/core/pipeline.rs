//! Pluggable emit pipeline
//!
//! A [`Core`] decides whether an entry is wanted and, if so, encodes and
//! writes it. Cores are immutable; adding fields produces a new core.

use super::encoder::KeyValueEncoder;
use super::entry::Entry;
use super::error::Result;
use super::field::Field;
use super::level::Level;
use crate::sinks::Sink;
use std::sync::Arc;

pub trait Core: Send + Sync {
    /// Cheap level-only test, used before an entry is even built.
    fn enabled(&self, level: Level) -> bool;

    /// Full admission test for a built entry. Stateful cores such as the
    /// sampler make their decision here.
    fn check(&self, entry: &Entry) -> bool {
        self.enabled(entry.level)
    }

    /// A core that includes `fields` in every entry it writes.
    fn with(&self, fields: &[Field]) -> Arc<dyn Core>;

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()>;

    fn sync(&self) -> Result<()>;
}

/// Encodes with a [`KeyValueEncoder`] and writes to a [`Sink`].
#[derive(Clone)]
pub struct IoCore {
    encoder: KeyValueEncoder,
    sink: Arc<dyn Sink>,
    min_level: Level,
}

impl IoCore {
    pub fn new(encoder: KeyValueEncoder, sink: Arc<dyn Sink>, min_level: Level) -> Self {
        Self {
            encoder,
            sink,
            min_level,
        }
    }
}

impl Core for IoCore {
    fn enabled(&self, level: Level) -> bool {
        level.enabled(self.min_level)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        let mut core = self.clone();
        core.encoder.add_fields(fields);
        Arc::new(core)
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        let line = self.encoder.encode_entry(entry, fields);
        self.sink.write_all(line.as_bytes())?;
        // Entries above Error may end the process; make sure they land.
        if entry.level > Level::Error {
            self.sink.sync()?;
        }
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        self.sink.sync()
    }
}

/// Never enabled; discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopCore;

impl Core for NopCore {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn with(&self, _fields: &[Field]) -> Arc<dyn Core> {
        Arc::new(NopCore)
    }

    fn write(&self, _entry: &Entry, _fields: &[Field]) -> Result<()> {
        Ok(())
    }

    fn sync(&self) -> Result<()> {
        Ok(())
    }
}
