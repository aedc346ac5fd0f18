//! Core wrapper that reads its threshold from an [`AtomicLevel`]
//!
//! The threshold is loaded on every decision rather than captured when the
//! logger is built. Which holder is consulted is fixed per wrapper: either
//! the shared holder the root logger was built with, or a private one created
//! when a child logger froze its level.

use super::atomic_level::AtomicLevel;
use super::entry::Entry;
use super::error::Result;
use super::field::Field;
use super::level::Level;
use super::pipeline::Core;
use std::sync::Arc;

/// Which holder a logger's threshold comes from.
#[derive(Debug, Clone)]
pub enum LevelBinding {
    /// Tracks a holder that may be shared with other loggers and with an
    /// administrative endpoint.
    Shared(AtomicLevel),
    /// Private holder created for one derived logger and its descendants.
    Frozen(AtomicLevel),
}

impl LevelBinding {
    pub fn holder(&self) -> &AtomicLevel {
        match self {
            LevelBinding::Shared(level) | LevelBinding::Frozen(level) => level,
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, LevelBinding::Frozen(_))
    }
}

#[derive(Clone)]
pub struct LevelCore {
    inner: Arc<dyn Core>,
    binding: LevelBinding,
}

impl LevelCore {
    /// Wrap `inner` so it follows `level`.
    pub fn new(inner: Arc<dyn Core>, level: AtomicLevel) -> Self {
        Self {
            inner,
            binding: LevelBinding::Shared(level),
        }
    }

    /// Same pipeline, bound to a different holder from now on.
    pub fn rebind(&self, level: AtomicLevel) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            binding: LevelBinding::Frozen(level),
        }
    }

    /// Same holder, with `fields` added to the wrapped pipeline.
    pub fn with_fields(&self, fields: &[Field]) -> Self {
        Self {
            inner: self.inner.with(fields),
            binding: self.binding.clone(),
        }
    }

    pub fn binding(&self) -> &LevelBinding {
        &self.binding
    }
}

impl Core for LevelCore {
    fn enabled(&self, level: Level) -> bool {
        self.binding.holder().enabled(level) && self.inner.enabled(level)
    }

    fn check(&self, entry: &Entry) -> bool {
        self.binding.holder().enabled(entry.level) && self.inner.check(entry)
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn Core> {
        Arc::new(self.with_fields(fields))
    }

    fn write(&self, entry: &Entry, fields: &[Field]) -> Result<()> {
        self.inner.write(entry, fields)
    }

    fn sync(&self) -> Result<()> {
        self.inner.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::{EncoderConfig, KeyValueEncoder};
    use crate::core::pipeline::{IoCore, NopCore};
    use crate::sinks::MemorySink;

    fn inner() -> Arc<dyn Core> {
        Arc::new(IoCore::new(
            KeyValueEncoder::new(EncoderConfig::default()),
            Arc::new(MemorySink::new()),
            Level::Debug,
        ))
    }

    #[test]
    fn test_threshold_is_read_at_decision_time() {
        let lvl = AtomicLevel::new_at(Level::Error);
        let core = LevelCore::new(inner(), lvl.clone());
        assert!(!core.enabled(Level::Info));

        lvl.set_level(Level::Debug);
        assert!(core.enabled(Level::Debug));
    }

    #[test]
    fn test_rebind_detaches_from_shared_holder() {
        let shared = AtomicLevel::new_at(Level::Error);
        let parent = LevelCore::new(inner(), shared.clone());
        let frozen = parent.rebind(AtomicLevel::new_at(Level::Info));
        let sibling = parent.with_fields(&[Field::string("k", "v")]);

        assert!(frozen.binding().is_frozen());
        assert!(!sibling.binding().is_frozen());

        shared.set_level(Level::Debug);
        assert!(!frozen.enabled(Level::Debug));
        assert!(frozen.enabled(Level::Info));
        assert!(sibling.enabled(Level::Debug));
        assert!(parent.enabled(Level::Debug));
    }

    #[test]
    fn test_with_fields_keeps_frozen_holder() {
        let frozen = LevelCore::new(inner(), AtomicLevel::new_at(Level::Error))
            .rebind(AtomicLevel::new_at(Level::Warn));
        let child = frozen.with_fields(&[]);
        assert!(child.binding().is_frozen());
        assert!(child.binding().holder().ptr_eq(frozen.binding().holder()));
    }

    #[test]
    fn test_inner_still_vetoes() {
        let core = LevelCore::new(Arc::new(NopCore), AtomicLevel::new_at(Level::Debug));
        assert!(!core.enabled(Level::Fatal));
    }
}
