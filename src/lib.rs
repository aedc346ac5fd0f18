//! # kvlog
//!
//! Structured, leveled logging that writes one `[key:value]` line per record.
//!
//! ## Features
//!
//! - **Bracketed key-value lines**: `[ts:...][level:info][caller:...][msg:...][k:v]`
//! - **Runtime level control**: loggers read a shared [`AtomicLevel`] on every
//!   call; [`Logger::with_level`] pins a child to a private one
//! - **Context propagation**: attach a logger to a [`Context`] and log through
//!   the free functions in [`context`]
//! - **Accurate callers**: every emit path reports the application call site
//!
//! ```
//! use kvlog::prelude::*;
//!
//! let level = AtomicLevel::new_at(Level::Info);
//! let sink = MemorySink::new();
//! let logger = Logger::builder().level(&level).sink(sink.clone()).build();
//!
//! logger.named("api").info("listening", &[Field::uint("port", 8080u16)]);
//! logger.debug("not yet", &[]);
//! level.set_level(Level::Debug);
//! logger.debug("now visible", &[]);
//!
//! assert_eq!(sink.lines().len(), 2);
//! ```

pub mod context;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::context::{self, Context};
    pub use crate::core::{
        AtomicLevel, Config, EncoderConfig, FatalAction, Field, Level, Logger, LoggerBuilder,
        LoggerError, Result, SamplingConfig, StructuredLog, SugaredLogger, Value,
    };
    pub use crate::sinks::{ConsoleSink, MemorySink, Sink};
}

pub use context::Context;
pub use core::{
    AtomicLevel, CallerEncoding, CheckedEntry, Config, DurationEncoding, EncoderConfig, Entry,
    EntryCaller, FatalAction, Field, KeyValueEncoder, Level, LevelBinding, LevelEncoding,
    LevelResponse, Logger, LoggerBuilder, LoggerError, Result, SamplerMetrics, SamplingConfig,
    StructuredLog, SugaredLogger, TimeEncoding, Value,
};
pub use sinks::{
    AsyncSink, ConsoleSink, DiscardSink, FileSink, LockedSink, MemorySink, MultiSink, Sink,
};
