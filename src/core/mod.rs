//! Core logger types and traits

pub mod atomic_level;
pub mod config;
pub mod encoder;
pub mod entry;
pub mod error;
pub mod facade;
pub mod field;
pub mod level;
pub mod level_core;
pub mod logger;
pub mod pipeline;
pub mod sampling;
pub mod sugar;
pub mod timestamp;

pub use atomic_level::{AtomicLevel, LevelResponse};
pub use config::Config;
pub use encoder::{CallerEncoding, EncoderConfig, KeyValueEncoder, LevelEncoding};
pub use entry::{CheckedEntry, Entry, EntryCaller};
pub use error::{LoggerError, Result};
pub use facade::StructuredLog;
pub use field::{Field, Value};
pub use level::Level;
pub use level_core::{LevelBinding, LevelCore};
pub use logger::{FatalAction, Logger, LoggerBuilder};
pub use pipeline::{Core, IoCore, NopCore};
pub use sampling::{SamplerCore, SamplerMetrics, SamplingConfig};
pub use sugar::SugaredLogger;
pub use timestamp::{DurationEncoding, TimeEncoding};
