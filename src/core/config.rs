//! Declarative logger configuration
//!
//! `Config` is the serializable counterpart of [`LoggerBuilder`]: it can be
//! read from a JSON document and turned into a [`Logger`].
//!
//! ```
//! use kvlog::{Config, Level};
//!
//! let config = Config::from_json(r#"{
//!     "level": "warn",
//!     "output_paths": ["stdout"],
//!     "encoder": { "time_encoding": "epoch_millis" }
//! }"#).unwrap();
//! assert_eq!(config.level, Level::Warn);
//! let logger = config.build().unwrap();
//! assert!(!logger.enabled(Level::Info));
//! ```

use super::atomic_level::AtomicLevel;
use super::encoder::EncoderConfig;
use super::error::{LoggerError, Result};
use super::level::Level;
use super::logger::{Logger, LoggerBuilder};
use super::sampling::SamplingConfig;
use crate::sinks::{ConsoleSink, FileSink, MultiSink, Sink};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial threshold
    pub level: Level,

    /// Development mode: `dpanic` panics, stack traces from `Warn`
    pub development: bool,

    /// Omit the caller segment
    pub disable_caller: bool,

    /// Never capture stack traces
    pub disable_stacktrace: bool,

    /// Sampling policy; `None` writes everything
    pub sampling: Option<SamplingConfig>,

    /// Where records go: `stderr`, `stdout` or file paths
    pub output_paths: Vec<String>,

    /// Where write failures are reported
    pub error_output_paths: Vec<String>,

    /// Logger name
    pub name: String,

    pub encoder: EncoderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::production()
    }
}

impl Config {
    /// `Info` and above to stderr, sampled, stack traces from `Error`.
    pub fn production() -> Self {
        Self {
            level: Level::Info,
            development: false,
            disable_caller: false,
            disable_stacktrace: false,
            sampling: Some(SamplingConfig::default()),
            output_paths: vec!["stderr".to_string()],
            error_output_paths: vec!["stderr".to_string()],
            name: String::new(),
            encoder: EncoderConfig::default(),
        }
    }

    /// `Debug` and above to stderr, unsampled, development mode on.
    pub fn development() -> Self {
        Self {
            level: Level::Debug,
            development: true,
            sampling: None,
            ..Self::production()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a logger with a fresh level holder, reachable afterwards through
    /// [`Logger::level_holder`].
    pub fn build(&self) -> Result<Logger> {
        self.build_with_level(&AtomicLevel::new_at(self.level))
    }

    /// Build a logger that follows `level`. The holder is left as it is;
    /// `self.level` is ignored.
    pub fn build_with_level(&self, level: &AtomicLevel) -> Result<Logger> {
        let sink = open_sinks(&self.output_paths, "output_paths")?;
        let error_output = open_sinks(&self.error_output_paths, "error_output_paths")?;

        let mut builder = LoggerBuilder::new()
            .shared_sink(sink)
            .shared_error_output(error_output)
            .encoder(self.encoder.clone())
            .level(level)
            .development(self.development)
            .add_caller(!self.disable_caller)
            .name(self.name.clone());

        builder = if self.disable_stacktrace {
            builder.disable_stacktrace()
        } else if self.development {
            builder.stacktrace_level(Level::Warn)
        } else {
            builder.stacktrace_level(Level::Error)
        };

        if let Some(sampling) = self.sampling {
            builder = builder.sampling(sampling);
        }

        Ok(builder.build())
    }
}

/// Open one destination. `stderr` and `stdout` are reserved names.
pub fn open_sink(path: &str) -> Result<Arc<dyn Sink>> {
    match path {
        "stderr" => Ok(Arc::new(ConsoleSink::stderr())),
        "stdout" => Ok(Arc::new(ConsoleSink::stdout())),
        _ => Ok(Arc::new(FileSink::open(path)?)),
    }
}

fn open_sinks(paths: &[String], component: &str) -> Result<Arc<dyn Sink>> {
    match paths {
        [] => Err(LoggerError::config(component, "at least one path is required")),
        [path] => open_sink(path),
        _ => {
            let sinks = paths
                .iter()
                .map(|p| open_sink(p))
                .collect::<Result<Vec<_>>>()?;
            Ok(Arc::new(MultiSink::new(sinks)))
        }
    }
}
