//! Main logger implementation

use super::{
    atomic_level::AtomicLevel,
    encoder::{EncoderConfig, KeyValueEncoder},
    entry::{CheckedEntry, Entry, EntryCaller, Terminal},
    error::Result,
    field::Field,
    level::Level,
    level_core::LevelCore,
    pipeline::{Core, IoCore, NopCore},
    sampling::{SamplerCore, SamplerMetrics, SamplingConfig},
    sugar::SugaredLogger,
};
use crate::sinks::{ConsoleSink, DiscardSink, Sink};
use chrono::Utc;
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// What `fatal` does once its entry has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalAction {
    /// Flush and exit the process with this status code.
    Exit(i32),
    /// Panic instead of exiting, for hosts that must unwind.
    Panic,
}

impl Default for FatalAction {
    fn default() -> Self {
        FatalAction::Exit(1)
    }
}

/// Fast, leveled, structured logger.
///
/// A `Logger` is an immutable handle: `named`, `with` and `with_level` return
/// new loggers and never change the one they are called on. Clones are cheap
/// and all methods are safe for concurrent use.
#[derive(Clone)]
pub struct Logger {
    core: LevelCore,
    name: Arc<str>,
    development: bool,
    add_caller: bool,
    stacktrace_level: Option<Level>,
    fatal_action: FatalAction,
    error_output: Arc<dyn Sink>,
    sampler_metrics: Option<Arc<SamplerMetrics>>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Production setup: key-value lines on stderr, caller on every entry,
    /// stack traces from `Error` up, threshold read from `level`.
    ///
    /// The level can be changed later through `level` (or any clone of it)
    /// and every logger derived without `with_level` follows.
    #[must_use]
    pub fn production(level: &AtomicLevel) -> Self {
        Self::builder().level(level).build()
    }

    /// Like [`Logger::production`], but `dpanic` panics and stack traces
    /// start at `Warn`.
    #[must_use]
    pub fn development(level: &AtomicLevel) -> Self {
        Self::builder()
            .level(level)
            .development(true)
            .stacktrace_level(Level::Warn)
            .build()
    }

    /// Logger that discards everything.
    #[must_use]
    pub fn nop() -> Self {
        Self {
            core: LevelCore::new(Arc::new(NopCore), AtomicLevel::new_at(Level::Fatal)),
            name: Arc::from(""),
            development: false,
            add_caller: false,
            stacktrace_level: None,
            fatal_action: FatalAction::default(),
            error_output: Arc::new(DiscardSink),
            sampler_metrics: None,
        }
    }

    /// Dot-separated name, empty for the root logger.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current effective threshold.
    pub fn level(&self) -> Level {
        self.core.binding().holder().level()
    }

    /// The holder this logger reads its threshold from.
    pub fn level_holder(&self) -> AtomicLevel {
        self.core.binding().holder().clone()
    }

    /// Whether this logger was pinned by `with_level` (directly or through an
    /// ancestor).
    pub fn is_level_frozen(&self) -> bool {
        self.core.binding().is_frozen()
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    /// Sampling counters, if the logger was built with sampling. Shared by
    /// every logger derived from it.
    pub fn sampler_metrics(&self) -> Option<&SamplerMetrics> {
        self.sampler_metrics.as_deref()
    }

    /// Append a segment to the logger's name. Segments are joined by periods.
    #[must_use]
    pub fn named(&self, segment: &str) -> Logger {
        if segment.is_empty() {
            return self.clone();
        }
        let mut child = self.clone();
        child.name = if self.name.is_empty() {
            Arc::from(segment)
        } else {
            Arc::from(format!("{}.{}", self.name, segment))
        };
        child
    }

    /// Child logger carrying `fields` on every entry. Fields added to the
    /// child don't affect the parent, and vice versa.
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }
        let mut child = self.clone();
        child.core = self.core.with_fields(fields);
        child
    }

    /// Child logger pinned to `level` through a private holder. Later changes
    /// to the parent's holder no longer affect it.
    #[must_use]
    pub fn with_level(&self, level: Level) -> Logger {
        let mut child = self.clone();
        child.core = self.core.rebind(AtomicLevel::new_at(level));
        child
    }

    #[must_use]
    pub fn sugar(&self) -> SugaredLogger {
        SugaredLogger::new(self.clone())
    }

    /// Returns a handle if an entry at `level` would be written, so fields
    /// are only built when they will be used.
    ///
    /// `Panic` and `Fatal` always return a handle; see [`CheckedEntry`].
    #[track_caller]
    pub fn check(&self, level: Level, message: impl Into<String>) -> Option<CheckedEntry> {
        self.check_at(level, message.into(), Location::caller())
    }

    fn check_at(
        &self,
        level: Level,
        message: String,
        caller: &'static Location<'static>,
    ) -> Option<CheckedEntry> {
        let terminal = match level {
            Level::DPanic if self.development => Terminal::Panic,
            Level::Panic => Terminal::Panic,
            Level::Fatal => match self.fatal_action {
                FatalAction::Exit(code) => Terminal::Exit(code),
                FatalAction::Panic => Terminal::Panic,
            },
            _ => Terminal::Continue,
        };

        if terminal == Terminal::Continue && !self.core.enabled(level) {
            return None;
        }

        let mut entry = Entry {
            level,
            time: Utc::now(),
            logger_name: Arc::clone(&self.name),
            message,
            caller: None,
            stack: None,
        };

        let accepted = self.core.check(&entry);
        if !accepted && terminal == Terminal::Continue {
            return None;
        }

        if accepted {
            if self.add_caller {
                entry.caller = Some(EntryCaller::from(caller));
            }
            if self.stacktrace_level.is_some_and(|min| level >= min) {
                entry.stack = Some(Backtrace::force_capture().to_string());
            }
        }

        Some(CheckedEntry::new(
            entry,
            accepted.then(|| self.core.clone()),
            terminal,
            Arc::clone(&self.error_output),
        ))
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>, fields: &[Field]) {
        if let Some(ce) = self.check(level, message) {
            ce.write(fields);
        }
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Logs at `DPanic`. In development mode the logger then panics.
    #[track_caller]
    pub fn dpanic(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::DPanic, message, fields);
    }

    /// Logs at `Panic`, then panics, even if `Panic` is disabled.
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::Panic, message, fields);
    }

    /// Logs at `Fatal`, then exits (see [`FatalAction`]), even if `Fatal` is
    /// disabled.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>, fields: &[Field]) {
        self.log(Level::Fatal, message, fields);
    }

    /// Flush buffered output.
    pub fn sync(&self) -> Result<()> {
        self.core.sync()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::nop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("frozen", &self.is_level_frozen())
            .field("development", &self.development)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use kvlog::prelude::*;
///
/// let level = AtomicLevel::new_at(Level::Info);
/// let logger = Logger::builder()
///     .level(&level)
///     .sink(MemorySink::new())
///     .name("api")
///     .build();
/// assert_eq!(logger.name(), "api");
/// ```
pub struct LoggerBuilder {
    sink: Option<Arc<dyn Sink>>,
    error_output: Option<Arc<dyn Sink>>,
    encoder: EncoderConfig,
    level: Option<AtomicLevel>,
    development: bool,
    add_caller: bool,
    stacktrace_level: Option<Level>,
    sampling: Option<SamplingConfig>,
    fatal_action: FatalAction,
    name: String,
    fields: Vec<Field>,
}

impl LoggerBuilder {
    /// Create a new builder with production defaults
    pub fn new() -> Self {
        Self {
            sink: None,
            error_output: None,
            encoder: EncoderConfig::default(),
            level: None,
            development: false,
            add_caller: true,
            stacktrace_level: Some(Level::Error),
            sampling: None,
            fatal_action: FatalAction::default(),
            name: String::new(),
            fields: Vec::new(),
        }
    }

    /// Destination for encoded records (default: stderr)
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(self, sink: S) -> Self {
        self.shared_sink(Arc::new(sink))
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Where write failures are reported (default: stderr)
    #[must_use = "builder methods return a new value"]
    pub fn error_output<S: Sink + 'static>(self, sink: S) -> Self {
        self.shared_error_output(Arc::new(sink))
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_error_output(mut self, sink: Arc<dyn Sink>) -> Self {
        self.error_output = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, config: EncoderConfig) -> Self {
        self.encoder = config;
        self
    }

    /// Follow a shared, runtime-adjustable threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: &AtomicLevel) -> Self {
        self.level = Some(level.clone());
        self
    }

    /// Start from a fixed threshold in a holder of the logger's own
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Level) -> Self {
        self.level = Some(AtomicLevel::new_at(level));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, add_caller: bool) -> Self {
        self.add_caller = add_caller;
        self
    }

    /// Capture stack traces for entries at `level` and above
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: Level) -> Self {
        self.stacktrace_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_stacktrace(mut self) -> Self {
        self.stacktrace_level = None;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sampling(mut self, config: SamplingConfig) -> Self {
        self.sampling = Some(config);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn fatal_action(mut self, action: FatalAction) -> Self {
        self.fatal_action = action;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Fields carried by every entry of the built logger
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let sink = self.sink.unwrap_or_else(|| Arc::new(ConsoleSink::stderr()));
        let io: Arc<dyn Core> = Arc::new(IoCore::new(
            KeyValueEncoder::new(self.encoder),
            sink,
            Level::Debug,
        ));
        let (core, sampler_metrics): (Arc<dyn Core>, _) = match self.sampling {
            Some(config) => {
                let sampler = SamplerCore::new(io, config);
                let metrics = sampler.shared_metrics();
                (Arc::new(sampler), Some(metrics))
            }
            None => (io, None),
        };

        let logger = Logger {
            core: LevelCore::new(core, self.level.unwrap_or_default()),
            name: Arc::from(""),
            development: self.development,
            add_caller: self.add_caller,
            stacktrace_level: self.stacktrace_level,
            fatal_action: self.fatal_action,
            error_output: self
                .error_output
                .unwrap_or_else(|| Arc::new(ConsoleSink::stderr())),
            sampler_metrics,
        };

        logger.named(&self.name).with(&self.fields)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
