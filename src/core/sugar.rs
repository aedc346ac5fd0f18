//! Loosely typed convenience wrapper around [`Logger`]

use super::field::{Field, Value};
use super::level::Level;
use super::logger::Logger;
use std::borrow::Cow;
use std::fmt;

/// Wraps a [`Logger`] with methods that take key/value pairs or format
/// arguments instead of typed fields.
///
/// Emission behaves exactly like the wrapped logger: same level checks, same
/// caller, same terminal actions for `dpanic`, `panic` and `fatal`.
///
/// ```
/// use kvlog::{kv, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder().sink(sink.clone()).build();
/// let sugar = logger.sugar();
/// sugar.infow("cache miss", kv!["key" => "user:42", "attempt" => 3]);
/// assert!(sink.lines()[0].ends_with("[msg:cache miss][key:user:42][attempt:3]"));
/// ```
#[derive(Clone, Debug)]
pub struct SugaredLogger {
    base: Logger,
}

fn to_fields<I, K, V>(pairs: I) -> Vec<Field>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Cow<'static, str>>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| Field::new(k, v)).collect()
}

impl SugaredLogger {
    pub fn new(base: Logger) -> Self {
        Self { base }
    }

    /// The underlying structured logger.
    pub fn desugar(&self) -> Logger {
        self.base.clone()
    }

    #[must_use]
    pub fn named(&self, segment: &str) -> Self {
        Self::new(self.base.named(segment))
    }

    #[must_use]
    pub fn with<I, K, V>(&self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<Value>,
    {
        Self::new(self.base.with(&to_fields(pairs)))
    }

    /// Pairs are only converted once the entry is known to be written.
    #[track_caller]
    pub fn logw<I, K, V>(&self, level: Level, message: &str, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<Value>,
    {
        if let Some(ce) = self.base.check(level, message) {
            ce.write(&to_fields(pairs));
        }
    }

    /// The message is only formatted once the level is known to be enabled.
    #[track_caller]
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if level < Level::DPanic && !self.base.enabled(level) {
            return;
        }
        if let Some(ce) = self.base.check(level, args.to_string()) {
            ce.write(&[]);
        }
    }
}

macro_rules! sugar_levels {
    ($($level:ident => $w:ident, $f:ident;)*) => {
        impl SugaredLogger {
            $(
                #[track_caller]
                pub fn $w<I, K, V>(&self, message: &str, pairs: I)
                where
                    I: IntoIterator<Item = (K, V)>,
                    K: Into<Cow<'static, str>>,
                    V: Into<Value>,
                {
                    self.logw(Level::$level, message, pairs);
                }

                #[track_caller]
                pub fn $f(&self, args: fmt::Arguments<'_>) {
                    self.logf(Level::$level, args);
                }
            )*
        }
    };
}

sugar_levels! {
    Debug => debugw, debugf;
    Info => infow, infof;
    Warn => warnw, warnf;
    Error => errorw, errorf;
    DPanic => dpanicw, dpanicf;
    Panic => panicw, panicf;
    Fatal => fatalw, fatalf;
}
