//! Capability set shared by every logger implementation
//!
//! [`Logger`] is the implementation this crate ships. Anything else that can
//! derive children, gate on levels and emit entries can implement
//! [`StructuredLog`] and be attached to a [`Context`](crate::Context) in its
//! place.
//!
//! Emit methods are `#[track_caller]`, so the reported caller is the
//! application call site no matter which implementation sits behind the
//! trait object or how many forwarding layers are in between.

use super::entry::CheckedEntry;
use super::field::Field;
use super::level::Level;
use super::logger::Logger;
use super::sugar::SugaredLogger;
use std::sync::Arc;

pub trait StructuredLog: Send + Sync {
    #[track_caller]
    fn check(&self, level: Level, message: &str) -> Option<CheckedEntry>;

    fn named(&self, segment: &str) -> Arc<dyn StructuredLog>;

    fn with(&self, fields: &[Field]) -> Arc<dyn StructuredLog>;

    fn with_level(&self, level: Level) -> Arc<dyn StructuredLog>;

    fn sugar(&self) -> SugaredLogger;

    #[track_caller]
    fn debug(&self, message: &str, fields: &[Field]);

    #[track_caller]
    fn info(&self, message: &str, fields: &[Field]);

    #[track_caller]
    fn warn(&self, message: &str, fields: &[Field]);

    #[track_caller]
    fn error(&self, message: &str, fields: &[Field]);

    #[track_caller]
    fn dpanic(&self, message: &str, fields: &[Field]);

    #[track_caller]
    fn panic(&self, message: &str, fields: &[Field]);

    #[track_caller]
    fn fatal(&self, message: &str, fields: &[Field]);
}

impl StructuredLog for Logger {
    #[track_caller]
    fn check(&self, level: Level, message: &str) -> Option<CheckedEntry> {
        Logger::check(self, level, message)
    }

    fn named(&self, segment: &str) -> Arc<dyn StructuredLog> {
        Arc::new(Logger::named(self, segment))
    }

    fn with(&self, fields: &[Field]) -> Arc<dyn StructuredLog> {
        Arc::new(Logger::with(self, fields))
    }

    fn with_level(&self, level: Level) -> Arc<dyn StructuredLog> {
        Arc::new(Logger::with_level(self, level))
    }

    fn sugar(&self) -> SugaredLogger {
        Logger::sugar(self)
    }

    #[track_caller]
    fn debug(&self, message: &str, fields: &[Field]) {
        Logger::debug(self, message, fields);
    }

    #[track_caller]
    fn info(&self, message: &str, fields: &[Field]) {
        Logger::info(self, message, fields);
    }

    #[track_caller]
    fn warn(&self, message: &str, fields: &[Field]) {
        Logger::warn(self, message, fields);
    }

    #[track_caller]
    fn error(&self, message: &str, fields: &[Field]) {
        Logger::error(self, message, fields);
    }

    #[track_caller]
    fn dpanic(&self, message: &str, fields: &[Field]) {
        Logger::dpanic(self, message, fields);
    }

    #[track_caller]
    fn panic(&self, message: &str, fields: &[Field]) {
        Logger::panic(self, message, fields);
    }

    #[track_caller]
    fn fatal(&self, message: &str, fields: &[Field]) {
        Logger::fatal(self, message, fields);
    }
}

impl From<Logger> for Arc<dyn StructuredLog> {
    fn from(logger: Logger) -> Self {
        Arc::new(logger)
    }
}
