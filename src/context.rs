//! Request-scoped logger propagation
//!
//! A [`Context`] is an immutable bag of typed values handed down a call chain.
//! [`attach`] stores a logger in it; everything below reads the logger back
//! with the free functions of this module instead of taking it as a
//! parameter. Deriving functions (`named`, `with`, `with_level`) return a new
//! context and leave the one they were given untouched.
//!
//! When no logger was attached, the process-wide default logger is used. It
//! discards everything until replaced with [`set_default_logger`].
//!
//! ```
//! use kvlog::{context, Context, Field, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).build();
//!
//! let cx = context::attach(&Context::background(), logger);
//! let cx = context::with(&cx, &[Field::string("request_id", "42")]);
//! context::info(&cx, "handled", &[]);
//!
//! assert!(sink.lines()[0].ends_with("[msg:handled][request_id:42]"));
//! ```

use crate::core::{CheckedEntry, Field, Level, Logger, StructuredLog, SugaredLogger};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, LazyLock};

struct Node {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// Immutable chain of typed values. Cloning is a reference count bump.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// A child context holding `value`, shadowing any value of the same type
    /// further up the chain.
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<T>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The nearest value of type `T`.
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        let key = TypeId::of::<T>();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return n.value.downcast_ref::<T>();
            }
            node = n.parent.as_deref();
        }
        None
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.depth())
            .field("has_logger", &self.value::<ActiveLogger>().is_some())
            .finish()
    }
}

#[derive(Clone)]
struct ActiveLogger(Arc<dyn StructuredLog>);

static DEFAULT_LOGGER: LazyLock<RwLock<Arc<dyn StructuredLog>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Logger::nop())));

/// The logger used for contexts with nothing attached.
pub fn default_logger() -> Arc<dyn StructuredLog> {
    Arc::clone(&DEFAULT_LOGGER.read())
}

/// Replace the default logger, returning the previous one.
///
/// Contexts that already resolved the default keep what they got; only later
/// lookups see the new logger.
pub fn set_default_logger(logger: impl Into<Arc<dyn StructuredLog>>) -> Arc<dyn StructuredLog> {
    std::mem::replace(&mut *DEFAULT_LOGGER.write(), logger.into())
}

/// Child of `cx` whose active logger is `logger`.
///
/// Callers are reported correctly through the free functions below without
/// any adjustment: every emit path forwards its call site.
#[must_use]
pub fn attach(cx: &Context, logger: impl Into<Arc<dyn StructuredLog>>) -> Context {
    cx.with_value(ActiveLogger(logger.into()))
}

/// The active logger, or the default logger if none was attached.
pub fn logger(cx: &Context) -> Arc<dyn StructuredLog> {
    match cx.value::<ActiveLogger>() {
        Some(active) => Arc::clone(&active.0),
        None => default_logger(),
    }
}

/// Attach a child of the active logger with `segment` appended to its name.
#[must_use]
pub fn named(cx: &Context, segment: &str) -> Context {
    attach(cx, logger(cx).named(segment))
}

/// Attach a child of the active logger that carries `fields`.
#[must_use]
pub fn with(cx: &Context, fields: &[Field]) -> Context {
    attach(cx, logger(cx).with(fields))
}

/// Attach a child of the active logger pinned to `level`.
#[must_use]
pub fn with_level(cx: &Context, level: Level) -> Context {
    attach(cx, logger(cx).with_level(level))
}

#[track_caller]
pub fn check(cx: &Context, level: Level, message: &str) -> Option<CheckedEntry> {
    logger(cx).check(level, message)
}

pub fn sugar(cx: &Context) -> SugaredLogger {
    logger(cx).sugar()
}

#[track_caller]
pub fn debug(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).debug(message, fields);
}

#[track_caller]
pub fn info(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).info(message, fields);
}

#[track_caller]
pub fn warn(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).warn(message, fields);
}

#[track_caller]
pub fn error(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).error(message, fields);
}

/// Logs at `DPanic`; panics afterwards if the active logger is in
/// development mode.
#[track_caller]
pub fn dpanic(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).dpanic(message, fields);
}

/// Logs at `Panic`, then panics even if the level is disabled.
#[track_caller]
pub fn panic(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).panic(message, fields);
}

/// Logs at `Fatal`, then exits even if the level is disabled.
#[track_caller]
pub fn fatal(cx: &Context, message: &str, fields: &[Field]) {
    logger(cx).fatal(message, fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    #[derive(Debug, PartialEq)]
    struct RequestId(&'static str);

    fn memory_logger(level: Level) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .min_level(level)
            .sink(sink.clone())
            .disable_stacktrace()
            .build();
        (logger, sink)
    }

    #[test]
    fn test_values_are_shadowed_not_replaced() {
        let root = Context::background();
        let a = root.with_value(RequestId("a"));
        let b = a.with_value(RequestId("b")).with_value(7u32);

        assert_eq!(root.value::<RequestId>(), None);
        assert_eq!(a.value::<RequestId>(), Some(&RequestId("a")));
        assert_eq!(b.value::<RequestId>(), Some(&RequestId("b")));
        assert_eq!(b.value::<u32>(), Some(&7));
        assert_eq!(b.depth(), 3);
    }

    #[test]
    fn test_derivations_leave_input_untouched() {
        let (logger, sink) = memory_logger(Level::Info);
        let cx = attach(&Context::background(), logger);
        let child = named(&with(&cx, &[Field::string("k", "v")]), "child");

        info(&cx, "parent", &[]);
        info(&child, "child", &[]);

        let lines = sink.lines();
        assert!(!lines[0].contains("[logger:"));
        assert!(lines[0].ends_with("[msg:parent]"));
        assert!(lines[1].contains("[logger:child]"));
        assert!(lines[1].ends_with("[msg:child][k:v]"));
    }

    #[test]
    fn test_with_level_through_context() {
        let (logger, sink) = memory_logger(Level::Info);
        let cx = attach(&Context::background(), logger);
        let verbose = with_level(&cx, Level::Debug);

        debug(&cx, "hidden", &[]);
        debug(&verbose, "shown", &[]);
        assert!(check(&cx, Level::Debug, "x").is_none());
        assert!(check(&verbose, Level::Debug, "x").is_some());

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[msg:shown]"));
    }

    #[test]
    fn test_caller_through_free_functions() {
        let (logger, sink) = memory_logger(Level::Info);
        let cx = attach(&Context::background(), logger);
        let line = line!() + 1;
        warn(&cx, "here", &[]);
        assert!(sink.lines()[0].contains(&format!("[caller:src/context.rs:{}]", line)));
    }

    #[test]
    fn test_sugar_from_context() {
        let (logger, sink) = memory_logger(Level::Debug);
        let cx = attach(&Context::background(), logger);
        sugar(&cx).debugw("msg", [("string_key", "value")]);
        assert!(sink.lines()[0].ends_with("[msg:msg][string_key:value]"));
    }
}
