//! Logging macros with lazily built fields.
//!
//! Fields listed after `;` are only constructed when the entry is going to be
//! written, so a suppressed call costs a level check and nothing else.
//!
//! # Examples
//!
//! ```
//! use kvlog::prelude::*;
//! use kvlog::{info, warn};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).build();
//!
//! // Message only
//! info!(logger, "server started");
//!
//! // With fields
//! let port = 8080;
//! warn!(logger, "port in use"; "port" => port, "retry" => true);
//!
//! assert!(sink.lines()[1].ends_with("[msg:port in use][port:8080][retry:true]"));
//! ```

/// Log at an explicit level.
///
/// Works with a [`Logger`](crate::Logger) or any
/// [`StructuredLog`](crate::StructuredLog) handle.
///
/// # Examples
///
/// ```
/// # use kvlog::prelude::*;
/// # let logger = Logger::nop();
/// use kvlog::log;
/// log!(logger, Level::Info, "simple message");
/// log!(logger, Level::Error, "request failed"; "status" => 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(; $($key:expr => $value:expr),* $(,)?)?) => {
        if let ::std::option::Option::Some(ce) = $logger.check($level, $msg) {
            ce.write(&[$($($crate::Field::new($key, $value)),*)?]);
        }
    };
}

/// Log a debug-level message.
///
/// ```
/// # use kvlog::prelude::*;
/// # let logger = Logger::nop();
/// use kvlog::debug;
/// debug!(logger, "cache state"; "entries" => 10u64);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// # use kvlog::prelude::*;
/// # let logger = Logger::nop();
/// use kvlog::error;
/// let err = std::io::Error::other("disk full");
/// error!(logger, "write failed"; "error" => err.to_string());
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log at `DPanic`; panics afterwards on a development logger.
#[macro_export]
macro_rules! dpanic {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DPanic, $($arg)+)
    };
}

/// Log at `Panic`, then panic even if the level is disabled.
///
/// Named so it never shadows `std::panic!`.
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Panic, $($arg)+)
    };
}

/// Log at `Fatal`, then run the logger's [`FatalAction`](crate::FatalAction).
///
/// ```no_run
/// # use kvlog::prelude::*;
/// # let logger = Logger::nop();
/// use kvlog::fatal;
/// fatal!(logger, "unable to recover"; "reason" => "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}

/// Key/value pairs for the sugared logger.
///
/// ```
/// use kvlog::{kv, Value};
///
/// let pairs = kv!["user" => "ana", "age" => 31];
/// assert_eq!(pairs[1], ("age", Value::Int(31)));
/// ```
#[macro_export]
macro_rules! kv {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let pairs: ::std::vec::Vec<(&'static str, $crate::Value)> =
            ::std::vec![$(($key, $crate::Value::from($value))),*];
        pairs
    }};
}
