//! Log entry structure and the check-then-write handle

use super::field::Field;
use super::level::Level;
use super::level_core::LevelCore;
use super::pipeline::Core;
use super::timestamp::TimeEncoding;
use crate::sinks::Sink;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Source location of the application call that produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryCaller {
    pub file: &'static str,
    pub line: u32,
}

impl EntryCaller {
    /// `dir/file.rs:line`, keeping only the last two path components.
    pub fn short(&self) -> String {
        let mut cut = None;
        let mut seen = 0;
        for (idx, ch) in self.file.char_indices().rev() {
            if ch == '/' || ch == '\\' {
                seen += 1;
                if seen == 2 {
                    cut = Some(idx + 1);
                    break;
                }
            }
        }
        let file = cut.map_or(self.file, |idx| &self.file[idx..]);
        format!("{}:{}", file, self.line)
    }

    /// `path/to/file.rs:line` as compiled.
    pub fn full(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

impl From<&'static Location<'static>> for EntryCaller {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

impl fmt::Display for EntryCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub logger_name: Arc<str>,
    pub message: String,
    pub caller: Option<EntryCaller>,
    pub stack: Option<String>,
}

impl Entry {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            time: Utc::now(),
            logger_name: Arc::from(""),
            message: message.into(),
            caller: None,
            stack: None,
        }
    }
}

/// What happens after a checked entry has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminal {
    Continue,
    Panic,
    Exit(i32),
}

/// An entry that passed (or must act regardless of) the level check.
///
/// Obtained from `check`; fields are supplied only when writing, so a dropped
/// call never builds them. `Panic` and `Fatal` handles are handed out even
/// when their level is suppressed: writing them emits nothing but still
/// panics or exits.
#[must_use = "a checked entry does nothing until written"]
pub struct CheckedEntry {
    entry: Entry,
    core: Option<LevelCore>,
    terminal: Terminal,
    error_output: Arc<dyn Sink>,
}

impl CheckedEntry {
    pub(crate) fn new(
        entry: Entry,
        core: Option<LevelCore>,
        terminal: Terminal,
        error_output: Arc<dyn Sink>,
    ) -> Self {
        Self {
            entry,
            core,
            terminal,
            error_output,
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Whether writing will produce output.
    pub fn will_write(&self) -> bool {
        self.core.is_some()
    }

    /// Encode and write the entry with `fields` appended after the logger's
    /// own fields, then perform the level's terminal action.
    pub fn write(self, fields: &[Field]) {
        if let Some(ref core) = self.core {
            if let Err(e) = core.write(&self.entry, fields) {
                let line = format!(
                    "{} write error: {}\n",
                    TimeEncoding::Rfc3339Micro.format(&Utc::now()),
                    e
                );
                if self.error_output.write_all(line.as_bytes()).is_err() {
                    eprintln!("[LOGGER ERROR] failed to report write error: {}", e);
                }
                let _ = self.error_output.sync();
            }
        }

        match self.terminal {
            Terminal::Continue => {}
            Terminal::Panic => panic!("{}", self.entry.message),
            Terminal::Exit(code) => {
                if let Some(ref core) = self.core {
                    let _ = core.sync();
                }
                std::process::exit(code);
            }
        }
    }
}

impl fmt::Debug for CheckedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckedEntry")
            .field("entry", &self.entry)
            .field("will_write", &self.will_write())
            .field("terminal", &self.terminal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_caller() {
        let caller = EntryCaller {
            file: "src/core/logger.rs",
            line: 42,
        };
        assert_eq!(caller.short(), "core/logger.rs:42");
        assert_eq!(caller.full(), "src/core/logger.rs:42");

        let caller = EntryCaller {
            file: "main.rs",
            line: 7,
        };
        assert_eq!(caller.short(), "main.rs:7");

        let caller = EntryCaller {
            file: "tests\\integration_tests.rs",
            line: 3,
        };
        assert_eq!(caller.short(), "tests\\integration_tests.rs:3");
    }

    #[test]
    fn test_caller_from_location() {
        let caller = EntryCaller::from(Location::caller());
        assert!(caller.file.ends_with("entry.rs"));
        assert!(caller.line > 0);
    }

    #[test]
    fn test_new_entry() {
        let entry = Entry::new(Level::Warn, "disk almost full");
        assert_eq!(entry.level, Level::Warn);
        assert_eq!(entry.message, "disk almost full");
        assert!(entry.logger_name.is_empty());
        assert!(entry.caller.is_none());
        assert!(entry.stack.is_none());
    }
}
