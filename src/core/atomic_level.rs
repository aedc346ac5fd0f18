//! Shared, runtime-adjustable level holder
//!
//! An [`AtomicLevel`] is read on every emit decision. Clones share the same
//! state, so handing a clone to an administrative endpoint and another to a
//! logger lets the endpoint change what the logger emits without a restart.

use super::level::Level;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AtomicLevel {
    level: Arc<AtomicU8>,
}

impl AtomicLevel {
    /// Create a holder at `Info`.
    #[must_use]
    pub fn new() -> Self {
        Self::new_at(Level::Info)
    }

    #[must_use]
    pub fn new_at(level: Level) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Release);
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level())
    }

    /// Whether two handles observe the same state.
    pub fn ptr_eq(&self, other: &AtomicLevel) -> bool {
        Arc::ptr_eq(&self.level, &other.level)
    }

    /// Answer a level-administration request.
    ///
    /// `GET` reports the current level, `PUT` with `{"level":"<name>"}` sets
    /// it. Both answer with `{"level":"<name>"}`. Failures answer with
    /// `{"error":"<reason>"}` and leave the level untouched.
    pub fn serve(&self, method: &str, body: &[u8]) -> LevelResponse {
        match method {
            "GET" => LevelResponse::level(200, self.level()),
            "PUT" => match serde_json::from_slice::<LevelPayload>(body) {
                Ok(LevelPayload { level: Some(level) }) => {
                    self.set_level(level);
                    LevelResponse::level(200, level)
                }
                Ok(LevelPayload { level: None }) => {
                    LevelResponse::error(400, "Must specify a logging level.")
                }
                Err(e) => LevelResponse::error(400, &e.to_string()),
            },
            _ => LevelResponse::error(405, "Only GET and PUT are supported."),
        }
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelPayload {
    #[serde(default)]
    level: Option<Level>,
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: &'a str,
}

/// Status code and JSON body produced by [`AtomicLevel::serve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelResponse {
    pub status: u16,
    pub body: String,
}

impl LevelResponse {
    fn level(status: u16, level: Level) -> Self {
        Self::json(status, &LevelPayload { level: Some(level) })
    }

    fn error(status: u16, reason: &str) -> Self {
        Self::json(status, &ErrorPayload { error: reason })
    }

    fn json<T: Serialize>(status: u16, payload: &T) -> Self {
        // Both payload types are plain string maps; serialization cannot fail.
        let body = serde_json::to_string(payload).unwrap_or_default();
        Self { status, body }
    }
}
