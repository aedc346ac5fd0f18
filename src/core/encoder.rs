//! Bracketed key-value line encoder
//!
//! Every record becomes one line of `[key:value]` segments:
//!
//! ```text
//! [ts:2019-04-01T17:19:16.290081Z][level:warn][logger:api.users][caller:src/handler.rs:97][msg:slow query][elapsed:0.374]
//! ```
//!
//! Segment order is fixed: time, level, logger name (only when non-empty),
//! caller, message, accumulated fields in the order they were added, call-site
//! fields, and finally the stack trace when one was captured. Keys and values
//! are written verbatim except that raw `\n` and `\r` become `\\n` and `\\r`,
//! so a record never spans lines outside its stack trace segment.

use super::entry::Entry;
use super::field::{Field, Value};
use super::level::Level;
use super::timestamp::{DurationEncoding, TimeEncoding};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How the level segment is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoding {
    /// `info`
    #[default]
    Lowercase,
    /// `INFO`
    Capital,
    /// `INFO` wrapped in terminal color codes (plain `Capital` without the
    /// `console` feature)
    CapitalColor,
}

impl LevelEncoding {
    pub fn format(&self, level: Level) -> String {
        match self {
            LevelEncoding::Lowercase => level.as_str().to_string(),
            LevelEncoding::Capital => level.as_capital_str().to_string(),
            #[cfg(feature = "console")]
            LevelEncoding::CapitalColor => {
                use colored::Colorize;
                level.as_capital_str().color(level.color()).to_string()
            }
            #[cfg(not(feature = "console"))]
            LevelEncoding::CapitalColor => level.as_capital_str().to_string(),
        }
    }
}

/// How the caller segment is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallerEncoding {
    /// `core/logger.rs:42`
    #[default]
    Short,
    /// `src/core/logger.rs:42`
    Full,
}

/// Segment keys and value encodings. An empty key drops its segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
    pub level_encoding: LevelEncoding,
    pub time_encoding: TimeEncoding,
    pub duration_encoding: DurationEncoding,
    pub caller_encoding: CallerEncoding,
    pub line_ending: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            level_encoding: LevelEncoding::Lowercase,
            time_encoding: TimeEncoding::Rfc3339Micro,
            duration_encoding: DurationEncoding::Seconds,
            caller_encoding: CallerEncoding::Short,
            line_ending: "\n".to_string(),
        }
    }
}

impl EncoderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level_encoding(mut self, encoding: LevelEncoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_time_encoding(mut self, encoding: TimeEncoding) -> Self {
        self.time_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_duration_encoding(mut self, encoding: DurationEncoding) -> Self {
        self.duration_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_caller_encoding(mut self, encoding: CallerEncoding) -> Self {
        self.caller_encoding = encoding;
        self
    }
}

/// Encoder with its accumulated fields already rendered.
///
/// Cloning copies the rendered fields, so adding fields to a clone never
/// shows up in the original.
#[derive(Debug, Clone)]
pub struct KeyValueEncoder {
    config: Arc<EncoderConfig>,
    context: String,
}

impl KeyValueEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config: Arc::new(config),
            context: String::new(),
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Render `fields` once and keep them for every later entry.
    pub fn add_fields(&mut self, fields: &[Field]) {
        let mut context = std::mem::take(&mut self.context);
        for field in fields {
            self.push_field(&mut context, field);
        }
        self.context = context;
    }

    /// One complete line, including the configured line ending.
    pub fn encode_entry(&self, entry: &Entry, fields: &[Field]) -> String {
        let cfg = &*self.config;
        let mut buf = String::with_capacity(128 + self.context.len() + entry.message.len());

        if !cfg.time_key.is_empty() {
            push_segment(&mut buf, &cfg.time_key, &cfg.time_encoding.format(&entry.time));
        }
        if !cfg.level_key.is_empty() {
            push_segment(&mut buf, &cfg.level_key, &cfg.level_encoding.format(entry.level));
        }
        if !cfg.name_key.is_empty() && !entry.logger_name.is_empty() {
            push_segment(&mut buf, &cfg.name_key, &entry.logger_name);
        }
        if let Some(caller) = entry.caller {
            if !cfg.caller_key.is_empty() {
                let rendered = match cfg.caller_encoding {
                    CallerEncoding::Short => caller.short(),
                    CallerEncoding::Full => caller.full(),
                };
                push_segment(&mut buf, &cfg.caller_key, &rendered);
            }
        }
        if !cfg.message_key.is_empty() {
            push_segment(&mut buf, &cfg.message_key, &entry.message);
        }

        buf.push_str(&self.context);
        for field in fields {
            self.push_field(&mut buf, field);
        }

        if let Some(ref stack) = entry.stack {
            if !cfg.stacktrace_key.is_empty() {
                buf.push('[');
                buf.push_str(&cfg.stacktrace_key);
                buf.push(':');
                buf.push_str(stack.trim_end_matches(['\n', '\r']));
                buf.push(']');
            }
        }

        buf.push_str(&cfg.line_ending);
        buf
    }

    fn push_field(&self, buf: &mut String, field: &Field) {
        let cfg = &*self.config;
        match field.value {
            Value::String(ref s)
            | Value::Error(ref s)
            | Value::Display(ref s)
            | Value::Reflect(ref s) => push_segment(buf, &field.key, s),
            Value::Int(i) => push_segment(buf, &field.key, &i.to_string()),
            Value::Uint(u) => push_segment(buf, &field.key, &u.to_string()),
            Value::Float(f) => push_segment(buf, &field.key, &f.to_string()),
            Value::Bool(b) => push_segment(buf, &field.key, if b { "true" } else { "false" }),
            Value::Duration(ref d) => {
                push_segment(buf, &field.key, &cfg.duration_encoding.format(d))
            }
            Value::Time(ref t) => push_segment(buf, &field.key, &cfg.time_encoding.format(t)),
        }
    }
}

fn push_segment(buf: &mut String, key: &str, value: &str) {
    buf.push('[');
    push_escaped(buf, key);
    buf.push(':');
    push_escaped(buf, value);
    buf.push(']');
}

fn push_escaped(buf: &mut String, s: &str) {
    if !s.contains(['\n', '\r']) {
        buf.push_str(s);
        return;
    }
    for ch in s.chars() {
        match ch {
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            _ => buf.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::EntryCaller;
    use chrono::{DateTime, TimeZone, Utc};
    use std::time::Duration;

    fn fixed_entry(level: Level, message: &str) -> Entry {
        let mut entry = Entry::new(level, message);
        entry.time = Utc
            .with_ymd_and_hms(2019, 4, 1, 15, 39, 9)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(142773);
        entry.caller = Some(EntryCaller {
            file: "src/log/logger_test.rs",
            line: 21,
        });
        entry
    }

    #[test]
    fn test_minimal_line() {
        let enc = KeyValueEncoder::new(EncoderConfig::default());
        let line = enc.encode_entry(&fixed_entry(Level::Debug, "m"), &[]);
        assert_eq!(
            line,
            "[ts:2019-04-01T15:39:09.142773Z][level:debug][caller:log/logger_test.rs:21][msg:m]\n"
        );
    }

    #[test]
    fn test_logger_segment_only_when_named() {
        let enc = KeyValueEncoder::new(EncoderConfig::default());
        let mut entry = fixed_entry(Level::Warn, "my Warn message");
        entry.logger_name = Arc::from("first_level.second_level");
        let line = enc.encode_entry(&entry, &[]);
        assert!(line.contains(
            "[level:warn][logger:first_level.second_level][caller:log/logger_test.rs:21][msg:my Warn message]"
        ));
    }

    #[test]
    fn test_field_values() {
        let enc = KeyValueEncoder::new(EncoderConfig::default());
        let err = std::io::Error::new(std::io::ErrorKind::Other, "my error");
        let epoch = DateTime::<Utc>::from_timestamp(0, 0).expect("epoch");
        let fields = [
            Field::string("string_key", "value"),
            Field::time("time_key", epoch),
            Field::int("int64_key", 1234_i64),
            Field::float("float64_key", 1234.5678),
            Field::error(&err),
            Field::duration("duration_key", Duration::from_millis(374)),
            Field::bool("ok", true),
            Field::uint("count", 7_u32),
        ];
        let line = enc.encode_entry(&fixed_entry(Level::Debug, "my Debug message"), &fields);
        assert!(line.ends_with(
            "[msg:my Debug message][string_key:value][time_key:1970-01-01T00:00:00.000000Z]\
             [int64_key:1234][float64_key:1234.5678][error:my error][duration_key:0.374]\
             [ok:true][count:7]\n"
        ));
    }

    #[test]
    fn test_context_fields_precede_call_site_fields() {
        let mut enc = KeyValueEncoder::new(EncoderConfig::default());
        enc.add_fields(&[Field::string("request_id", "abc")]);
        let mut child = enc.clone();
        child.add_fields(&[Field::int("attempt", 2_i32)]);

        let entry = fixed_entry(Level::Info, "m");
        let line = child.encode_entry(&entry, &[Field::string("extra", "x")]);
        assert!(line.ends_with("[msg:m][request_id:abc][attempt:2][extra:x]\n"));

        // The parent never sees the child's fields.
        let line = enc.encode_entry(&entry, &[]);
        assert!(line.ends_with("[msg:m][request_id:abc]\n"));
    }

    #[test]
    fn test_newlines_are_escaped_outside_stacktrace() {
        let enc = KeyValueEncoder::new(EncoderConfig::default());
        let mut entry = fixed_entry(Level::Error, "line one\nline two\r");
        entry.stack = Some("frame 0\nframe 1\n".to_string());
        let line = enc.encode_entry(&entry, &[Field::string("multi\nkey", "a\nb")]);

        assert!(line.contains("[msg:line one\\nline two\\r]"));
        assert!(line.contains("[multi\\nkey:a\\nb]"));
        assert!(line.ends_with("[stacktrace:frame 0\nframe 1]\n"));
        assert_eq!(line.matches('\n').count(), 2);
    }

    #[test]
    fn test_custom_config() {
        let mut cfg = EncoderConfig::new()
            .with_level_encoding(LevelEncoding::Capital)
            .with_caller_encoding(CallerEncoding::Full)
            .with_duration_encoding(DurationEncoding::Millis);
        cfg.time_key = String::new();
        cfg.line_ending = "\r\n".to_string();

        let enc = KeyValueEncoder::new(cfg);
        let line = enc.encode_entry(
            &fixed_entry(Level::Info, "m"),
            &[Field::duration("elapsed", Duration::from_millis(374))],
        );
        assert_eq!(
            line,
            "[level:INFO][caller:src/log/logger_test.rs:21][msg:m][elapsed:374]\r\n"
        );
    }

    #[test]
    fn test_config_from_json() {
        let cfg: EncoderConfig =
            serde_json::from_str(r#"{"level_encoding":"capital","message_key":"message"}"#)
                .expect("deserialize");
        assert_eq!(cfg.level_encoding, LevelEncoding::Capital);
        assert_eq!(cfg.message_key, "message");
        assert_eq!(cfg.time_key, "ts");
    }
}
