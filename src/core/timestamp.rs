//! Time and duration encodings
//!
//! The default time encoding is fixed-width RFC 3339 in UTC with exactly six
//! fractional digits, so lines stay aligned and sort lexically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How timestamps (record time and `Time` fields) are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoding {
    /// `2025-01-08T10:30:45.123456Z`
    #[default]
    Rfc3339Micro,

    /// `2025-01-08T10:30:45.123456789Z`
    Rfc3339Nano,

    /// Floating-point seconds since the epoch: `1736332245.123456`
    EpochSeconds,

    /// Integer milliseconds since the epoch: `1736332245123`
    EpochMillis,
}

impl TimeEncoding {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimeEncoding::Rfc3339Micro => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimeEncoding::Rfc3339Nano => datetime.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string(),
            TimeEncoding::EpochSeconds => {
                let micros = datetime.timestamp_micros();
                format!("{}", micros as f64 / 1_000_000.0)
            }
            TimeEncoding::EpochMillis => datetime.timestamp_millis().to_string(),
        }
    }
}

/// How `Duration` fields are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEncoding {
    /// Floating-point seconds: `0.374`
    #[default]
    Seconds,

    /// Integer milliseconds: `374`
    Millis,

    /// Integer nanoseconds: `374000000`
    Nanos,

    /// Human-readable: `374ms`
    String,
}

impl DurationEncoding {
    #[must_use]
    pub fn format(&self, duration: &Duration) -> String {
        match self {
            DurationEncoding::Seconds => format!("{}", duration.as_secs_f64()),
            DurationEncoding::Millis => duration.as_millis().to_string(),
            DurationEncoding::Nanos => duration.as_nanos().to_string(),
            DurationEncoding::String => format!("{:?}", duration),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_rfc3339_micro_format() {
        let result = TimeEncoding::Rfc3339Micro.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_rfc3339_micro_is_fixed_width() {
        let epoch = DateTime::<Utc>::from_timestamp(0, 0).expect("epoch");
        assert_eq!(
            TimeEncoding::Rfc3339Micro.format(&epoch),
            "1970-01-01T00:00:00.000000Z"
        );
    }

    #[test]
    fn test_rfc3339_nano_format() {
        let result = TimeEncoding::Rfc3339Nano.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456000Z");
    }

    #[test]
    fn test_epoch_formats() {
        let result = TimeEncoding::EpochMillis.format(&fixed_datetime());
        assert_eq!(result, "1736332245123");

        let result = TimeEncoding::EpochSeconds.format(&fixed_datetime());
        assert!(result.starts_with("1736332245.123"));
    }

    #[test]
    fn test_duration_formats() {
        let d = Duration::from_millis(374);
        assert_eq!(DurationEncoding::Seconds.format(&d), "0.374");
        assert_eq!(DurationEncoding::Millis.format(&d), "374");
        assert_eq!(DurationEncoding::Nanos.format(&d), "374000000");
        assert_eq!(DurationEncoding::String.format(&d), "374ms");
    }

    #[test]
    fn test_deserialization() {
        let enc: TimeEncoding = serde_json::from_str("\"rfc3339_nano\"").expect("deserialize");
        assert_eq!(enc, TimeEncoding::Rfc3339Nano);

        let enc: DurationEncoding = serde_json::from_str("\"millis\"").expect("deserialize");
        assert_eq!(enc, DurationEncoding::Millis);
    }
}
