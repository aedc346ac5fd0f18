//! Typed key-value fields attached to log entries

use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt;
use std::time::{Duration, SystemTime};

/// Value carried by a [`Field`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Textual message of an error.
    Error(String),
    /// Pre-rendered `Display` output of an arbitrary value.
    Display(String),
    /// Pre-rendered `Debug` dump of an arbitrary value.
    Reflect(String),
}

/// A structured key-value pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: Cow<'static, str>,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<Cow<'static, str>>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<Cow<'static, str>>, value: impl Into<i64>) -> Self {
        Self::new(key, Value::Int(value.into()))
    }

    pub fn uint(key: impl Into<Cow<'static, str>>, value: impl Into<u64>) -> Self {
        Self::new(key, Value::Uint(value.into()))
    }

    pub fn float(key: impl Into<Cow<'static, str>>, value: f64) -> Self {
        Self::new(key, Value::Float(value))
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn duration(key: impl Into<Cow<'static, str>>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<Cow<'static, str>>, value: impl Into<DateTime<Utc>>) -> Self {
        Self::new(key, Value::Time(value.into()))
    }

    /// An error under the conventional `error` key.
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        Self::named_error("error", err)
    }

    pub fn named_error(key: impl Into<Cow<'static, str>>, err: &(dyn std::error::Error + '_)) -> Self {
        Self::new(key, Value::Error(err.to_string()))
    }

    /// Any `Display` value, rendered eagerly.
    pub fn display(key: impl Into<Cow<'static, str>>, value: &dyn fmt::Display) -> Self {
        Self::new(key, Value::Display(value.to_string()))
    }

    /// Any `Debug` value, dumped eagerly in compact form.
    pub fn reflect(key: impl Into<Cow<'static, str>>, value: &dyn fmt::Debug) -> Self {
        Self::new(key, Value::Reflect(format!("{:?}", value)))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(s: Cow<'_, str>) -> Self {
        Value::String(s.into_owned())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<SystemTime> for Value {
    fn from(v: SystemTime) -> Self {
        Value::Time(v.into())
    }
}
