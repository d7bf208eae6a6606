//! Scalar coercion for element text and XML attribute values.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A scalar read from the document: its trimmed source text and the
/// typed reading of that text.
///
/// Text slots take the source text as written; typed slots take the
/// coerced reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    text: String,
    scalar: Scalar,
}

/// The typed reading of a scalar's text.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Int(i64),
    Float(f64),
    /// Nothing more specific than text.
    Text,
}

fn timestamp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d\d-\d\dT\d\d:\d\d:\d\d(\.\d{1,9})?(Z|[+-]\d\d:\d\d)$")
            .expect("timestamp pattern is a valid regex")
    })
}

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+$").expect("float pattern is a valid regex"))
}

impl Value {
    /// Coerces raw text. First match wins: boolean literal, timestamp,
    /// integer, float, then the trimmed text itself.
    pub fn coerce(raw: &str) -> Value {
        let text = raw.trim();
        Value {
            scalar: Scalar::read(text),
            text: text.to_owned(),
        }
    }

    pub fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// The trimmed source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl Scalar {
    fn read(text: &str) -> Scalar {
        match text {
            "true" => return Scalar::Bool(true),
            "false" => return Scalar::Bool(false),
            _ => {}
        }

        if timestamp_pattern().is_match(text) {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                return Scalar::Timestamp(parsed.with_timezone(&Utc));
            }
        }

        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            // Overflowing ids stay as text rather than being truncated
            return match text.parse::<i64>() {
                Ok(n) => Scalar::Int(n),
                Err(_) => Scalar::Text,
            };
        }

        if float_pattern().is_match(text) {
            if let Ok(f) = text.parse::<f64>() {
                return Scalar::Float(f);
            }
        }

        Scalar::Text
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Conversion from a coerced value into a typed record slot.
///
/// Returns `None` when the value cannot fill the slot; the walker then
/// drops it like any other unknown field.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        Some(value.into_text())
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Option<Self> {
        match value.scalar {
            Scalar::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> Option<Self> {
        match value.scalar {
            Scalar::Int(n) => u32::try_from(n).ok(),
            _ => None,
        }
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Option<Self> {
        match value.scalar {
            Scalar::Int(n) => u64::try_from(n).ok(),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        match value.scalar {
            Scalar::Float(x) => Some(x),
            Scalar::Int(n) => Some(n as f64),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value.scalar {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Option<Self> {
        match value.scalar {
            Scalar::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

/// Overwrites a singular slot. Last write wins.
pub fn store<T: FromValue>(slot: &mut Option<T>, value: Value) {
    match T::from_value(value) {
        Some(v) => *slot = Some(v),
        None => tracing::trace!("Dropping value that does not fit its slot"),
    }
}

/// Appends to a collection slot in document order.
pub fn append<T: FromValue>(slot: &mut Vec<T>, value: Value) {
    match T::from_value(value) {
        Some(v) => slot.push(v),
        None => tracing::trace!("Dropping value that does not fit its collection"),
    }
}
