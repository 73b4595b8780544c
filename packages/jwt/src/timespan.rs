//! Human-readable time spans ("10 seconds", "-5m", "3 days from now")
//!
//! Leeway and max-age options accept either a plain number of seconds or one
//! of these strings; both resolve to signed whole seconds.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

const MINUTE: f64 = 60.0;
const HOUR: f64 = MINUTE * 60.0;
const DAY: f64 = HOUR * 24.0;
const WEEK: f64 = DAY * 7.0;
const YEAR: f64 = DAY * 365.25;

static TIME_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^([+-])?([0-9]+|[0-9]+\.[0-9]+) ?(seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d|weeks?|w|years?|yrs?|y)(?: (ago|from now))?$",
    )
    .expect("time span pattern is valid")
});

/// Time-span parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSpanError {
    /// String does not match the time-span grammar
    #[error("Invalid time span: {0:?}")]
    Invalid(String),
    /// Value is neither a number nor a string
    #[error("Time span must be a number or a string, got {0}")]
    NotATimeSpan(&'static str),
    /// Resolved seconds do not fit in an `i64`
    #[error("Time span out of range: {0:?}")]
    OutOfRange(String),
}

/// Parse a time span into signed seconds.
///
/// `"2 minutes"` is `120`, `"2 minutes ago"` and `"-2 minutes"` are `-120`,
/// `"2.5m"` is `150`. A leading sign combined with `ago`/`from now` is
/// rejected as ambiguous. Fractions round half up on the magnitude.
pub fn parse(input: &str) -> Result<i64, TimeSpanError> {
    let caps = TIME_SPAN
        .captures(input)
        .ok_or_else(|| TimeSpanError::Invalid(input.to_string()))?;

    let sign = caps.get(1).map(|m| m.as_str());
    let qualifier = caps.get(4).map(|m| m.as_str().to_ascii_lowercase());
    if sign.is_some() && qualifier.is_some() {
        return Err(TimeSpanError::Invalid(input.to_string()));
    }

    let amount: f64 = caps[2]
        .parse()
        .map_err(|_| TimeSpanError::Invalid(input.to_string()))?;
    let unit = unit_seconds(&caps[3]).ok_or_else(|| TimeSpanError::Invalid(input.to_string()))?;

    let magnitude = (amount * unit).round();
    if !magnitude.is_finite() || magnitude >= i64::MAX as f64 {
        return Err(TimeSpanError::OutOfRange(input.to_string()));
    }
    let magnitude = magnitude as i64;

    let negative = sign == Some("-") || qualifier.as_deref() == Some("ago");
    Ok(if negative { -magnitude } else { magnitude })
}

fn unit_seconds(unit: &str) -> Option<f64> {
    match unit.to_ascii_lowercase().as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => Some(1.0),
        "m" | "min" | "mins" | "minute" | "minutes" => Some(MINUTE),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(HOUR),
        "d" | "day" | "days" => Some(DAY),
        "w" | "week" | "weeks" => Some(WEEK),
        "y" | "yr" | "yrs" | "year" | "years" => Some(YEAR),
        // (?i) also folds a few non-ASCII letters onto the unit names
        _ => None,
    }
}

/// A duration given either as whole seconds or as a time-span string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeSpan {
    /// Signed whole seconds
    Seconds(i64),
    /// Unparsed time-span string
    Text(String),
}

impl TimeSpan {
    /// Resolve to signed seconds
    pub fn seconds(&self) -> Result<i64, TimeSpanError> {
        match self {
            TimeSpan::Seconds(secs) => Ok(*secs),
            TimeSpan::Text(text) => parse(text),
        }
    }
}

impl Default for TimeSpan {
    fn default() -> Self {
        TimeSpan::Seconds(0)
    }
}

impl From<i64> for TimeSpan {
    fn from(secs: i64) -> Self {
        TimeSpan::Seconds(secs)
    }
}

impl From<i32> for TimeSpan {
    fn from(secs: i32) -> Self {
        TimeSpan::Seconds(i64::from(secs))
    }
}

impl From<&str> for TimeSpan {
    fn from(text: &str) -> Self {
        TimeSpan::Text(text.to_string())
    }
}

impl From<String> for TimeSpan {
    fn from(text: String) -> Self {
        TimeSpan::Text(text)
    }
}

impl From<chrono::Duration> for TimeSpan {
    fn from(duration: chrono::Duration) -> Self {
        TimeSpan::Seconds(duration.num_seconds())
    }
}

/// Loosely-typed input (e.g. a config value). Booleans are rejected even
/// though JSON tooling elsewhere may treat them as 0/1.
impl TryFrom<&Value> for TimeSpan {
    type Error = TimeSpanError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => {
                if let Some(secs) = n.as_i64() {
                    Ok(TimeSpan::Seconds(secs))
                } else {
                    let secs = n.as_f64().map(f64::trunc).filter(|s| {
                        s.is_finite() && *s > i64::MIN as f64 && *s < i64::MAX as f64
                    });
                    secs.map(|s| TimeSpan::Seconds(s as i64))
                        .ok_or_else(|| TimeSpanError::OutOfRange(n.to_string()))
                }
            }
            Value::String(text) => Ok(TimeSpan::Text(text.clone())),
            Value::Bool(_) => Err(TimeSpanError::NotATimeSpan("a boolean")),
            Value::Null => Err(TimeSpanError::NotATimeSpan("null")),
            Value::Array(_) => Err(TimeSpanError::NotATimeSpan("an array")),
            Value::Object(_) => Err(TimeSpanError::NotATimeSpan("an object")),
        }
    }
}
