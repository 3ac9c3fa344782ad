//! Computed cell values.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Text shown in place of a value when a formula fails to evaluate.
pub const ERROR_SENTINEL: &str = "#ERROR";

/// The result of evaluating a formula: a number or a string.
///
/// "No value" is expressed as `Option<Value>` at the use sites.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn error() -> Value {
        Value::Text(ERROR_SENTINEL.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Text(s) if s == ERROR_SENTINEL)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    /// Coerce to a number when the value is numeric-looking text; other
    /// values are returned unchanged.
    pub fn coerce_numeric(self) -> Value {
        match self {
            Value::Text(s) => match parse_number(&s) {
                Some(n) => Value::Number(n),
                None => Value::Text(s),
            },
            number => number,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
            .expect("number regex must compile")
    })
}

/// Parse text as a finite number. Surrounding whitespace is ignored; anything
/// else that is not part of a decimal literal makes the whole text non-numeric.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !number_re().is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
