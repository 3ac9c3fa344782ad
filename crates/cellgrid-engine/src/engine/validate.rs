//! Per-cell value constraints.
//!
//! [`validate`] is a pure query: it never touches a sheet, and storing a value
//! does not consult it. Callers that want to gate a write on validation do so
//! explicitly.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::parse_number;

/// What kind of value a cell accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationKind {
    Text,
    Number,
    Date,
    List,
}

/// The operand of a rule: a threshold/length as text, or a list of allowed values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationValue {
    Single(String),
    List(Vec<String>),
}

impl ValidationValue {
    /// Allowed values of a list rule. A single string is read as a
    /// comma-separated list.
    pub fn items(&self) -> Vec<String> {
        match self {
            ValidationValue::Single(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
            ValidationValue::List(items) => items.clone(),
        }
    }

    fn as_text(&self) -> String {
        match self {
            ValidationValue::Single(s) => s.clone(),
            ValidationValue::List(items) => items.join(","),
        }
    }
}

impl fmt::Display for ValidationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// A validation rule attached to a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    #[serde(rename = "type")]
    pub kind: ValidationKind,
    /// `greater` / `less` for numbers, `length` for text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValidationValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_blank: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_dropdown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Validation {
    pub fn new(kind: ValidationKind) -> Validation {
        Validation {
            kind,
            criteria: None,
            value: None,
            allow_blank: None,
            show_dropdown: None,
            error_message: None,
        }
    }

    pub fn with_criteria(mut self, criteria: &str, value: ValidationValue) -> Validation {
        self.criteria = Some(criteria.to_string());
        self.value = Some(value);
        self
    }

    fn operand_text(&self) -> String {
        self.value.as_ref().map(|v| v.as_text()).unwrap_or_default()
    }

    fn fail(&self, default_message: String) -> ValidationOutcome {
        ValidationOutcome {
            valid: false,
            message: Some(self.error_message.clone().unwrap_or(default_message)),
        }
    }
}

/// Result of checking a candidate value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    /// Present only when `valid` is false.
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> ValidationOutcome {
        ValidationOutcome {
            valid: true,
            message: None,
        }
    }
}

/// Check `candidate` against an optional rule.
pub fn validate(candidate: &str, rule: Option<&Validation>) -> ValidationOutcome {
    let Some(rule) = rule else {
        return ValidationOutcome::ok();
    };
    if rule.allow_blank == Some(true) && candidate.trim().is_empty() {
        return ValidationOutcome::ok();
    }

    match rule.kind {
        ValidationKind::Number => {
            let Some(number) = parse_number(candidate) else {
                return rule.fail("Value must be a number".to_string());
            };
            let threshold = parse_number(&rule.operand_text());
            match rule.criteria.as_deref() {
                Some("greater") if !threshold.is_some_and(|t| number > t) => rule.fail(format!(
                    "Value must be greater than {}",
                    rule.operand_text()
                )),
                Some("less") if !threshold.is_some_and(|t| number < t) => {
                    rule.fail(format!("Value must be less than {}", rule.operand_text()))
                }
                _ => ValidationOutcome::ok(),
            }
        }
        ValidationKind::Text => {
            if rule.criteria.as_deref() != Some("length") {
                return ValidationOutcome::ok();
            }
            let max_len = rule.operand_text().trim().parse::<usize>().ok();
            if max_len.is_some_and(|max| candidate.chars().count() <= max) {
                ValidationOutcome::ok()
            } else {
                rule.fail(format!(
                    "Text must be {} characters or less",
                    rule.operand_text()
                ))
            }
        }
        ValidationKind::Date => {
            if parse_date(candidate).is_some() {
                ValidationOutcome::ok()
            } else {
                rule.fail("Value must be a valid date".to_string())
            }
        }
        ValidationKind::List => {
            let allowed = rule.value.as_ref().map(|v| v.items()).unwrap_or_default();
            if allowed.iter().any(|item| item == candidate) {
                ValidationOutcome::ok()
            } else {
                rule.fail(format!("Value must be one of: {}", allowed.join(", ")))
            }
        }
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse text as a calendar date in one of the common spellings.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_rule(criteria: &str, threshold: &str) -> Validation {
        Validation::new(ValidationKind::Number)
            .with_criteria(criteria, ValidationValue::Single(threshold.to_string()))
    }

    #[test]
    fn test_no_rule_is_always_valid() {
        assert!(validate("anything", None).valid);
    }

    #[test]
    fn test_allow_blank() {
        let mut rule = Validation::new(ValidationKind::Number);
        assert!(!validate("  ", Some(&rule)).valid);
        rule.allow_blank = Some(true);
        assert!(validate("  ", Some(&rule)).valid);
    }

    #[test]
    fn test_number_rules() {
        let plain = Validation::new(ValidationKind::Number);
        assert!(validate("3.5", Some(&plain)).valid);
        let outcome = validate("abc", Some(&plain));
        assert!(!outcome.valid);
        assert_eq!(outcome.message.as_deref(), Some("Value must be a number"));

        let greater = number_rule("greater", "10");
        assert!(validate("11", Some(&greater)).valid);
        let outcome = validate("10", Some(&greater));
        assert_eq!(
            outcome.message.as_deref(),
            Some("Value must be greater than 10")
        );

        let less = number_rule("less", "0");
        assert!(validate("-1", Some(&less)).valid);
        assert!(!validate("0", Some(&less)).valid);
    }

    #[test]
    fn test_custom_message_wins() {
        let mut rule = number_rule("greater", "10");
        rule.error_message = Some("Too small".to_string());
        assert_eq!(
            validate("1", Some(&rule)).message.as_deref(),
            Some("Too small")
        );
    }

    #[test]
    fn test_text_length() {
        let rule = Validation::new(ValidationKind::Text)
            .with_criteria("length", ValidationValue::Single("3".to_string()));
        assert!(validate("abc", Some(&rule)).valid);
        let outcome = validate("abcd", Some(&rule));
        assert_eq!(
            outcome.message.as_deref(),
            Some("Text must be 3 characters or less")
        );
        assert!(validate("long text", Some(&Validation::new(ValidationKind::Text))).valid);
    }

    #[test]
    fn test_dates() {
        let rule = Validation::new(ValidationKind::Date);
        assert!(validate("2024-02-29", Some(&rule)).valid);
        assert!(validate("03/15/2024", Some(&rule)).valid);
        assert!(validate("March 5, 2024", Some(&rule)).valid);
        assert!(validate("2024-01-02T10:30:00Z", Some(&rule)).valid);
        assert!(!validate("2023-02-29", Some(&rule)).valid);
        assert!(!validate("yesterday", Some(&rule)).valid);
    }

    #[test]
    fn test_list_membership() {
        let rule = Validation::new(ValidationKind::List).with_criteria(
            "in",
            ValidationValue::List(vec!["Yes".to_string(), "No".to_string()]),
        );
        assert!(validate("Yes", Some(&rule)).valid);
        let outcome = validate("yes", Some(&rule));
        assert_eq!(outcome.message.as_deref(), Some("Value must be one of: Yes, No"));

        let csv = Validation::new(ValidationKind::List)
            .with_criteria("in", ValidationValue::Single("red, green".to_string()));
        assert!(validate("green", Some(&csv)).valid);
    }
}
