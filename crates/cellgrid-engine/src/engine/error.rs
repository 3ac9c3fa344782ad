//! Error types for the engine.

use thiserror::Error;

/// A cell identifier that is not `<columnLetters><rowNumber>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid cell address '{input}': {reason}")]
pub struct AddressFormatError {
    pub input: String,
    pub reason: &'static str,
}

impl AddressFormatError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        AddressFormatError {
            input: input.to_string(),
            reason,
        }
    }
}

/// Failures inside formula evaluation.
///
/// These never leave [`evaluate_formula`](super::evaluate_formula); they are
/// turned into the `#ERROR` sentinel at that boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Result is not a finite number")]
    NotFinite,
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;
