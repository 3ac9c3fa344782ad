//! Spreadsheet engine API.
//!
//! This module provides the computation side of the spreadsheet:
//!
//! - [`Cell`], [`CellFormat`], [`Grid`] - Data structures for cell storage
//! - [`CellRef`] - Cell addressing (A1 notation ↔ row/col indices)
//! - [`expand_range`] - Range expansion, row-major
//! - [`evaluate_formula`] - Formula evaluation against a grid
//! - [`validate`] - Per-cell value constraints
//! - [`format_value`] - Format values for display

mod arith;
mod cell;
mod cell_ref;
mod error;
mod eval;
mod format;
mod range;
mod validate;
mod value;

pub use arith::evaluate_arithmetic;
pub use cell::{Align, Cell, CellFormat, CellFormatPatch, Grid, NumberFormat};
pub use cell_ref::{CellRef, column_to_ordinal, is_reference, ordinal_to_column, parse_address};
pub use error::{AddressFormatError, FormulaError, FormulaResult};
pub use eval::{evaluate_formula, resolve_argument, resolve_reference, split_arguments};
pub use format::{format_currency, format_value};
pub use range::{expand_range, parse_range, range_cells};
pub use validate::{
    Validation, ValidationKind, ValidationOutcome, ValidationValue, parse_date, validate,
};
pub use value::{ERROR_SENTINEL, Value, parse_number};
