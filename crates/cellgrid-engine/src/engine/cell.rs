//! Cell data structures for the spreadsheet grid.
//!
//! - [`Cell`] - raw text, formula text, cached computed value, format and
//!   optional validation rule
//! - [`CellFormat`] / [`CellFormatPatch`] - presentation attributes and partial updates
//! - [`Grid`] - sparse storage keyed by [`CellRef`], iterated row-major

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell_ref::CellRef;
use super::validate::Validation;
use super::value::Value;

/// Horizontal alignment of a cell's content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// How a cell's computed value is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    General,
    Currency,
    Percent,
    Date,
}

/// Presentation attributes of a cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    pub bold: bool,
    pub italic: bool,
    pub font_size: f64,
    pub color: String,
    #[serde(default)]
    pub align: Align,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<NumberFormat>,
}

impl Default for CellFormat {
    fn default() -> Self {
        CellFormat {
            bold: false,
            italic: false,
            font_size: 12.0,
            color: "#000000".to_string(),
            align: Align::Left,
            number_format: None,
        }
    }
}

/// A partial [`CellFormat`]; only the fields that are set are applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellFormatPatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub align: Option<Align>,
    pub number_format: Option<NumberFormat>,
}

impl CellFormatPatch {
    pub fn apply(&self, format: &mut CellFormat) {
        if let Some(bold) = self.bold {
            format.bold = bold;
        }
        if let Some(italic) = self.italic {
            format.italic = italic;
        }
        if let Some(size) = self.font_size {
            format.font_size = size;
        }
        if let Some(color) = &self.color {
            format.color = color.clone();
        }
        if let Some(align) = self.align {
            format.align = align;
        }
        if let Some(number_format) = self.number_format {
            format.number_format = Some(number_format);
        }
    }
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// Text as typed; a leading `=` marks a formula.
    pub value: String,
    /// Same as `value` for formula cells, empty otherwise.
    pub formula: String,
    pub format: CellFormat,
    /// Cached evaluation result; only formula cells carry one.
    pub computed: Option<Value>,
    /// Set by the first recalculation pass, cleared by the second.
    pub dirty: bool,
    pub validation: Option<Validation>,
}

impl Cell {
    /// Whether the raw value is a formula.
    pub fn is_formula(&self) -> bool {
        self.value.starts_with('=')
    }

    /// The formula body (text after `=`), if this is a formula cell.
    pub fn formula_body(&self) -> Option<&str> {
        self.value.strip_prefix('=')
    }

    /// Replace the raw value, keeping `formula` in step with it.
    ///
    /// `computed` is cleared for non-formula values; formula values keep their
    /// previous result until they are evaluated.
    pub fn set_raw(&mut self, raw: &str) {
        self.value = raw.to_string();
        if self.is_formula() {
            self.formula = raw.to_string();
        } else {
            self.formula.clear();
            self.computed = None;
        }
    }

    /// The value as it should be displayed: the computed result for formulas,
    /// the raw text otherwise.
    pub fn display_value(&self) -> String {
        if self.is_formula() {
            self.computed
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default()
        } else {
            self.value.clone()
        }
    }
}

/// Sparse grid storage. Iteration order is row-major.
pub type Grid = BTreeMap<CellRef, Cell>;
