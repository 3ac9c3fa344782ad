//! Cell addressing.
//!
//! Provides bidirectional conversion between column letters and 1-based
//! column ordinals (bijective base-26: `A = 1 … Z = 26, AA = 27 …`), and between
//! cell identifiers such as `"C12"` and zero-indexed [`CellRef`] coordinates.
//!
//! # Examples
//!
//! ```
//! use cellgrid_engine::engine::{CellRef, column_to_ordinal, ordinal_to_column};
//!
//! assert_eq!(column_to_ordinal("AA").unwrap(), 27);
//! assert_eq!(ordinal_to_column(703), "AAA");
//!
//! let cell: CellRef = "B3".parse().unwrap();
//! assert_eq!(cell.col, 1);
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::error::AddressFormatError;

/// A reference to a cell by column and row indices (0-indexed).
///
/// Field order makes the derived ordering row-major: every cell of row 1
/// sorts before any cell of row 2, and within a row columns ascend.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(col: usize, row: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Parse a cell identifier (`"A1"`, `"AA10"`). Letters are case-insensitive.
    pub fn parse(id: &str) -> Result<CellRef, AddressFormatError> {
        let (letters, row_number) = parse_address(id)?;
        let ordinal = column_to_ordinal(&letters)?;
        Ok(CellRef::new(ordinal - 1, row_number - 1))
    }

    /// Column letters of this cell (`"A"` for column 0).
    pub fn column_letters(&self) -> String {
        ordinal_to_column(self.col + 1)
    }

    /// 1-based column ordinal.
    pub fn column_ordinal(&self) -> usize {
        self.col + 1
    }

    /// 1-based row number as shown in the row header.
    pub fn row_number(&self) -> usize {
        self.row + 1
    }
}

impl std::str::FromStr for CellRef {
    type Err = AddressFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellRef::parse(s)
    }
}

impl TryFrom<String> for CellRef {
    type Error = AddressFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CellRef::parse(&value)
    }
}

impl From<CellRef> for String {
    fn from(value: CellRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row_number())
    }
}

/// Convert column letters to a 1-based ordinal (`A = 1`, `Z = 26`, `AA = 27`).
pub fn column_to_ordinal(letters: &str) -> Result<usize, AddressFormatError> {
    if letters.is_empty() {
        return Err(AddressFormatError::new(letters, "no column letters"));
    }
    let mut acc = 0usize;
    for c in letters.bytes() {
        if !c.is_ascii_alphabetic() {
            return Err(AddressFormatError::new(letters, "column must be letters only"));
        }
        let digit = (c.to_ascii_uppercase() - b'A') as usize + 1;
        acc = acc
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| AddressFormatError::new(letters, "column out of range"))?;
    }
    Ok(acc)
}

/// Convert a 1-based ordinal to column letters (`1 -> A`, `27 -> AA`).
///
/// There is no zero digit in this numbering, so `0` yields an empty string.
pub fn ordinal_to_column(ordinal: usize) -> String {
    let mut result = Vec::new();
    let mut n = ordinal;
    while n > 0 {
        n -= 1;
        result.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// Split a cell identifier into its column letters (uppercased) and row number.
pub fn parse_address(id: &str) -> Result<(String, usize), AddressFormatError> {
    let split = id
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(id.len());
    let (letters, digits) = id.split_at(split);

    if letters.is_empty() {
        return Err(AddressFormatError::new(id, "no column letters"));
    }
    if digits.is_empty() {
        return Err(AddressFormatError::new(id, "no row number"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddressFormatError::new(id, "row must be digits only"));
    }

    let row = digits
        .parse::<usize>()
        .map_err(|_| AddressFormatError::new(id, "row number out of range"))?;
    if row == 0 {
        return Err(AddressFormatError::new(id, "row number must be >= 1"));
    }
    Ok((letters.to_ascii_uppercase(), row))
}

/// Whether `text` is a reference as formulas spell it: uppercase letters then digits.
pub fn is_reference(text: &str) -> bool {
    reference_re().is_match(text)
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]+[0-9]+$").expect("reference regex must compile"))
}
