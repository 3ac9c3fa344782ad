//! cellgrid_engine - Spreadsheet engine: addressing, ranges, formulas, validation.

pub mod builtins;
pub mod engine;
