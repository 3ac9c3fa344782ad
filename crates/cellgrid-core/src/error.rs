//! Error types for Cellgrid core.

use cellgrid_engine::engine::{AddressFormatError, CellRef};
use thiserror::Error;

/// Errors that can occur while manipulating or persisting a sheet
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid spreadsheet file format: {0}")]
    InvalidDocument(String),

    #[error(transparent)]
    Address(#[from] AddressFormatError),

    #[error("Validation failed for {cell}: {message}")]
    ValidationFailed { cell: CellRef, message: String },

    #[error("No file path set")]
    NoFilePath,

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
