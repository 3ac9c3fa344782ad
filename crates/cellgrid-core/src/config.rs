//! Sheet configuration (TOML).

use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, SheetError};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Initial extent and default dimension sizes of new sheets.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Column count of a new sheet.
    pub columns: usize,
    /// Row count of a new sheet.
    pub rows: usize,
    /// Width of initial and inserted columns.
    pub column_width: f64,
    /// Height of initial and inserted rows.
    pub row_height: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        SheetConfig {
            columns: 26,
            rows: 100,
            column_width: 100.0,
            row_height: 25.0,
        }
    }
}

impl SheetConfig {
    pub fn from_toml_str(content: &str) -> Result<SheetConfig> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file, refusing anything over 1 MiB.
    pub fn load(path: &Path) -> Result<SheetConfig> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_CONFIG_FILE_BYTES {
            return Err(SheetError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: config file too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_CONFIG_FILE_BYTES
                ),
            )));
        }
        let config = Self::from_toml_str(&std::fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), ?config, "loaded sheet config");
        Ok(config)
    }
}
