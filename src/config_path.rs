//! Locating and loading the sheet configuration.

use anyhow::{Context, Result};
use cellgrid_core::SheetConfig;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

/// Load `explicit` if given (it must exist), else the user config file if
/// present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<SheetConfig> {
    if let Some(path) = explicit {
        return SheetConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match user_config_path() {
        Some(path) if path.exists() => SheetConfig::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        _ => Ok(SheetConfig::default()),
    }
}
