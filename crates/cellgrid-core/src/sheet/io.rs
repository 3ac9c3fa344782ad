use super::Sheet;
use crate::config::SheetConfig;
use crate::error::{Result, SheetError};
use crate::storage::{
    SheetDocument, parse_document, parse_document_content, write_document,
    write_document_content,
};
use std::path::{Path, PathBuf};

impl Sheet {
    /// Create a sheet and load `path` into it if the file exists; otherwise
    /// the path is remembered for the first save.
    pub fn with_file(path: Option<PathBuf>, config: SheetConfig) -> Result<Self> {
        let mut sheet = Self::with_config(config);
        if let Some(p) = path {
            if p.exists() {
                sheet.load_file(&p)?;
            } else {
                sheet.file_path = Some(p);
            }
        }
        Ok(sheet)
    }

    /// Serialize the whole sheet to a JSON document.
    pub fn to_json(&self) -> Result<String> {
        write_document_content(&SheetDocument::from_sheet(self))
    }

    /// Replace the sheet with a JSON document.
    ///
    /// All or nothing: on any error the current sheet is left untouched.
    pub fn load_json(&mut self, content: &str) -> Result<()> {
        let document = parse_document_content(content).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to load spreadsheet");
        })?;
        self.replace_with(document)
    }

    /// Save to `path` and remember it as the current file.
    pub fn save_file(&mut self, path: &Path) -> Result<()> {
        write_document(path, &SheetDocument::from_sheet(self))?;
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        tracing::debug!(path = %path.display(), cells = self.cells.len(), "saved sheet");
        Ok(())
    }

    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(SheetError::NoFilePath);
        };
        self.save_file(&path)?;
        Ok(path)
    }

    /// Load from file. All or nothing, like [`Sheet::load_json`].
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let document = parse_document(path).inspect_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "failed to load spreadsheet");
        })?;
        self.replace_with(document)?;
        self.file_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), cells = self.cells.len(), "loaded sheet");
        Ok(())
    }

    /// Build the new sheet completely, recalculated, before swapping it in.
    fn replace_with(&mut self, document: SheetDocument) -> Result<()> {
        let mut loaded = document.into_sheet(self.config.clone())?;
        loaded.recalculate();
        loaded.file_path = self.file_path.take();
        loaded.modified = false;
        *self = loaded;
        Ok(())
    }
}
