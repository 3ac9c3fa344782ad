//! Writer for sheet documents

use crate::error::Result;
use std::fs;
use std::path::Path;

use super::document::SheetDocument;

/// Write a sheet document as pretty-printed JSON
pub fn write_document(path: &Path, document: &SheetDocument) -> Result<()> {
    let content = write_document_content(document)?;
    fs::write(path, content)?;
    Ok(())
}

/// Serialize a sheet document to a pretty-printed JSON string
pub fn write_document_content(document: &SheetDocument) -> Result<String> {
    let mut content = serde_json::to_string_pretty(document)?;
    content.push('\n');
    Ok(content)
}
