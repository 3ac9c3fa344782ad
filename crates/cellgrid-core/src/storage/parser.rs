//! Reader for sheet documents

use crate::error::{Result, SheetError};
use std::fs;
use std::path::Path;

use super::document::SheetDocument;

const REQUIRED_KEYS: [&str; 3] = ["cells", "columns", "rows"];

/// Parse a sheet document file
pub fn parse_document(path: &Path) -> Result<SheetDocument> {
    let content = fs::read_to_string(path)?;
    parse_document_content(&content)
}

/// Parse a sheet document from a JSON string.
///
/// The top level must be an object with non-null `cells`, `columns` and
/// `rows`; anything else is an [`SheetError::InvalidDocument`].
pub fn parse_document_content(content: &str) -> Result<SheetDocument> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let Some(object) = value.as_object() else {
        return Err(SheetError::InvalidDocument(
            "top level is not an object".to_string(),
        ));
    };
    for key in REQUIRED_KEYS {
        if object.get(key).is_none_or(|v| v.is_null()) {
            return Err(SheetError::InvalidDocument(format!("missing `{}`", key)));
        }
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_key() {
        for missing in REQUIRED_KEYS {
            let mut object = serde_json::json!({
                "cells": {},
                "columns": [{"id": "A", "width": 100}],
                "rows": [{"id": "1", "height": 25}],
            });
            object.as_object_mut().unwrap().remove(missing);
            let err = parse_document_content(&object.to_string()).unwrap_err();
            match err {
                SheetError::InvalidDocument(message) => assert!(message.contains(missing)),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_null_required_key_is_missing() {
        let err = parse_document_content(r#"{"cells": null, "columns": [], "rows": []}"#)
            .unwrap_err();
        assert!(matches!(err, SheetError::InvalidDocument(_)));
    }

    #[test]
    fn test_non_object_documents() {
        assert!(matches!(
            parse_document_content("[1, 2]").unwrap_err(),
            SheetError::InvalidDocument(_)
        ));
        assert!(matches!(
            parse_document_content("{ not json").unwrap_err(),
            SheetError::Json(_)
        ));
    }

    #[test]
    fn test_wrong_shape_is_a_json_error() {
        let err = parse_document_content(r#"{"cells": [], "columns": [], "rows": []}"#)
            .unwrap_err();
        assert!(matches!(err, SheetError::Json(_)));
    }
}
