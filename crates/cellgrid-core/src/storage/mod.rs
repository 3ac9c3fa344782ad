//! Sheet persistence (JSON documents).

mod document;
mod parser;
mod writer;

pub use document::{CellRecord, SheetDocument};
pub use parser::{parse_document, parse_document_content};
pub use writer::{write_document, write_document_content};
