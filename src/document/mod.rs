//! Presentation documents
//!
//! The host reads the document from disk and ships the markup across the
//! bridge; the presenter parses it and looks up the canvas by id.

mod dom;
pub mod html;

pub use dom::{Document, ElementData, Node, NodeType};
pub use html::HtmlParser;

use std::fs;
use std::path::Path;

use crate::utils::DocumentError;

/// Read a presentation document from disk
pub fn read_document(path: &Path) -> std::result::Result<String, DocumentError> {
    fs::read_to_string(path).map_err(|source| DocumentError::Load {
        path: path.display().to_string(),
        source,
    })
}
