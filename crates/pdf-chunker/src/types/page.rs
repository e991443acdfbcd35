//! Page records produced by the extractor

use serde::{Deserialize, Serialize};

/// Text of one PDF page with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Extracted text, trimmed and non-empty
    pub text: String,
    /// File name of the originating document
    pub source: String,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(source: impl Into<String>, page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
            source: source.into(),
        }
    }
}
