//! Chunk records handed to downstream indexing

use serde::{Deserialize, Serialize};

/// A bounded slice of one page's text, tagged for citation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text, whitespace-trimmed
    pub text: String,
    /// File name of the originating document
    pub source: String,
    /// Page the chunk starts on
    pub page_number: u32,
    /// Global position of this chunk across all pages
    pub chunk_index: usize,
}

impl ChunkRecord {
    /// Citation key: source, page and chunk index
    pub fn citation(&self) -> String {
        format!("{} p.{} #{}", self.source, self.page_number, self.chunk_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation() {
        let chunk = ChunkRecord {
            text: "Quarterly revenue grew.".to_string(),
            source: "report.pdf".to_string(),
            page_number: 4,
            chunk_index: 17,
        };
        assert_eq!(chunk.citation(), "report.pdf p.4 #17");
    }

    #[test]
    fn test_json_shape() {
        let chunk = ChunkRecord {
            text: "hello".to_string(),
            source: "doc.pdf".to_string(),
            page_number: 1,
            chunk_index: 0,
        };
        let value = serde_json::to_value(&chunk).unwrap();
        assert_eq!(value["source"], "doc.pdf");
        assert_eq!(value["page_number"], 1);
        assert_eq!(value["chunk_index"], 0);
        assert_eq!(value["text"], "hello");
    }
}
