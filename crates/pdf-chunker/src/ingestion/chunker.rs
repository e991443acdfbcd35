//! Sliding-window text chunking with line and sentence boundary snapping
//!
//! Offsets, window sizes and boundary positions are all counted in Unicode
//! scalar values (`char`), never bytes.

use rayon::prelude::*;

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{ChunkRecord, PageRecord};

/// Observer invoked once per run, after all pages are chunked
pub type ChunkingCallback = Box<dyn Fn(&ChunkingSummary) + Send + Sync>;

/// Totals reported at the end of a chunking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingSummary {
    /// Number of input pages
    pub pages: usize,
    /// Number of chunks produced
    pub chunks: usize,
}

/// Character range of one window within a page, after snapping and clipping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    /// First character of the window
    pub start: usize,
    /// One past the last character of the window
    pub end: usize,
}

impl ChunkSpan {
    /// Width of the window in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Characters shared between consecutive windows
    chunk_overlap: usize,
    /// Called with the run totals
    observer: Option<ChunkingCallback>,
}

impl TextChunker {
    /// Create a new chunker. Fails if `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::from_config(&ChunkingConfig {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            observer: None,
        })
    }

    /// Attach an observer that receives the totals of every run
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&ChunkingSummary) + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Chunk pages in order, numbering chunks globally across pages
    pub fn chunk_pages(&self, pages: &[PageRecord]) -> Vec<ChunkRecord> {
        let mut chunks = Vec::new();

        for page in pages {
            for text in self.split(&page.text) {
                chunks.push(ChunkRecord {
                    text: text.to_string(),
                    source: page.source.clone(),
                    page_number: page.page_number,
                    chunk_index: chunks.len(),
                });
            }
        }

        self.finish(pages.len(), chunks.len());
        chunks
    }

    /// Chunk pages concurrently, then number chunks in page order.
    ///
    /// Produces exactly the same records as [`TextChunker::chunk_pages`].
    pub fn chunk_pages_parallel(&self, pages: &[PageRecord]) -> Vec<ChunkRecord> {
        let per_page: Vec<Vec<&str>> = pages.par_iter().map(|p| self.split(&p.text)).collect();

        let total = per_page.iter().map(Vec::len).sum();
        let mut chunks = Vec::with_capacity(total);

        for (page, texts) in pages.iter().zip(per_page) {
            for text in texts {
                chunks.push(ChunkRecord {
                    text: text.to_string(),
                    source: page.source.clone(),
                    page_number: page.page_number,
                    chunk_index: chunks.len(),
                });
            }
        }

        self.finish(pages.len(), chunks.len());
        chunks
    }

    /// Window positions for one page's text, in left-to-right order
    pub fn spans(&self, text: &str) -> Vec<ChunkSpan> {
        let offsets = char_offsets(text);
        self.spans_with_offsets(text, &offsets)
    }

    /// Trimmed, non-empty chunk texts for one page
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let offsets = char_offsets(text);
        self.spans_with_offsets(text, &offsets)
            .into_iter()
            .map(|span| text[offsets[span.start]..offsets[span.end]].trim())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    }

    fn spans_with_offsets(&self, text: &str, offsets: &[usize]) -> Vec<ChunkSpan> {
        let len = offsets.len() - 1;
        let mut spans = Vec::new();
        let mut start = 0usize;

        while start < len {
            // Unclipped: the final window of a page still advances by chunk_size
            let mut end = start + self.chunk_size;

            if end < len {
                let candidate = &text[offsets[start]..offsets[end]];
                if let Some(break_point) = last_boundary(candidate) {
                    // Only snap past the halfway mark
                    if 2 * break_point > self.chunk_size {
                        end = start + break_point + 1;
                    }
                }
            }

            spans.push(ChunkSpan {
                start,
                end: end.min(len),
            });

            let next = end.saturating_sub(self.chunk_overlap);
            start = if next > start { next } else { start + 1 };
        }

        spans
    }

    fn finish(&self, pages: usize, chunks: usize) {
        tracing::debug!("Created {} chunks from {} pages", chunks, pages);
        if let Some(observer) = &self.observer {
            observer(&ChunkingSummary { pages, chunks });
        }
    }
}

/// Byte offset of every char in `text`, followed by `text.len()`
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Char offset of the last newline or ". " in `candidate`, whichever is later
fn last_boundary(candidate: &str) -> Option<usize> {
    let newline = candidate.rfind('\n');
    let period = candidate.rfind(". ");
    let byte = newline.max(period)?;
    Some(candidate[..byte].chars().count())
}
