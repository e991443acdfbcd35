//! PDF ingestion: page extraction followed by chunking

mod chunker;
mod loader;
mod pipeline;

pub use chunker::{ChunkSpan, ChunkingCallback, ChunkingSummary, TextChunker};
pub use loader::{normalize_glyphs, PdfLoader};
pub use pipeline::{IngestOutput, IngestPipeline};
