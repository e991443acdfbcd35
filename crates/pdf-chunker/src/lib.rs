//! pdf-chunker: PDF page extraction and overlapping text chunking
//!
//! Pages are pulled out of a PDF as [`PageRecord`]s and split into
//! [`ChunkRecord`]s that carry the source file, page number and a global
//! chunk index, so downstream indexing can cite answers back to the page
//! they came from.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod types;

pub use config::{ChunkingConfig, ExtractorConfig, PipelineConfig, PreviewConfig};
pub use error::{Error, Result};
pub use ingestion::{
    ChunkSpan, ChunkingCallback, ChunkingSummary, IngestOutput, IngestPipeline, PdfLoader,
    TextChunker,
};
pub use types::{ChunkRecord, PageRecord};
