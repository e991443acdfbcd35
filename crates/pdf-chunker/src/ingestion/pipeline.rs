//! Ingestion pipeline orchestration

use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::types::{ChunkRecord, PageRecord};

use super::chunker::TextChunker;
use super::loader::PdfLoader;

/// Pages extracted from one document and the chunks cut from them
#[derive(Debug, Clone)]
pub struct IngestOutput {
    pub pages: Vec<PageRecord>,
    pub chunks: Vec<ChunkRecord>,
}

/// Main ingestion pipeline
pub struct IngestPipeline {
    /// PDF page extractor
    loader: PdfLoader,
    /// Text chunker
    chunker: TextChunker,
}

impl IngestPipeline {
    /// Create a new ingestion pipeline. Chunking parameters are validated here.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        Ok(Self {
            loader: PdfLoader::new(config.extractor.clone()),
            chunker: TextChunker::from_config(&config.chunking)?,
        })
    }

    /// Build a pipeline around an existing chunker, e.g. one with an observer attached
    pub fn with_chunker(loader: PdfLoader, chunker: TextChunker) -> Self {
        Self { loader, chunker }
    }

    /// Full ingestion: extract pages + chunk
    pub fn ingest(&self, path: impl AsRef<Path>) -> Result<IngestOutput> {
        let pages = self.loader.load(path)?;
        let chunks = self.chunker.chunk_pages(&pages);
        Ok(IngestOutput { pages, chunks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::error::Error;
    use crate::ingestion::loader::tests::write_pdf;

    #[test]
    fn test_invalid_chunking_rejected_before_loading() {
        let config = PipelineConfig {
            chunking: ChunkingConfig {
                chunk_size: 100,
                chunk_overlap: 100,
            },
            ..PipelineConfig::default()
        };
        assert!(matches!(
            IngestPipeline::new(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_ingest_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manual.pdf");
        write_pdf(&path, &["Hello page one", "Hello page two"]);

        let pipeline = IngestPipeline::new(&PipelineConfig::default()).unwrap();
        let output = pipeline.ingest(&path).unwrap();

        assert_eq!(output.pages.len(), 2);
        assert_eq!(output.chunks.len(), 2);
        assert_eq!(output.chunks[0].page_number, 1);
        assert_eq!(output.chunks[1].page_number, 2);
        assert_eq!(output.chunks[1].chunk_index, 1);
        assert!(output.chunks.iter().all(|c| c.source == "manual.pdf"));
    }

    #[test]
    fn test_ingest_missing_file() {
        let pipeline = IngestPipeline::new(&PipelineConfig::default()).unwrap();
        assert!(matches!(
            pipeline.ingest("does/not/exist.pdf"),
            Err(Error::NotFound(_))
        ));
    }
}
