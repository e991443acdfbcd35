//! Configuration for extraction, chunking and preview output

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Top-level configuration, loadable from a TOML file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// PDF extraction configuration
    #[serde(default)]
    pub extractor: ExtractorConfig,
    /// CLI preview configuration
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl PipelineConfig {
    /// Parse configuration from TOML text. Missing sections and keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.chunking.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkingConfig {
    /// Check that the sliding window always moves forward
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid_configuration(
                "chunk_size must be greater than zero",
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::invalid_configuration(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// PDF extraction configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Timeout for the pdf-extract fallback in seconds
    pub extract_timeout_secs: u64,
    /// Replace PDF glyph names and typographic characters with plain ASCII
    pub normalize_glyphs: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extract_timeout_secs: 60,
            normalize_glyphs: true,
        }
    }
}

/// How much of the extracted content the CLI preview prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Number of pages to show
    pub pages: usize,
    /// Characters shown per page
    pub page_chars: usize,
    /// Number of chunks to show
    pub chunks: usize,
    /// Characters shown per chunk
    pub chunk_chars: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            pages: 3,
            page_chars: 500,
            chunks: 3,
            chunk_chars: 300,
        }
    }
}
