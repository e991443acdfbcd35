//! Error types for extraction and chunking

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pdf-chunker operations
pub type Result<T> = std::result::Result<T, Error>;

/// pdf-chunker errors
#[derive(Debug, Error)]
pub enum Error {
    /// Chunking parameters that can never produce a forward-moving window
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input document does not exist
    #[error("PDF not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Configuration file does not exist
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Input document has the wrong extension
    #[error("Expected a PDF file, got: {0}")]
    InvalidFormat(String),

    /// Document engine could not read the file
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file decode error
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }
}
