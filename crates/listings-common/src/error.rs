//! Error types for the listings ETL

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ETL operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Errors that stop a pipeline stage as a whole.
///
/// Row-level problems are not represented here; they are skipped and
/// reported by the extractor.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Cannot read source file '{path}': {source}")]
    SourceFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EtlError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap a CSV error raised while opening or reading `path`
    pub fn source_file(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::SourceFile {
            path: path.into(),
            source,
        }
    }
}
