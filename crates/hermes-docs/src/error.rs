//! Error types for the documentation export.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while exporting documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to serialize the OpenAPI document to JSON.
    #[error("Failed to serialize OpenAPI spec: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Failed to write the document to disk.
    #[error("Failed to write OpenAPI spec to '{}': {source}", .path.display())]
    WriteError {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
