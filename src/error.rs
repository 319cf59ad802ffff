//! Error types for eventset
//!
//! Provides a unified error type for all operations.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using DatasetError
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Unified error type for dataset and container operations
#[derive(Debug, Error)]
pub enum DatasetError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A file or directory is missing or cannot be read
    #[error("Not found: {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    // -------------------------------------------------------------------------
    // Access Errors
    // -------------------------------------------------------------------------
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("Format error in {}: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DatasetError {
    /// Build a format error for the given container file
    pub fn format(path: &Path, message: impl Into<String>) -> Self {
        DatasetError::Format {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Classify an I/O error raised while opening `path`
    ///
    /// Missing and unreadable paths become `NotFound`; everything else stays `Io`.
    pub fn from_open(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => DatasetError::NotFound {
                path: path.to_path_buf(),
                source,
            },
            _ => DatasetError::Io(source),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatasetError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DatasetError::Validation(_))
    }

    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, DatasetError::IndexOutOfRange { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, DatasetError::Format { .. })
    }
}
