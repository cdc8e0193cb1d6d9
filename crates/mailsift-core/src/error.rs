//! Error types for the core library.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading, writing or creating a file or directory failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path the failing operation was acting on.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Submitted address failed the syntax check.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Address is already present in the list.
    #[error("Email address already exists: {0}")]
    Duplicate(String),

    /// Uploaded file does not have a `.txt` extension.
    #[error("Unsupported file format: {0} (only .txt files are allowed)")]
    UnsupportedFormat(String),

    /// No upload payload, or the transport reported a transfer error.
    #[error("No file uploaded or an upload error occurred")]
    NoFileProvided,

    /// Namespace name is empty or unusable after sanitization.
    #[error("Invalid namespace: {0:?}")]
    InvalidNamespace(String),
}

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true when the error is a rejected user input rather than a
    /// storage failure.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
