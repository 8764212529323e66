//! Model acquisition error types.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Boxed error returned by pluggable backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while acquiring or running the model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The configured source is not a usable URL.
    #[error("invalid model source URL '{url}': {reason}")]
    InvalidSourceUrl {
        /// The rejected source string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Fetching the model artifact failed.
    #[error("failed to download model from {url}: {cause}")]
    DownloadError {
        /// Source URL.
        url: String,
        /// Underlying transport or I/O error.
        #[source]
        cause: BoxError,
    },

    /// Compiling or loading the downloaded artifact failed.
    #[error("failed to compile model: {cause}")]
    CompileError {
        /// Underlying backend error.
        #[source]
        cause: BoxError,
    },

    /// The engine rejected a prediction request.
    #[error("inference failed: {0}")]
    Inference(#[source] BoxError),

    /// The engine returned a tensor of the wrong shape.
    #[error(transparent)]
    Shape(#[from] hue_core::Error),

    /// Cache directory I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cache entry sidecar could not be read or written.
    #[error("cache entry error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn download(url: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::DownloadError {
            url: url.into(),
            cause: cause.into(),
        }
    }

    pub(crate) fn compile(cause: impl Into<BoxError>) -> Self {
        Self::CompileError {
            cause: cause.into(),
        }
    }
}
