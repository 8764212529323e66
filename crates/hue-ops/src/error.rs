//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The source image has no readable pixel data.
    #[error("resample failure: {0}")]
    ResampleFailure(String),

    /// Operation not supported for this format.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid output buffer.
    #[error(transparent)]
    Core(#[from] hue_core::Error),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
