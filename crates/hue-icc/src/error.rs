//! ICC error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for ICC operations.
pub type IccResult<T> = Result<T, IccError>;

/// Errors raised while preparing RGB <-> Lab conversions.
#[derive(Debug, Error)]
pub enum IccError {
    /// lcms could not build or serialize a profile.
    #[error("cannot create profile: {0}")]
    CreateFailed(String),

    /// lcms could not pair the RGB profile with Lab.
    #[error("cannot build Lab transform: {0}")]
    TransformFailed(String),

    /// Profile bytes are corrupt or of the wrong kind.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// A named profile resource is missing from the resource directory.
    #[error("profile {name} not found in {}", dir.display())]
    ProfileNotFound {
        /// Resource file name.
        name: String,
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
