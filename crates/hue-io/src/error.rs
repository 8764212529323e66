//! I/O error types.

use thiserror::Error;

/// Result type for image I/O.
pub type IoResult<T> = Result<T, IoError>;

/// Errors raised while reading or writing images.
#[derive(Debug, Error)]
pub enum IoError {
    /// File could not be opened or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoder rejected the data.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoder rejected the data.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Neither PNG nor JPEG.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Pixel layout the codec cannot represent.
    #[error("unsupported layout: {0}")]
    UnsupportedLayout(String),

    /// Decoded data did not form a valid buffer.
    #[error(transparent)]
    Buffer(#[from] hue_core::Error),
}
