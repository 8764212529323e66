//! Error types for hue-core.
//!
//! Every constructor in this crate validates its invariants and reports a
//! violation through [`Error`] instead of panicking.
//!
//! # Usage
//!
//! ```rust
//! use hue_core::{ColorModel, Error, PixelBuffer};
//!
//! // 2x2 RGBA needs 16 bytes
//! let err = PixelBuffer::new(vec![0u8; 15], 2, 2, 8, 8, ColorModel::Rgb { alpha: true });
//! assert!(matches!(err, Err(Error::BufferLength { .. })));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while constructing core values.
#[derive(Debug, Error)]
pub enum Error {
    /// Width, height or bit depth cannot describe a valid buffer.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Row stride is shorter than one row of pixels.
    #[error("stride {stride} is less than minimum {min_stride} for width {width}")]
    InvalidStride {
        /// Provided stride
        stride: usize,
        /// Minimum required stride
        min_stride: usize,
        /// Image width
        width: u32,
    },

    /// Byte buffer length does not equal `bytes_per_row * height`.
    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferLength {
        /// `bytes_per_row * height`
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Planar channels have different lengths or do not cover `width * height`.
    #[error("channel lengths L={l} a={a} b={b} do not match {width}x{height}")]
    ChannelLength {
        /// Length of L
        l: usize,
        /// Length of a
        a: usize,
        /// Length of b
        b: usize,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Tensor data does not fit its declared shape, or a tensor has the wrong shape.
    #[error("tensor shape {shape:?}: {reason}")]
    TensorShape {
        /// Declared or observed shape
        shape: [usize; 4],
        /// What is wrong with it
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::TensorShape`] error.
    #[inline]
    pub fn tensor_shape(shape: [usize; 4], reason: impl Into<String>) -> Self {
        Self::TensorShape {
            shape,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors about planar channel lengths.
    #[inline]
    pub fn is_channel_error(&self) -> bool {
        matches!(self, Self::ChannelLength { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_dimensions_message() {
        let err = Error::invalid_dimensions(0, 10, "zero width");
        let msg = err.to_string();
        assert!(msg.contains("0x10"));
        assert!(msg.contains("zero width"));
    }

    #[test]
    fn test_channel_error() {
        let err = Error::ChannelLength {
            l: 4,
            a: 4,
            b: 3,
            width: 2,
            height: 2,
        };
        assert!(err.is_channel_error());
        assert!(err.to_string().contains("b=3"));
    }
}
