//! Fixed-shape NCHW tensors exchanged with the inference engine.
//!
//! The colorization model consumes a `[1, 1, 256, 256]` luminance tensor and
//! produces a `[1, 2, 256, 256]` chrominance tensor (channel 0 = a,
//! channel 1 = b). Storage is row-major over `[batch, channel, height, width]`:
//!
//! ```text
//! offset(n, c, y, x) = ((n * C + c) * H + y) * W + x
//! ```

use crate::{Error, Result};

/// Spatial size the model operates at.
pub const MODEL_DIMENSION: usize = 256;

/// Shape of the luminance input tensor.
pub const INPUT_SHAPE: [usize; 4] = [1, 1, MODEL_DIMENSION, MODEL_DIMENSION];

/// Shape of the chrominance output tensor.
pub const OUTPUT_SHAPE: [usize; 4] = [1, 2, MODEL_DIMENSION, MODEL_DIMENSION];

/// Dense 4-D float tensor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: [usize; 4],
    data: Vec<f32>,
}

impl Tensor {
    /// Wraps `data` after checking it matches `shape`.
    ///
    /// # Errors
    ///
    /// [`Error::TensorShape`] if `data.len()` is not the product of `shape`.
    pub fn new(shape: [usize; 4], data: Vec<f32>) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(Error::tensor_shape(
                shape,
                format!("expected {expected} elements, got {}", data.len()),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Zero-filled tensor.
    pub fn zeros(shape: [usize; 4]) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.iter().product()],
        }
    }

    /// Tensor shape `[n, c, h, w]`.
    #[inline]
    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    /// Flat row-major data.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Flat offset of `(n, c, y, x)`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    #[inline]
    pub fn offset(&self, n: usize, c: usize, y: usize, x: usize) -> usize {
        let [sn, sc, sh, sw] = self.shape;
        assert!(
            n < sn && c < sc && y < sh && x < sw,
            "index ({n}, {c}, {y}, {x}) out of bounds for shape {:?}",
            self.shape
        );
        ((n * sc + c) * sh + y) * sw + x
    }

    /// Element at `(n, c, y, x)`.
    #[inline]
    pub fn get(&self, n: usize, c: usize, y: usize, x: usize) -> f32 {
        self.data[self.offset(n, c, y, x)]
    }

    /// Sets the element at `(n, c, y, x)`.
    #[inline]
    pub fn set(&mut self, n: usize, c: usize, y: usize, x: usize, value: f32) {
        let i = self.offset(n, c, y, x);
        self.data[i] = value;
    }

    /// Fails unless the tensor has exactly `expected` shape.
    pub fn expect_shape(&self, expected: [usize; 4]) -> Result<()> {
        if self.shape != expected {
            return Err(Error::tensor_shape(
                self.shape,
                format!("expected shape {expected:?}"),
            ));
        }
        Ok(())
    }
}
