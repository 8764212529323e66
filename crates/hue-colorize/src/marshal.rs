//! Planar channels to model tensors and back.
//!
//! Pixel `idx` of a `dimension x dimension` channel lives at
//! `(0, c, idx / dimension, idx % dimension)`. Tensor storage is row-major
//! NCHW, so a channel maps onto one contiguous plane.

use crate::error::{ColorizeError, Result};
use hue_core::Tensor;

/// Packs an L channel into a `[1, 1, dimension, dimension]` tensor.
///
/// # Errors
///
/// [`ColorizeError::TensorShape`] unless `l.len() == dimension * dimension`.
pub fn to_input_tensor(l: &[f32], dimension: usize) -> Result<Tensor> {
    let plane = dimension * dimension;
    if l.len() != plane {
        return Err(ColorizeError::TensorShape(format!(
            "L channel has {} values, expected {dimension}x{dimension}",
            l.len()
        )));
    }
    Ok(Tensor::new([1, 1, dimension, dimension], l.to_vec())?)
}

/// Splits a `[1, 2, dimension, dimension]` tensor into `(a, b)` channels.
///
/// # Errors
///
/// [`ColorizeError::TensorShape`] for any other shape.
pub fn from_output_tensor(tensor: &Tensor, dimension: usize) -> Result<(Vec<f32>, Vec<f32>)> {
    tensor.expect_shape([1, 2, dimension, dimension])?;
    let plane = dimension * dimension;
    let (a, b) = tensor.data().split_at(plane);
    Ok((a.to_vec(), b.to_vec()))
}
