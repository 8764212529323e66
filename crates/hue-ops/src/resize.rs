//! Separable resampling of interleaved float images.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Filter::Bilinear`] - Linear interpolation (smooth but blurry)
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic
//! - [`Filter::Lanczos3`] - High-quality sinc-based, the normalizer default
//!
//! # Example
//!
//! ```rust
//! use hue_ops::resize::{resize_f32, Filter};
//!
//! let src = vec![0.5f32; 16 * 16 * 4];
//! let dst = resize_f32(&src, 16, 16, 4, 32, 8, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.len(), 32 * 8 * 4);
//! ```

use crate::{OpsError, OpsResult};
use std::str::FromStr;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Kernel used by the resampler.
///
/// Parses from config strings such as `"lanczos3"` or `"mitchell"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Box of width 1; picks the closest source sample.
    Nearest,
    /// Triangle (tent) kernel.
    Bilinear,
    /// Mitchell-Netravali cubic, B = C = 1/3.
    Bicubic,
    /// Windowed sinc with three lobes.
    #[default]
    Lanczos3,
}

impl Filter {
    /// Kernel radius in source pixels at scale 1.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Kernel value at distance `x`; zero outside [`Filter::support`].
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let t = x.abs();
        if t >= self.support() {
            return 0.0;
        }
        match self {
            Filter::Nearest => 1.0,
            Filter::Bilinear => 1.0 - t,
            Filter::Bicubic => mitchell(t),
            Filter::Lanczos3 => sinc(t) * sinc(t / 3.0),
        }
    }
}

impl FromStr for Filter {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "point" => Filter::Nearest,
            "bilinear" | "linear" | "triangle" => Filter::Bilinear,
            "bicubic" | "cubic" | "mitchell" => Filter::Bicubic,
            "lanczos" | "lanczos3" => Filter::Lanczos3,
            other => return Err(OpsError::Unsupported(format!("unknown filter '{other}'"))),
        };
        Ok(filter)
    }
}

/// Normalized sinc, `sin(pi t) / (pi t)`.
#[inline]
fn sinc(t: f32) -> f32 {
    if t < 1e-6 {
        return 1.0;
    }
    let p = std::f32::consts::PI * t;
    p.sin() / p
}

/// Mitchell-Netravali cubic for `t` in `[0, 2)`, B = C = 1/3.
#[inline]
fn mitchell(t: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;
    let (t2, t3) = (t * t, t * t * t);
    let v = if t < 1.0 {
        (12.0 - 9.0 * B - 6.0 * C) * t3 + (-18.0 + 12.0 * B + 6.0 * C) * t2 + (6.0 - 2.0 * B)
    } else {
        (-B - 6.0 * C) * t3 + (6.0 * B + 30.0 * C) * t2 + (-12.0 * B - 48.0 * C) * t
            + (8.0 * B + 24.0 * C)
    };
    v / 6.0
}

/// Precomputed filter taps for one destination coordinate.
struct Taps {
    start: usize,
    weights: Vec<f32>,
}

/// Computes normalized taps for every destination coordinate on one axis.
fn compute_taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let widen = scale.max(1.0);
    let support = filter.support() * widen;

    (0..dst_len)
        .map(|d| {
            // Map destination center to source space
            let center = (d as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).max(0) as usize;
            let right = ((center + support).ceil().max(0.0) as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (left..=right)
                .map(|s| filter.weight((s as f32 - center) / widen))
                .collect();
            let sum: f32 = weights.iter().sum();
            if sum.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
            } else {
                // Degenerate kernel: fall back to the nearest source sample
                let nearest = center.round().clamp(0.0, (src_len - 1) as f32) as usize;
                weights = (left..=right)
                    .map(|s| if s == nearest { 1.0 } else { 0.0 })
                    .collect();
            }
            Taps { start: left, weights }
        })
        .collect()
}

/// Resizes interleaved f32 image data.
///
/// # Arguments
///
/// * `src` - Source pixel data, `src_w * src_h * channels` values
/// * `src_w`, `src_h` - Source size
/// * `channels` - Interleaved channel count
/// * `dst_w`, `dst_h` - Destination size; aspect ratio is not preserved
/// * `filter` - Resampling filter
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if `src` does not match its size or any
/// dimension is zero.
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    let expected = src_w * src_h * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} values, got {}",
            expected,
            src.len()
        )));
    }
    if src_w == 0 || src_h == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions("source size must be > 0".into()));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }

    trace!(src_w, src_h, dst_w, dst_h, channels, ?filter, "resize_f32");

    // Two-pass separable resize: horizontal then vertical
    let temp = resize_horizontal(src, src_w, src_h, channels, dst_w, filter);
    let result = resize_vertical(&temp, dst_w, src_h, channels, dst_h, filter);

    Ok(result)
}

/// Horizontal resize pass.
fn resize_horizontal(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * channels];
    let taps = compute_taps(src_w, dst_w, filter);

    let row_fn = |(y, row): (usize, &mut [f32])| {
        let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
        for (x, tap) in taps.iter().enumerate() {
            let out = &mut row[x * channels..(x + 1) * channels];
            for (i, w) in tap.weights.iter().enumerate() {
                let s = (tap.start + i) * channels;
                for c in 0..channels {
                    out[c] += src_row[s + c] * w;
                }
            }
        }
    };

    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(dst_w * channels).enumerate().for_each(row_fn);
    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(dst_w * channels).enumerate().for_each(row_fn);

    dst
}

/// Vertical resize pass.
fn resize_vertical(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_h: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; src_w * dst_h * channels];
    let taps = compute_taps(src_h, dst_h, filter);
    let stride = src_w * channels;

    let row_fn = |(y, row): (usize, &mut [f32])| {
        let tap = &taps[y];
        for (i, w) in tap.weights.iter().enumerate() {
            let src_row = &src[(tap.start + i) * stride..(tap.start + i + 1) * stride];
            for (o, s) in row.iter_mut().zip(src_row) {
                *o += s * w;
            }
        }
    };

    #[cfg(feature = "parallel")]
    dst.par_chunks_mut(stride).enumerate().for_each(row_fn);
    #[cfg(not(feature = "parallel"))]
    dst.chunks_mut(stride).enumerate().for_each(row_fn);

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_weights() {
        assert!((Filter::Nearest.weight(0.0) - 1.0).abs() < 0.01);
        assert!((Filter::Nearest.weight(0.6) - 0.0).abs() < 0.01);

        assert!((Filter::Bilinear.weight(0.0) - 1.0).abs() < 0.01);
        assert!((Filter::Bilinear.weight(0.5) - 0.5).abs() < 0.01);

        assert!((Filter::Lanczos3.weight(0.0) - 1.0).abs() < 0.01);
        assert!(Filter::Lanczos3.weight(1.0).abs() < 1e-5);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("Lanczos".parse::<Filter>().unwrap(), Filter::Lanczos3);
        assert_eq!("cubic".parse::<Filter>().unwrap(), Filter::Bicubic);
        assert!("box".parse::<Filter>().is_err());
    }

    #[test]
    fn test_resize_identity() {
        let src: Vec<f32> = (0..4 * 3 * 2).map(|v| v as f32).collect();
        let dst = resize_f32(&src, 4, 3, 2, 4, 3, Filter::Lanczos3).unwrap();
        for (a, b) in src.iter().zip(dst.iter()) {
            assert!((a - b).abs() < 1e-4, "{a} vs {b}");
        }
    }

    #[test]
    fn test_resize_upscale_constant() {
        let src = vec![0.5f32; 4 * 4 * 4];
        let dst = resize_f32(&src, 4, 4, 4, 8, 8, Filter::Bilinear).unwrap();
        assert_eq!(dst.len(), 8 * 8 * 4);
        for v in dst {
            assert!((v - 0.5).abs() < 0.01);
        }
    }

    #[test]
    fn test_resize_downscale_constant() {
        let src = vec![0.25f32; 64 * 64 * 3];
        let dst = resize_f32(&src, 64, 64, 3, 16, 16, Filter::Lanczos3).unwrap();
        assert_eq!(dst.len(), 16 * 16 * 3);
        for v in dst {
            assert!((v - 0.25).abs() < 1e-4);
        }
    }

    #[test]
    fn test_resize_non_uniform_aspect() {
        let src = vec![1.0f32; 300 * 100];
        let dst = resize_f32(&src, 300, 100, 1, 256, 256, Filter::Bicubic).unwrap();
        assert_eq!(dst.len(), 256 * 256);
    }

    #[test]
    fn test_resize_from_single_pixel() {
        let dst = resize_f32(&[7.0], 1, 1, 1, 5, 3, Filter::Lanczos3).unwrap();
        assert!(dst.iter().all(|v| (v - 7.0).abs() < 1e-5));
    }

    #[test]
    fn test_resize_bad_input() {
        assert!(resize_f32(&[0.0; 3], 2, 2, 1, 4, 4, Filter::Nearest).is_err());
        assert!(resize_f32(&[0.0; 4], 2, 2, 1, 0, 4, Filter::Nearest).is_err());
    }
}
