//! Resample a pixel buffer to a fixed size and re-pack its byte layout.
//!
//! The colorization model is trained on stretched square inputs, so the
//! source is scaled to the target size on both axes independently; there is
//! no letterboxing or cropping.
//!
//! Output layouts:
//!
//! | Source model        | Output                                   |
//! |---------------------|------------------------------------------|
//! | `Rgb` (with/without alpha) | RGBA, 8 bits/component, 4 bytes/pixel |
//! | `Monochrome`        | 1 component at the source bit depth       |
//!
//! When the target equals the source size only the byte layout changes.

use crate::resize::{resize_f32, Filter};
use crate::{OpsError, OpsResult};
use hue_core::{ColorModel, PixelBuffer};
use tracing::{debug, trace};

/// Normalizes `src` to `width` x `height` with the Lanczos-3 filter.
///
/// # Errors
///
/// - [`OpsError::ResampleFailure`] if `src` holds no pixel data
/// - [`OpsError::Unsupported`] for color models other than RGB / monochrome
/// - [`OpsError::InvalidDimensions`] for a zero target size
pub fn normalize(src: &PixelBuffer, width: u32, height: u32) -> OpsResult<PixelBuffer> {
    normalize_with_filter(src, width, height, Filter::Lanczos3)
}

/// Normalizes `src` to `width` x `height` with an explicit filter.
pub fn normalize_with_filter(
    src: &PixelBuffer,
    width: u32,
    height: u32,
    filter: Filter,
) -> OpsResult<PixelBuffer> {
    if src.is_empty() {
        return Err(OpsError::ResampleFailure(format!(
            "source {}x{} has no pixel data",
            src.width(),
            src.height()
        )));
    }
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "target size {width}x{height} must be > 0"
        )));
    }

    let model = src.color_model();
    let channels = match model {
        ColorModel::Rgb { .. } => 4,
        ColorModel::Monochrome => 1,
        other => {
            return Err(OpsError::Unsupported(format!(
                "cannot normalize {other} pixels"
            )));
        }
    };

    trace!(
        src_w = src.width(),
        src_h = src.height(),
        width,
        height,
        model = %model,
        "normalize"
    );

    let planar = unpack(src, channels);
    let resized = if (src.width(), src.height()) == (width, height) {
        planar
    } else {
        debug!(
            "Resampling {}x{} -> {}x{}",
            src.width(),
            src.height(),
            width,
            height
        );
        resize_f32(
            &planar,
            src.width() as usize,
            src.height() as usize,
            channels,
            width as usize,
            height as usize,
            filter,
        )?
    };

    pack(&resized, width, height, model, src.bits_per_component())
}

/// Reads `src` into interleaved floats at native scale.
///
/// RGB sources become four channels (alpha filled with 255 when absent),
/// 16-bit RGB is scaled down to the 8-bit range.
fn unpack(src: &PixelBuffer, channels: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(src.pixel_count() * channels);
    let bpp = src.bytes_per_pixel();
    let has_alpha = matches!(src.color_model(), ColorModel::Rgb { alpha: true });

    for y in 0..src.height() {
        for px in src.row(y).chunks_exact(bpp) {
            if channels == 1 {
                out.push(src.component(px, 0) as f32);
            } else {
                out.push(src.component_u8_scale(px, 0));
                out.push(src.component_u8_scale(px, 1));
                out.push(src.component_u8_scale(px, 2));
                out.push(if has_alpha {
                    src.component_u8_scale(px, 3)
                } else {
                    255.0
                });
            }
        }
    }
    out
}

/// Packs interleaved floats into the normalized layout.
fn pack(
    values: &[f32],
    width: u32,
    height: u32,
    model: ColorModel,
    bits_per_component: u8,
) -> OpsResult<PixelBuffer> {
    let buffer = match model {
        ColorModel::Monochrome if bits_per_component == 16 => {
            let samples: Vec<u16> = values
                .iter()
                .map(|v| v.round().clamp(0.0, 65535.0) as u16)
                .collect();
            PixelBuffer::gray16(width, height, &samples)?
        }
        ColorModel::Monochrome => PixelBuffer::gray8(width, height, quantize(values))?,
        _ => PixelBuffer::rgba8(width, height, quantize(values))?,
    };
    Ok(buffer)
}

#[inline]
fn quantize(values: &[f32]) -> Vec<u8> {
    values
        .iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_for_any_aspect() {
        for (w, h) in [(640, 480), (100, 900), (256, 256), (1, 1), (3, 1000)] {
            let src = PixelBuffer::gray8(w, h, vec![77u8; (w * h) as usize]).unwrap();
            let out = normalize(&src, 256, 256).unwrap();
            assert_eq!((out.width(), out.height()), (256, 256), "source {w}x{h}");
            assert_eq!(out.data().len(), 256 * 256);
        }
    }

    #[test]
    fn test_rgb_becomes_rgba8() {
        let src = PixelBuffer::rgb8(10, 5, vec![200u8; 10 * 5 * 3]).unwrap();
        let out = normalize(&src, 20, 20).unwrap();
        assert_eq!(out.color_model(), ColorModel::Rgb { alpha: true });
        assert_eq!(out.bytes_per_pixel(), 4);
        assert_eq!(out.bytes_per_row(), 80);
        assert!(out.data().chunks_exact(4).all(|p| p == [200, 200, 200, 255]));
    }

    #[test]
    fn test_mono_keeps_native_depth() {
        let src = PixelBuffer::gray16(8, 8, &[40000u16; 64]).unwrap();
        let out = normalize(&src, 4, 4).unwrap();
        assert_eq!(out.bits_per_component(), 16);
        assert_eq!(out.color_model(), ColorModel::Monochrome);
        let row = out.row(0);
        assert_eq!(out.component(&row[0..2], 0), 40000);
    }

    #[test]
    fn test_same_size_is_layout_only() {
        let data: Vec<u8> = (0..=255u8).cycle().take(30 * 20 * 3).collect();
        let src = PixelBuffer::rgb8(30, 20, data.clone()).unwrap();
        let out = normalize(&src, 30, 20).unwrap();
        for (rgb, rgba) in data.chunks_exact(3).zip(out.data().chunks_exact(4)) {
            assert_eq!(rgb, &rgba[..3]);
            assert_eq!(rgba[3], 255);
        }
    }

    #[test]
    fn test_padded_source() {
        // 3 gray pixels per row, padded to 4 bytes
        let data = vec![10, 20, 30, 0, 40, 50, 60, 0];
        let src = PixelBuffer::new(data, 3, 2, 8, 4, ColorModel::Monochrome).unwrap();
        let out = normalize(&src, 3, 2).unwrap();
        assert_eq!(out.data(), &[10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_empty_source_fails() {
        let src = PixelBuffer::gray8(0, 0, Vec::new()).unwrap();
        assert!(matches!(
            normalize(&src, 256, 256),
            Err(OpsError::ResampleFailure(_))
        ));
    }

    #[test]
    fn test_cmyk_rejected() {
        let src = PixelBuffer::packed(vec![0u8; 16], 2, 2, 8, ColorModel::Cmyk).unwrap();
        assert!(matches!(normalize(&src, 4, 4), Err(OpsError::Unsupported(_))));
    }
}
