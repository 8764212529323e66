//! Pixel buffers to planar Lab channels and back.

use crate::adapter::ColorAdapter;
use crate::error::{ColorizeError, Result};
use hue_core::lab::check_lengths;
use hue_core::{ColorModel, LabChannels, PixelBuffer, Rgb};
use tracing::trace;

/// Reads every pixel of `image` into planar Lab channels, row-major.
///
/// RGB buffers contribute their first three components (alpha is ignored);
/// monochrome buffers replicate the gray sample into R, G and B. 16-bit
/// samples are scaled to the 8-bit range first.
///
/// # Errors
///
/// - [`ColorizeError::UnsupportedColorSpace`] for CMYK or indexed buffers
/// - [`ColorizeError::NoPixelData`] for an empty buffer
pub fn extract_lab(image: &PixelBuffer, adapter: &ColorAdapter) -> Result<LabChannels> {
    let model = image.color_model();
    let mono = match model {
        ColorModel::Rgb { .. } => false,
        ColorModel::Monochrome => true,
        other => return Err(ColorizeError::UnsupportedColorSpace(other)),
    };
    if image.is_empty() {
        return Err(ColorizeError::NoPixelData);
    }

    let (width, height) = (image.width(), image.height());
    trace!(width, height, %model, "extract_lab");

    let pass = adapter.rgb_to_lab_pass()?;
    let stride = image.bytes_per_pixel();
    let mut out = LabChannels::with_capacity(width, height);
    let mut row = Vec::with_capacity(width as usize);

    for y in 0..height {
        row.clear();
        for px in image.row(y).chunks_exact(stride) {
            row.push(if mono {
                let v = image.component_u8_scale(px, 0);
                [v, v, v]
            } else {
                [
                    image.component_u8_scale(px, 0),
                    image.component_u8_scale(px, 1),
                    image.component_u8_scale(px, 2),
                ]
            });
        }
        pass.convert_row(&mut row);
        for &[l, a, b] in &row {
            out.l.push(l);
            out.a.push(a);
            out.b.push(b);
        }
    }

    Ok(out)
}

/// Builds an RGBA8 image from planar Lab channels. Alpha is opaque.
///
/// # Errors
///
/// - [`ColorizeError::ChannelLengthMismatch`] unless all channels hold
///   `width * height` values
/// - [`ColorizeError::NoPixelData`] for a zero-sized target
pub fn synthesize_image(
    l: &[f32],
    a: &[f32],
    b: &[f32],
    width: u32,
    height: u32,
    adapter: &ColorAdapter,
) -> Result<PixelBuffer> {
    check_lengths(l, a, b, width, height)?;
    if l.is_empty() {
        return Err(ColorizeError::NoPixelData);
    }
    trace!(width, height, "synthesize_image");

    let pass = adapter.lab_to_rgb_pass()?;
    let w = width as usize;
    let mut data = Vec::with_capacity(l.len() * 4);
    let mut row = Vec::with_capacity(w);

    for start in (0..l.len()).step_by(w) {
        let end = start + w;
        row.clear();
        row.extend(
            l[start..end]
                .iter()
                .zip(&a[start..end])
                .zip(&b[start..end])
                .map(|((&l, &a), &b)| [l, a, b]),
        );
        pass.convert_row(&mut row);
        for &[r, g, b] in &row {
            let [r, g, b] = Rgb::new(r, g, b).to_u8();
            data.extend_from_slice(&[r, g, b, 255]);
        }
    }

    Ok(PixelBuffer::rgba8(width, height, data)?)
}
