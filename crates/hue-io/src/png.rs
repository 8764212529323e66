//! PNG format support.
//!
//! Palette and sub-byte images are expanded by the decoder. Grayscale stays
//! single-channel; gray+alpha drops its alpha.

use crate::{IoError, IoResult};
use hue_core::{ColorModel, PixelBuffer};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    let mut decoder = ::png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(::png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: ::png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: ::png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width, info.height);
    debug!(width, height, color = ?info.color_type, depth = ?info.bit_depth, "png::read");

    let buffer = match (info.color_type, info.bit_depth) {
        (::png::ColorType::Rgb, ::png::BitDepth::Eight) => PixelBuffer::rgb8(width, height, buf)?,
        (::png::ColorType::Rgba, ::png::BitDepth::Eight) => {
            PixelBuffer::rgba8(width, height, buf)?
        }
        (::png::ColorType::Rgb, ::png::BitDepth::Sixteen) => PixelBuffer::packed(
            be_to_ne(&buf),
            width,
            height,
            16,
            ColorModel::Rgb { alpha: false },
        )?,
        (::png::ColorType::Rgba, ::png::BitDepth::Sixteen) => PixelBuffer::packed(
            be_to_ne(&buf),
            width,
            height,
            16,
            ColorModel::Rgb { alpha: true },
        )?,
        (::png::ColorType::Grayscale, ::png::BitDepth::Eight) => {
            PixelBuffer::gray8(width, height, buf)?
        }
        (::png::ColorType::Grayscale, ::png::BitDepth::Sixteen) => {
            PixelBuffer::packed(be_to_ne(&buf), width, height, 16, ColorModel::Monochrome)?
        }
        (::png::ColorType::GrayscaleAlpha, ::png::BitDepth::Eight) => {
            let gray = buf.chunks_exact(2).map(|ga| ga[0]).collect();
            PixelBuffer::gray8(width, height, gray)?
        }
        (::png::ColorType::GrayscaleAlpha, ::png::BitDepth::Sixteen) => {
            let gray = be_to_ne(&buf)
                .chunks_exact(4)
                .flat_map(|ga| [ga[0], ga[1]])
                .collect();
            PixelBuffer::packed(gray, width, height, 16, ColorModel::Monochrome)?
        }
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedLayout(format!(
                "{:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    Ok(buffer)
}

/// Writes a buffer as PNG.
///
/// Supports 8-bit RGB / RGBA / gray and 16-bit gray. Row padding is dropped.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    let (color_type, depth) = match (image.color_model(), image.bits_per_component()) {
        (ColorModel::Rgb { alpha: true }, 8) => (::png::ColorType::Rgba, ::png::BitDepth::Eight),
        (ColorModel::Rgb { alpha: false }, 8) => (::png::ColorType::Rgb, ::png::BitDepth::Eight),
        (ColorModel::Monochrome, 8) => (::png::ColorType::Grayscale, ::png::BitDepth::Eight),
        (ColorModel::Monochrome, 16) => (::png::ColorType::Grayscale, ::png::BitDepth::Sixteen),
        (model, bits) => {
            return Err(IoError::UnsupportedLayout(format!(
                "cannot write {model} at {bits} bits"
            )));
        }
    };

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);

    let mut encoder = ::png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(color_type);
    encoder.set_depth(depth);
    encoder.set_compression(::png::Compression::default());
    encoder.set_source_srgb(::png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    let mut packed = Vec::with_capacity(image.pixel_count() * image.bytes_per_pixel());
    for y in 0..image.height() {
        packed.extend_from_slice(image.row(y));
    }
    if depth == ::png::BitDepth::Sixteen {
        packed = ne_to_be(&packed);
    }

    png_writer
        .write_image_data(&packed)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    Ok(())
}

/// Big-endian 16-bit samples to native order.
fn be_to_ne(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(2)
        .flat_map(|c| u16::from_be_bytes([c[0], c[1]]).to_ne_bytes())
        .collect()
}

/// Native-order 16-bit samples to big-endian.
fn ne_to_be(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(2)
        .flat_map(|c| u16::from_ne_bytes([c[0], c[1]]).to_be_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_rgba() {
        let (width, height) = (16u32, 8u32);
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 16) as u8, (y * 16) as u8, 64, 255]);
            }
        }
        let image = PixelBuffer::rgba8(width, height, data.clone()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        write(&path, &image).expect("Failed to write PNG");

        let loaded = read(&path).expect("Failed to read PNG");
        assert_eq!(loaded.width(), width);
        assert_eq!(loaded.height(), height);
        assert_eq!(loaded.color_model(), ColorModel::Rgb { alpha: true });
        assert_eq!(loaded.data(), &data[..]);
    }

    #[test]
    fn test_gray_stays_monochrome() {
        let image = PixelBuffer::gray8(5, 3, (0..15u8).map(|v| v * 10).collect()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        write(&path, &image).unwrap();

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.color_model(), ColorModel::Monochrome);
        assert_eq!(loaded.data(), image.data());
    }

    #[test]
    fn test_gray16_byte_order() {
        let image = PixelBuffer::gray16(2, 1, &[0x1234, 0xABCD]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray16.png");
        write(&path, &image).unwrap();

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.bits_per_component(), 16);
        let row = loaded.row(0);
        assert_eq!(loaded.component(&row[2..4], 0), 0xABCD);
    }

    #[test]
    fn test_write_cmyk_rejected() {
        let image = PixelBuffer::packed(vec![0u8; 4], 1, 1, 8, ColorModel::Cmyk).unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            write(dir.path().join("x.png"), &image),
            Err(IoError::UnsupportedLayout(_))
        ));
    }
}
