//! JPEG reading.
//!
//! Pixel formats map to buffers without conversion:
//! `L8` / `L16` -> monochrome, `RGB24` -> RGB, `CMYK32` -> CMYK.

use crate::{IoError, IoResult};
use hue_core::{ColorModel, PixelBuffer};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Reads a JPEG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let file = File::open(path.as_ref())?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    debug!(width, height, format = ?info.pixel_format, "jpeg::read");

    let buffer = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => PixelBuffer::gray8(width, height, pixels)?,
        jpeg_decoder::PixelFormat::L16 => {
            // Decoder emits big-endian samples
            let samples: Vec<u16> = pixels
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]))
                .collect();
            PixelBuffer::gray16(width, height, &samples)?
        }
        jpeg_decoder::PixelFormat::RGB24 => PixelBuffer::rgb8(width, height, pixels)?,
        jpeg_decoder::PixelFormat::CMYK32 => {
            PixelBuffer::packed(pixels, width, height, 8, ColorModel::Cmyk)?
        }
        #[allow(unreachable_patterns)]
        other => return Err(IoError::UnsupportedLayout(format!("{other:?}"))),
    };

    Ok(buffer)
}
