//! Device pixel buffers.
//!
//! A [`PixelBuffer`] is the unit exchanged between image decoders, the
//! normalizer and the colorization pipeline. It owns raw bytes laid out in
//! rows of `bytes_per_row` bytes, top-to-bottom:
//!
//! ```text
//! Memory: [R G B A R G B A ... pad]  <- Row 0
//!         [R G B A R G B A ... pad]  <- Row 1
//! ```
//!
//! Monochrome buffers store one component per pixel. 16-bit components are
//! stored in native byte order.
//!
//! # Invariants
//!
//! - `bytes_per_row * height == data.len()`
//! - `bytes_per_row >= width * bytes_per_pixel`
//! - `bits_per_component` is 8 or 16
//!
//! # Example
//!
//! ```rust
//! use hue_core::{ColorModel, PixelBuffer};
//!
//! let gray = PixelBuffer::gray8(4, 2, vec![128u8; 8]).unwrap();
//! assert_eq!(gray.bits_per_pixel(), 8);
//! assert_eq!(gray.color_model(), ColorModel::Monochrome);
//! ```

use crate::{Error, Result};

/// Color model tag carried by a [`PixelBuffer`].
///
/// Decoders may report any of these; the colorization pipeline only accepts
/// [`ColorModel::Rgb`] and [`ColorModel::Monochrome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorModel {
    /// Device RGB, optionally followed by an alpha component.
    Rgb {
        /// Whether a fourth (alpha) component is present.
        alpha: bool,
    },
    /// Single gray component.
    Monochrome,
    /// Four-component CMYK.
    Cmyk,
    /// Palette indices.
    Indexed,
}

impl ColorModel {
    /// Number of components stored per pixel.
    #[inline]
    pub fn components(self) -> usize {
        match self {
            ColorModel::Rgb { alpha: true } => 4,
            ColorModel::Rgb { alpha: false } => 3,
            ColorModel::Monochrome => 1,
            ColorModel::Cmyk => 4,
            ColorModel::Indexed => 1,
        }
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            ColorModel::Rgb { alpha: true } => "RGBA",
            ColorModel::Rgb { alpha: false } => "RGB",
            ColorModel::Monochrome => "Monochrome",
            ColorModel::Cmyk => "CMYK",
            ColorModel::Indexed => "Indexed",
        }
    }

    /// Returns `true` for the models the colorization pipeline can read.
    #[inline]
    pub fn is_colorizable(self) -> bool {
        matches!(self, ColorModel::Rgb { .. } | ColorModel::Monochrome)
    }
}

impl std::fmt::Display for ColorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Owned raw pixel buffer with explicit stride and color model.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    bits_per_component: u8,
    bytes_per_row: usize,
    model: ColorModel,
}

impl PixelBuffer {
    /// Creates a buffer from raw bytes with a custom row stride.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for a bit depth other than 8 or 16
    /// - [`Error::InvalidStride`] if `bytes_per_row` cannot hold one row
    /// - [`Error::BufferLength`] if `bytes_per_row * height != data.len()`
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        bits_per_component: u8,
        bytes_per_row: usize,
        model: ColorModel,
    ) -> Result<Self> {
        if bits_per_component != 8 && bits_per_component != 16 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("unsupported bit depth {bits_per_component}"),
            ));
        }

        let bytes_per_pixel = model.components() * (bits_per_component as usize / 8);
        let min_stride = (width as usize)
            .checked_mul(bytes_per_pixel)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "row size overflows"))?;
        if bytes_per_row < min_stride {
            return Err(Error::InvalidStride {
                stride: bytes_per_row,
                min_stride,
                width,
            });
        }

        let expected = bytes_per_row
            .checked_mul(height as usize)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() != expected {
            return Err(Error::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            bits_per_component,
            bytes_per_row,
            model,
        })
    }

    /// Creates a tightly packed buffer (no row padding).
    pub fn packed(
        data: Vec<u8>,
        width: u32,
        height: u32,
        bits_per_component: u8,
        model: ColorModel,
    ) -> Result<Self> {
        let bytes_per_row =
            width as usize * model.components() * (bits_per_component as usize / 8);
        Self::new(data, width, height, bits_per_component, bytes_per_row, model)
    }

    /// Creates a packed 8-bit RGBA buffer.
    pub fn rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::packed(data, width, height, 8, ColorModel::Rgb { alpha: true })
    }

    /// Creates a packed 8-bit RGB buffer.
    pub fn rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::packed(data, width, height, 8, ColorModel::Rgb { alpha: false })
    }

    /// Creates a packed 8-bit grayscale buffer.
    pub fn gray8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::packed(data, width, height, 8, ColorModel::Monochrome)
    }

    /// Creates a packed 16-bit grayscale buffer from samples.
    pub fn gray16(width: u32, height: u32, samples: &[u16]) -> Result<Self> {
        let data = samples.iter().flat_map(|s| s.to_ne_bytes()).collect();
        Self::packed(data, width, height, 16, ColorModel::Monochrome)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bits per color component (8 or 16).
    #[inline]
    pub fn bits_per_component(&self) -> u8 {
        self.bits_per_component
    }

    /// Bits per pixel, all components included.
    #[inline]
    pub fn bits_per_pixel(&self) -> usize {
        self.model.components() * self.bits_per_component as usize
    }

    /// Bytes per pixel (the extractor's stride).
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bits_per_pixel() / 8
    }

    /// Bytes per row, padding included.
    #[inline]
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Color model tag.
    #[inline]
    pub fn color_model(&self) -> ColorModel {
        self.model
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0 || self.data.is_empty()
    }

    /// Raw bytes, row padding included.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel bytes of row `y` without trailing padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.bytes_per_row;
        &self.data[start..start + self.width as usize * self.bytes_per_pixel()]
    }

    /// Reads component `c` of a pixel slice at full precision.
    ///
    /// 8-bit values are returned as-is, 16-bit values as native-endian `u16`.
    #[inline]
    pub fn component(&self, pixel: &[u8], c: usize) -> u16 {
        if self.bits_per_component == 16 {
            u16::from_ne_bytes([pixel[c * 2], pixel[c * 2 + 1]])
        } else {
            pixel[c] as u16
        }
    }

    /// Reads component `c` of a pixel slice scaled to `[0, 255]`.
    #[inline]
    pub fn component_u8_scale(&self, pixel: &[u8], c: usize) -> f32 {
        if self.bits_per_component == 16 {
            self.component(pixel, c) as f32 / 257.0
        } else {
            pixel[c] as f32
        }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bits_per_component", &self.bits_per_component)
            .field("bytes_per_row", &self.bytes_per_row)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_stride() {
        let buf = PixelBuffer::rgba8(3, 2, vec![0u8; 24]).unwrap();
        assert_eq!(buf.bytes_per_row(), 12);
        assert_eq!(buf.bits_per_pixel(), 32);
        assert_eq!(buf.bytes_per_pixel(), 4);
        assert_eq!(buf.pixel_count(), 6);
    }

    #[test]
    fn test_padded_rows() {
        // 2 RGB pixels per row = 6 bytes, padded to 8
        let mut data = vec![0u8; 16];
        data[8] = 7;
        let buf = PixelBuffer::new(data, 2, 2, 8, 8, ColorModel::Rgb { alpha: false }).unwrap();
        assert_eq!(buf.row(1).len(), 6);
        assert_eq!(buf.row(1)[0], 7);
    }

    #[test]
    fn test_length_mismatch() {
        let err = PixelBuffer::gray8(4, 4, vec![0u8; 15]).unwrap_err();
        assert!(matches!(err, Error::BufferLength { expected: 16, actual: 15 }));
    }

    #[test]
    fn test_short_stride() {
        let err = PixelBuffer::new(vec![0u8; 8], 4, 2, 8, 2, ColorModel::Monochrome).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { min_stride: 4, .. }));
    }

    #[test]
    fn test_bad_bit_depth() {
        let err = PixelBuffer::packed(vec![0u8; 4], 4, 1, 12, ColorModel::Monochrome);
        assert!(err.is_err());
    }

    #[test]
    fn test_gray16_components() {
        let buf = PixelBuffer::gray16(2, 1, &[0, 65535]).unwrap();
        assert_eq!(buf.bytes_per_pixel(), 2);
        let row = buf.row(0);
        assert_eq!(buf.component(&row[2..4], 0), 65535);
        assert!((buf.component_u8_scale(&row[2..4], 0) - 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_color_model() {
        assert_eq!(ColorModel::Rgb { alpha: true }.components(), 4);
        assert!(ColorModel::Monochrome.is_colorizable());
        assert!(!ColorModel::Cmyk.is_colorizable());
        assert_eq!(ColorModel::Indexed.to_string(), "Indexed");
    }

    #[test]
    fn test_empty_buffer() {
        let buf = PixelBuffer::gray8(0, 0, Vec::new()).unwrap();
        assert!(buf.is_empty());
    }
}
