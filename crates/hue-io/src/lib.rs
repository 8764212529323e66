//! # hue-io
//!
//! Reads PNG and JPEG files into [`PixelBuffer`]s and writes PNG.
//!
//! Unlike a general-purpose loader, grayscale sources stay single-channel
//! ([`ColorModel::Monochrome`](hue_core::ColorModel::Monochrome)) so the
//! colorizer sees the layout the photo was stored in. CMYK JPEGs are returned
//! tagged as CMYK rather than approximated.
//!
//! # Example
//!
//! ```rust,ignore
//! let photo = hue_io::read("grandma.jpg")?;
//! hue_io::write_png("grandma_color.png", &photo)?;
//! ```

#![warn(missing_docs)]

mod error;
pub mod jpeg;
pub mod png;

pub use error::{IoError, IoResult};
pub use self::png::write as write_png;

use hue_core::PixelBuffer;
use std::io::Read;
use std::path::Path;

/// Container format detected from file magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Network Graphics.
    Png,
    /// JPEG / JFIF.
    Jpeg,
}

impl Format {
    /// Detects the format from the first bytes of a file.
    pub fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Format::Png)
        } else if header.starts_with(&[0xFF, 0xD8]) {
            Some(Format::Jpeg)
        } else {
            None
        }
    }
}

/// Reads an image, detecting PNG or JPEG from its contents.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    let mut header = [0u8; 8];
    let n = std::fs::File::open(path)?.read(&mut header)?;

    match Format::from_magic(&header[..n]) {
        Some(Format::Png) => self::png::read(path),
        Some(Format::Jpeg) => jpeg::read(path),
        None => Err(IoError::UnsupportedFormat(path.display().to_string())),
    }
}
