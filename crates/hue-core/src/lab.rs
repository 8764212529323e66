//! CIE L\*a\*b\* values and planar channel storage.
//!
//! [`LabChannels`] holds one float per pixel in three parallel vectors,
//! row-major (`index = row * width + col`). L is in `[0, 100]`, a and b are
//! roughly in `[-128, 127]`.

use crate::{Error, Result};

/// A single device RGB triple, components in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Rgb {
    /// Creates an RGB triple.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamps and rounds to 8-bit components.
    #[inline]
    pub fn to_u8(self) -> [u8; 3] {
        [quantize(self.r), quantize(self.g), quantize(self.b)]
    }
}

#[inline]
fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// A single L\*a\*b\* triple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness.
    pub l: f32,
    /// Green-red opponent.
    pub a: f32,
    /// Blue-yellow opponent.
    pub b: f32,
}

impl Lab {
    /// Creates a Lab triple.
    #[inline]
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }
}

/// Planar L, a, b channels of an image.
#[derive(Debug, Clone, PartialEq)]
pub struct LabChannels {
    /// Lightness per pixel.
    pub l: Vec<f32>,
    /// Green-red per pixel.
    pub a: Vec<f32>,
    /// Blue-yellow per pixel.
    pub b: Vec<f32>,
    width: u32,
    height: u32,
}

impl LabChannels {
    /// Wraps three channel vectors after checking their lengths.
    ///
    /// # Errors
    ///
    /// [`Error::ChannelLength`] unless all three have `width * height` entries.
    pub fn new(l: Vec<f32>, a: Vec<f32>, b: Vec<f32>, width: u32, height: u32) -> Result<Self> {
        check_lengths(&l, &a, &b, width, height)?;
        Ok(Self {
            l,
            a,
            b,
            width,
            height,
        })
    }

    /// Empty channels with room for `width * height` pixels.
    pub fn with_capacity(width: u32, height: u32) -> Self {
        let n = width as usize * height as usize;
        Self {
            l: Vec::with_capacity(n),
            a: Vec::with_capacity(n),
            b: Vec::with_capacity(n),
            width,
            height,
        }
    }

    /// Appends one pixel in scan order.
    #[inline]
    pub fn push(&mut self, lab: Lab) {
        self.l.push(lab.l);
        self.a.push(lab.a);
        self.b.push(lab.b);
    }

    /// Image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.l.len()
    }

    /// Returns `true` if no pixels are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }

    /// Lab triple at `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> Lab {
        Lab::new(self.l[idx], self.a[idx], self.b[idx])
    }

    /// Splits into `(l, a, b)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        (self.l, self.a, self.b)
    }
}

/// Checks that three planar channels cover exactly `width * height` pixels.
pub fn check_lengths(l: &[f32], a: &[f32], b: &[f32], width: u32, height: u32) -> Result<()> {
    let n = width as usize * height as usize;
    if l.len() != a.len() || a.len() != b.len() || l.len() != n {
        return Err(Error::ChannelLength {
            l: l.len(),
            a: a.len(),
            b: b.len(),
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_lengths() {
        assert!(LabChannels::new(vec![0.0; 4], vec![0.0; 4], vec![0.0; 4], 2, 2).is_ok());
        assert!(LabChannels::new(vec![0.0; 4], vec![0.0; 3], vec![0.0; 4], 2, 2).is_err());
        assert!(LabChannels::new(vec![0.0; 3], vec![0.0; 3], vec![0.0; 3], 2, 2).is_err());
    }

    #[test]
    fn test_push_scan_order() {
        let mut ch = LabChannels::with_capacity(2, 1);
        ch.push(Lab::new(10.0, 1.0, -1.0));
        ch.push(Lab::new(20.0, 2.0, -2.0));
        assert_eq!(ch.len(), 2);
        assert_eq!(ch.get(1), Lab::new(20.0, 2.0, -2.0));
    }

    #[test]
    fn test_rgb_quantize() {
        assert_eq!(Rgb::new(-3.0, 127.6, 300.0).to_u8(), [0, 128, 255]);
    }
}
