//! RGB <-> Lab transforms.

use crate::{IccError, IccResult, Intent, Profile};
use lcms2::{PixelFormat, Transform as LcmsTransform};

/// Conversion direction of a [`LabTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Device RGB (`[0, 1]` floats) to L\*a\*b\*.
    RgbToLab,
    /// L\*a\*b\* to device RGB (`[0, 1]` floats).
    LabToRgb,
}

/// A float transform between an RGB profile and the Lab v4 profile.
///
/// Construction is expensive (lcms builds and optimizes a pipeline); build
/// one per conversion pass and reuse it for every pixel.
///
/// # Example
///
/// ```rust
/// use hue_icc::{Intent, LabTransform, Profile};
///
/// let srgb = Profile::srgb();
/// let to_lab = LabTransform::rgb_to_lab(&srgb, Intent::Perceptual).unwrap();
/// let to_rgb = LabTransform::lab_to_rgb(&srgb, Intent::Perceptual).unwrap();
///
/// let lab = to_lab.convert([0.5, 0.3, 0.2]);
/// let rgb = to_rgb.convert(lab);
/// assert!((rgb[0] - 0.5).abs() < 0.01);
/// ```
pub struct LabTransform {
    inner: LcmsTransform<[f32; 3], [f32; 3]>,
    direction: Direction,
}

impl LabTransform {
    /// Creates an RGB -> Lab transform from `rgb` profile.
    pub fn rgb_to_lab(rgb: &Profile, intent: Intent) -> IccResult<Self> {
        let lab = Profile::lab()?;
        let inner = LcmsTransform::new(
            &rgb.inner,
            PixelFormat::RGB_FLT,
            &lab.inner,
            PixelFormat::Lab_FLT,
            intent.into(),
        )
        .map_err(|e| IccError::TransformFailed(e.to_string()))?;

        tracing::trace!(profile = %rgb.description(), ?intent, "rgb_to_lab transform");
        Ok(Self {
            inner,
            direction: Direction::RgbToLab,
        })
    }

    /// Creates a Lab -> RGB transform into `rgb` profile.
    pub fn lab_to_rgb(rgb: &Profile, intent: Intent) -> IccResult<Self> {
        let lab = Profile::lab()?;
        let inner = LcmsTransform::new(
            &lab.inner,
            PixelFormat::Lab_FLT,
            &rgb.inner,
            PixelFormat::RGB_FLT,
            intent.into(),
        )
        .map_err(|e| IccError::TransformFailed(e.to_string()))?;

        tracing::trace!(profile = %rgb.description(), ?intent, "lab_to_rgb transform");
        Ok(Self {
            inner,
            direction: Direction::LabToRgb,
        })
    }

    /// Direction of this transform.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Converts a single triple.
    #[inline]
    pub fn convert(&self, value: [f32; 3]) -> [f32; 3] {
        let src = [value];
        let mut dst = [[0.0f32; 3]];
        self.inner.transform_pixels(&src, &mut dst);
        dst[0]
    }

    /// Converts triples in place.
    pub fn apply(&self, pixels: &mut [[f32; 3]]) {
        self.inner.transform_in_place(pixels);
    }
}

impl std::fmt::Debug for LabTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabTransform")
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}
