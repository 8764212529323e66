//! # hue-icc
//!
//! ICC color management for the colorization pipeline.
//!
//! Thin layer over Little CMS 2 (through the `lcms2` crate) that converts
//! device RGB to CIE L\*a\*b\* and back using a pair of ICC profiles, one per
//! direction, and a fixed rendering intent.
//!
//! # Example
//!
//! ```rust
//! use hue_icc::{Intent, LabTransform, Profile};
//!
//! let srgb = Profile::srgb();
//! let to_lab = LabTransform::rgb_to_lab(&srgb, Intent::Perceptual).unwrap();
//!
//! let lab = to_lab.convert([1.0, 1.0, 1.0]);
//! assert!(lab[0] > 99.0); // white is L* = 100
//! ```
//!
//! # Profile resources
//!
//! [`ProfileBundle`] locates the two profiles by file name inside a resource
//! directory, or falls back to the built-in sRGB profile for both directions.
//!
//! # Thread Safety
//!
//! A [`LabTransform`] is meant to be built once per conversion pass and used
//! from the thread that built it. [`ProfileBundle`] only holds ICC bytes and
//! can be shared freely.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod bundle;
mod error;
mod profile;
mod transform;

pub use bundle::{ProfileBundle, LAB_TO_RGB_PROFILE, RGB_TO_LAB_PROFILE};
pub use error::{IccError, IccResult};
pub use profile::Profile;
pub use transform::{Direction, LabTransform};

/// Rendering intent for color transformations.
///
/// Determines how out-of-gamut colors are handled during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    /// Compresses the source gamut into the destination gamut.
    ///
    /// Used by the colorization pipeline in both directions.
    #[default]
    Perceptual,

    /// Clips out-of-gamut colors, maps white to white.
    RelativeColorimetric,

    /// Maintains saturation at the expense of accuracy.
    Saturation,

    /// Like relative colorimetric but without white point adaptation.
    AbsoluteColorimetric,
}

impl From<Intent> for lcms2::Intent {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Perceptual => lcms2::Intent::Perceptual,
            Intent::RelativeColorimetric => lcms2::Intent::RelativeColorimetric,
            Intent::Saturation => lcms2::Intent::Saturation,
            Intent::AbsoluteColorimetric => lcms2::Intent::AbsoluteColorimetric,
        }
    }
}
