//! RGB <-> Lab conversion through the configured ICC profile pair.
//!
//! RGB values on this side of the API are in `[0, 255]`; they are scaled to
//! `[0, 1]` for Little CMS and back.

use crate::error::{ColorizeError, Result};
use hue_core::{Lab, Rgb};
use hue_icc::{Intent, LabTransform, ProfileBundle};
use tracing::debug;

/// Converts between device RGB and Lab with a fixed perceptual intent.
///
/// Holds only profile bytes, so one adapter can be shared by concurrent
/// colorize calls. Each conversion pass builds its own transform.
#[derive(Debug, Clone)]
pub struct ColorAdapter {
    profiles: ProfileBundle,
    intent: Intent,
}

impl ColorAdapter {
    /// Parses both profiles and builds one transform per direction to make
    /// sure they are usable.
    ///
    /// # Errors
    ///
    /// [`ColorizeError::ColorProfileUnavailable`] if either profile is
    /// missing, unreadable, or cannot be paired with Lab.
    pub fn new(profiles: &ProfileBundle) -> Result<Self> {
        let adapter = Self {
            profiles: profiles.clone(),
            intent: Intent::Perceptual,
        };
        adapter.rgb_to_lab_pass()?;
        adapter.lab_to_rgb_pass()?;
        debug!(origin = ?profiles.origin(), "color adapter ready");
        Ok(adapter)
    }

    /// Adapter using the built-in sRGB profile in both directions.
    pub fn builtin() -> Result<Self> {
        let profiles = ProfileBundle::builtin().map_err(ColorizeError::ColorProfileUnavailable)?;
        Self::new(&profiles)
    }

    /// Builds the RGB -> Lab transform for one pass over an image.
    pub fn rgb_to_lab_pass(&self) -> Result<RgbToLab> {
        let profile = self
            .profiles
            .rgb_to_lab_profile()
            .map_err(ColorizeError::ColorProfileUnavailable)?;
        LabTransform::rgb_to_lab(&profile, self.intent)
            .map(RgbToLab)
            .map_err(ColorizeError::ColorProfileUnavailable)
    }

    /// Builds the Lab -> RGB transform for one pass over an image.
    pub fn lab_to_rgb_pass(&self) -> Result<LabToRgb> {
        let profile = self
            .profiles
            .lab_to_rgb_profile()
            .map_err(ColorizeError::ColorProfileUnavailable)?;
        LabTransform::lab_to_rgb(&profile, self.intent)
            .map(LabToRgb)
            .map_err(ColorizeError::ColorProfileUnavailable)
    }

    /// Converts one RGB triple. Prefer a pass for whole images.
    pub fn rgb_to_lab(&self, rgb: Rgb) -> Result<Lab> {
        Ok(self.rgb_to_lab_pass()?.convert(rgb))
    }

    /// Converts one Lab triple. Prefer a pass for whole images.
    pub fn lab_to_rgb(&self, lab: Lab) -> Result<Rgb> {
        Ok(self.lab_to_rgb_pass()?.convert(lab))
    }
}

/// RGB -> Lab transform for one pass.
pub struct RgbToLab(LabTransform);

impl RgbToLab {
    /// Converts one triple.
    #[inline]
    pub fn convert(&self, rgb: Rgb) -> Lab {
        let [l, a, b] = self.0.convert([rgb.r / 255.0, rgb.g / 255.0, rgb.b / 255.0]);
        Lab::new(l, a, b)
    }

    /// Converts a row of `[0, 255]` triples to `[L, a, b]` in place.
    pub fn convert_row(&self, row: &mut [[f32; 3]]) {
        for px in row.iter_mut() {
            *px = px.map(|v| v / 255.0);
        }
        self.0.apply(row);
    }
}

/// Lab -> RGB transform for one pass.
pub struct LabToRgb(LabTransform);

impl LabToRgb {
    /// Converts one triple.
    #[inline]
    pub fn convert(&self, lab: Lab) -> Rgb {
        let [r, g, b] = self.0.convert([lab.l, lab.a, lab.b]);
        Rgb::new(r * 255.0, g * 255.0, b * 255.0)
    }

    /// Converts a row of `[L, a, b]` to `[0, 255]` triples in place.
    pub fn convert_row(&self, row: &mut [[f32; 3]]) {
        self.0.apply(row);
        for px in row.iter_mut() {
            *px = px.map(|v| v * 255.0);
        }
    }
}
