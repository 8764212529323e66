//! The pair of ICC profiles used by the colorization pipeline.

use crate::{IccError, IccResult, Profile};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resource name of the profile used for RGB -> Lab.
pub const RGB_TO_LAB_PROFILE: &str = "sRGB_v4_ICC_preference.icc";

/// Resource name of the profile used for Lab -> RGB.
pub const LAB_TO_RGB_PROFILE: &str = "sRGB_ICC_v4_Appearance.icc";

/// ICC data for both conversion directions.
///
/// Profiles are parsed once when the bundle is built, so a missing or corrupt
/// resource is reported before any pixel work starts. The bundle keeps the raw
/// ICC bytes, which makes it `Send + Sync`; lcms handles are re-created from
/// them per conversion pass.
///
/// # Example
///
/// ```rust
/// use hue_icc::ProfileBundle;
///
/// let bundle = ProfileBundle::builtin().unwrap();
/// assert!(bundle.rgb_to_lab_profile().unwrap().is_rgb());
/// ```
#[derive(Clone)]
pub struct ProfileBundle {
    rgb_to_lab: Vec<u8>,
    lab_to_rgb: Vec<u8>,
    origin: Option<PathBuf>,
}

impl ProfileBundle {
    /// Uses the built-in sRGB profile for both directions.
    pub fn builtin() -> IccResult<Self> {
        let srgb = Profile::srgb().to_icc()?;
        Ok(Self {
            rgb_to_lab: srgb.clone(),
            lab_to_rgb: srgb,
            origin: None,
        })
    }

    /// Loads [`RGB_TO_LAB_PROFILE`] and [`LAB_TO_RGB_PROFILE`] from `dir`.
    ///
    /// # Errors
    ///
    /// [`IccError::ProfileNotFound`] if either file is missing, or a parse
    /// error if either is not a valid RGB profile.
    pub fn from_dir(dir: &Path) -> IccResult<Self> {
        let rgb_to_lab = read_named(dir, RGB_TO_LAB_PROFILE)?;
        let lab_to_rgb = read_named(dir, LAB_TO_RGB_PROFILE)?;
        debug!(dir = %dir.display(), "loaded profile bundle");
        Ok(Self {
            rgb_to_lab,
            lab_to_rgb,
            origin: Some(dir.to_path_buf()),
        })
    }

    /// Builds a bundle from explicit ICC data.
    pub fn from_icc(rgb_to_lab: Vec<u8>, lab_to_rgb: Vec<u8>) -> IccResult<Self> {
        validate_rgb(&rgb_to_lab, "rgb_to_lab")?;
        validate_rgb(&lab_to_rgb, "lab_to_rgb")?;
        Ok(Self {
            rgb_to_lab,
            lab_to_rgb,
            origin: None,
        })
    }

    /// Profile used for RGB -> Lab.
    pub fn rgb_to_lab_profile(&self) -> IccResult<Profile> {
        Profile::from_icc(&self.rgb_to_lab)
    }

    /// Profile used for Lab -> RGB.
    pub fn lab_to_rgb_profile(&self) -> IccResult<Profile> {
        Profile::from_icc(&self.lab_to_rgb)
    }

    /// Resource directory the profiles came from, `None` for built-ins.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl std::fmt::Debug for ProfileBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileBundle")
            .field("origin", &self.origin)
            .field("rgb_to_lab_bytes", &self.rgb_to_lab.len())
            .field("lab_to_rgb_bytes", &self.lab_to_rgb.len())
            .finish()
    }
}

fn read_named(dir: &Path, name: &str) -> IccResult<Vec<u8>> {
    let path = dir.join(name);
    if !path.is_file() {
        return Err(IccError::ProfileNotFound {
            name: name.to_string(),
            dir: dir.to_path_buf(),
        });
    }
    let data = std::fs::read(&path)?;
    validate_rgb(&data, name)?;
    Ok(data)
}

fn validate_rgb(data: &[u8], name: &str) -> IccResult<()> {
    let profile = Profile::from_icc(data)?;
    if !profile.is_rgb() {
        return Err(IccError::InvalidProfile(format!(
            "{name}: expected an RGB profile, got {}",
            profile.color_space()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() {
        let bundle = ProfileBundle::builtin().unwrap();
        assert!(bundle.origin().is_none());
        assert!(bundle.lab_to_rgb_profile().unwrap().is_rgb());
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let srgb = Profile::srgb().to_icc().unwrap();
        std::fs::write(dir.path().join(RGB_TO_LAB_PROFILE), &srgb).unwrap();
        std::fs::write(dir.path().join(LAB_TO_RGB_PROFILE), &srgb).unwrap();

        let bundle = ProfileBundle::from_dir(dir.path()).unwrap();
        assert_eq!(bundle.origin(), Some(dir.path()));
    }

    #[test]
    fn test_missing_profile() {
        let dir = tempfile::tempdir().unwrap();
        let srgb = Profile::srgb().to_icc().unwrap();
        std::fs::write(dir.path().join(RGB_TO_LAB_PROFILE), &srgb).unwrap();

        let err = ProfileBundle::from_dir(dir.path()).unwrap_err();
        match err {
            IccError::ProfileNotFound { name, .. } => assert_eq!(name, LAB_TO_RGB_PROFILE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_rgb_rejected() {
        let lab = Profile::lab().unwrap().to_icc().unwrap();
        let srgb = Profile::srgb().to_icc().unwrap();
        assert!(matches!(
            ProfileBundle::from_icc(lab, srgb),
            Err(IccError::InvalidProfile(_))
        ));
    }
}
