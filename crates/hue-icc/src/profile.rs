//! ICC profile handle.

use crate::{IccError, IccResult};
use lcms2::{ColorSpaceSignature, Profile as LcmsProfile};

/// A parsed ICC profile.
///
/// Not `Send`: lcms profile handles are created where they are used, from
/// bytes held by a [`crate::ProfileBundle`].
pub struct Profile {
    pub(crate) inner: LcmsProfile,
}

impl Profile {
    /// Parses ICC data.
    ///
    /// # Errors
    ///
    /// [`IccError::InvalidProfile`] if lcms rejects the data.
    pub fn from_icc(data: &[u8]) -> IccResult<Self> {
        LcmsProfile::new_icc(data)
            .map(|inner| Self { inner })
            .map_err(|e| IccError::InvalidProfile(e.to_string()))
    }

    /// The lcms built-in sRGB profile.
    pub fn srgb() -> Self {
        Self {
            inner: LcmsProfile::new_srgb(),
        }
    }

    /// CIE L\*a\*b\* v4 with a D50 white point, the Lab side of every transform.
    pub fn lab() -> IccResult<Self> {
        LcmsProfile::new_lab4_context(lcms2::GlobalContext::new(), &lcms2::CIExyY::d50())
            .map(|inner| Self { inner })
            .map_err(|e| IccError::CreateFailed(e.to_string()))
    }

    /// Description tag, empty when the profile has none.
    pub fn description(&self) -> String {
        self.inner
            .info(lcms2::InfoType::Description, lcms2::Locale::none())
            .unwrap_or_default()
    }

    /// Data color space, e.g. `RgbData`.
    pub fn color_space(&self) -> String {
        format!("{:?}", self.inner.color_space())
    }

    /// `true` for device RGB profiles, the only kind the bundle accepts.
    pub fn is_rgb(&self) -> bool {
        matches!(self.inner.color_space(), ColorSpaceSignature::RgbData)
    }

    /// `true` for Lab profiles.
    pub fn is_lab(&self) -> bool {
        matches!(self.inner.color_space(), ColorSpaceSignature::LabData)
    }

    /// Serializes the profile, used to keep profiles as shareable bytes.
    pub fn to_icc(&self) -> IccResult<Vec<u8>> {
        self.inner
            .icc()
            .map_err(|e| IccError::CreateFailed(e.to_string()))
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("description", &self.description())
            .field("color_space", &self.color_space())
            .finish()
    }
}
