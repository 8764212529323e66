//! Colorizer configuration.
//!
//! ```yaml
//! model_url: https://example.com/models/colorizer.onnx
//! cache_dir: ~/.cache/hue           # optional
//! profile_dir: profiles             # optional, relative to this file
//! filter: lanczos3                  # nearest | bilinear | bicubic | lanczos3
//! intra_threads: 0                  # 0 = backend default
//! ```

use crate::error::{ColorizeError, Result};
use hue_icc::ProfileBundle;
use hue_ops::Filter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for a [`crate::Colorizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorizeConfig {
    /// Where to download the model from.
    pub model_url: Option<String>,
    /// Model cache directory. Defaults to `<data dir>/hue/models`.
    pub cache_dir: Option<PathBuf>,
    /// Directory with the two ICC profiles. Built-in sRGB when absent.
    pub profile_dir: Option<PathBuf>,
    /// Resampling filter name.
    pub filter: String,
    /// Inference threads, 0 for the backend default.
    pub intra_threads: usize,
}

impl Default for ColorizeConfig {
    fn default() -> Self {
        Self {
            model_url: None,
            cache_dir: None,
            profile_dir: None,
            filter: "lanczos3".to_string(),
            intra_threads: 0,
        }
    }
}

impl ColorizeConfig {
    /// Loads configuration from a YAML file.
    ///
    /// A relative `profile_dir` or `cache_dir` is resolved against the
    /// directory holding the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ColorizeError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for dir in [&mut config.profile_dir, &mut config.cache_dir]
            .into_iter()
            .flatten()
        {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.filter()?;
        Ok(config)
    }

    /// The configured model URL.
    pub fn model_url(&self) -> Result<&str> {
        self.model_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ColorizeError::Config("model_url is not set".into()))
    }

    /// Cache directory, falling back to the platform data directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        default_cache_dir().ok_or_else(|| {
            ColorizeError::Config("no platform data directory, set cache_dir".into())
        })
    }

    /// Parsed resampling filter.
    pub fn filter(&self) -> Result<Filter> {
        self.filter
            .parse()
            .map_err(|e| ColorizeError::Config(format!("filter: {e}")))
    }

    /// Loads the ICC profiles named by this configuration.
    pub fn profiles(&self) -> Result<ProfileBundle> {
        let bundle = match &self.profile_dir {
            Some(dir) => ProfileBundle::from_dir(dir),
            None => ProfileBundle::builtin(),
        };
        bundle.map_err(ColorizeError::ColorProfileUnavailable)
    }
}

/// `<data dir>/hue/models`, if the platform has a data directory.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("hue").join("models"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ColorizeConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ColorizeConfig::default());
        assert_eq!(config.filter().unwrap(), Filter::Lanczos3);
        assert!(matches!(config.model_url(), Err(ColorizeError::Config(_))));
    }

    #[test]
    fn test_parse_full() {
        let yaml = r#"
model_url: https://example.com/m/colorizer.onnx
cache_dir: /var/cache/hue
filter: bicubic
intra_threads: 4
"#;
        let config = ColorizeConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.model_url().unwrap(), "https://example.com/m/colorizer.onnx");
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/var/cache/hue"));
        assert_eq!(config.filter().unwrap(), Filter::Bicubic);
        assert_eq!(config.intra_threads, 4);
    }

    #[test]
    fn test_bad_filter() {
        assert!(matches!(
            ColorizeConfig::from_yaml_str("filter: box"),
            Err(ColorizeError::Config(_))
        ));
    }

    #[test]
    fn test_from_file_resolves_relative() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hue.yaml");
        std::fs::write(&path, "profile_dir: icc\ncache_dir: /abs/cache\n").unwrap();

        let config = ColorizeConfig::from_file(&path).unwrap();
        assert_eq!(config.profile_dir, Some(dir.path().join("icc")));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/abs/cache")));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ColorizeConfig::from_file("/nonexistent/hue.yaml"),
            Err(ColorizeError::ConfigNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let config = ColorizeConfig {
            profile_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(matches!(
            config.profiles(),
            Err(ColorizeError::ColorProfileUnavailable(_))
        ));
    }
}
