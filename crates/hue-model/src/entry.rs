//! On-disk cache layout.
//!
//! ```text
//! <cache_dir>/
//!   colorizer-3f2a9c0d1e4b5a67.onnx        compiled artifact
//!   colorizer-3f2a9c0d1e4b5a67.onnx.json   CacheEntry sidecar
//!   downloads/                             in-flight downloads
//! ```
//!
//! Artifacts are keyed by the source URL so that changing the configured
//! model never picks up a stale artifact.

use crate::error::ModelResult;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tempfile::NamedTempFile;

/// Subdirectory holding partial downloads.
pub const DOWNLOADS_DIR: &str = "downloads";

/// Record written next to a compiled artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Source URL the artifact was built from.
    pub source: String,
    /// Artifact file name inside the cache directory.
    pub artifact: String,
    /// Name of the runtime that compiled the artifact.
    pub compiled: String,
    /// Creation time, seconds since the Unix epoch.
    pub created_unix: u64,
}

impl CacheEntry {
    /// Describes a freshly compiled artifact.
    pub fn new(source: &str, artifact: &Path, runtime: &str) -> Self {
        let created_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            source: source.to_string(),
            artifact: artifact
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            compiled: runtime.to_string(),
            created_unix,
        }
    }

    /// Sidecar path for an artifact: the artifact path plus `.json`.
    pub fn sidecar_path(artifact: &Path) -> PathBuf {
        let mut name = OsString::from(artifact.as_os_str());
        name.push(".json");
        PathBuf::from(name)
    }

    /// Reads a sidecar, `None` if it does not exist.
    pub fn read(path: &Path) -> ModelResult<Option<Self>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the sidecar through a temp file in the same directory and
    /// renames it into place, so readers never see a partial file.
    pub fn write_atomic(&self, path: &Path) -> ModelResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Returns `true` if this entry describes `source` compiled by `runtime`.
    pub fn matches(&self, source: &str, runtime: &str) -> bool {
        self.source == source && self.compiled == runtime
    }
}

/// Derives `<cache_dir>/<stem>-<key>.<extension>` for a source URL.
///
/// `stem` is the last path segment without extension, restricted to
/// `[A-Za-z0-9_-]`; `key` is the first 16 hex digits of SHA-256 over the URL.
pub fn artifact_path(cache_dir: &Path, url: &Url, extension: &str) -> PathBuf {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let key = hex::encode(digest);
    let name = format!("{}-{}.{}", stem(url), &key[..16], extension);
    cache_dir.join(name)
}

fn stem(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|mut s| s.rfind(|seg| !seg.is_empty()))
        .unwrap_or("");
    let base = segment.split('.').next().unwrap_or("");
    let clean: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if clean.is_empty() {
        "model".to_string()
    } else {
        clean
    }
}

/// Removes every artifact, sidecar and partial download under `cache_dir`.
///
/// Returns the number of top-level entries removed. A missing directory is
/// treated as already empty.
pub fn clear_dir(cache_dir: &Path) -> ModelResult<usize> {
    let entries = match fs::read_dir(cache_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_shape() {
        let url = Url::parse("https://example.com/models/coremlColorizer.mlmodel").unwrap();
        let path = artifact_path(Path::new("/cache"), &url, "onnx");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("coremlColorizer-"), "{name}");
        assert!(name.ends_with(".onnx"));
        // stem + '-' + 16 hex + ".onnx"
        assert_eq!(name.len(), "coremlColorizer".len() + 1 + 16 + 5);
        assert_eq!(path.parent(), Some(Path::new("/cache")));
    }

    #[test]
    fn test_artifact_path_keyed_by_url() {
        let a = Url::parse("https://a.example/model.onnx").unwrap();
        let b = Url::parse("https://b.example/model.onnx").unwrap();
        let dir = Path::new("/c");
        assert_ne!(artifact_path(dir, &a, "onnx"), artifact_path(dir, &b, "onnx"));
        assert_eq!(artifact_path(dir, &a, "onnx"), artifact_path(dir, &a, "onnx"));
    }

    #[test]
    fn test_stem_fallback() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(stem(&url), "model");
        let url = Url::parse("https://example.com/dl/%20weird%20name.onnx").unwrap();
        assert_eq!(stem(&url), "20weird20name");
    }

    #[test]
    fn test_sidecar_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("m-0123456789abcdef.onnx");
        let sidecar = CacheEntry::sidecar_path(&artifact);
        assert_eq!(sidecar.file_name().unwrap(), "m-0123456789abcdef.onnx.json");

        assert_eq!(CacheEntry::read(&sidecar).unwrap(), None);

        let entry = CacheEntry::new("https://x/m.onnx", &artifact, "onnx");
        entry.write_atomic(&sidecar).unwrap();
        let back = CacheEntry::read(&sidecar).unwrap().unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.artifact, "m-0123456789abcdef.onnx");
        assert!(back.matches("https://x/m.onnx", "onnx"));
        assert!(!back.matches("https://x/m.onnx", "other"));
    }

    #[test]
    fn test_clear_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.onnx"), b"x").unwrap();
        fs::create_dir_all(dir.path().join(DOWNLOADS_DIR)).unwrap();
        fs::write(dir.path().join(DOWNLOADS_DIR).join("part"), b"y").unwrap();

        assert_eq!(clear_dir(dir.path()).unwrap(), 2);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(clear_dir(&dir.path().join("missing")).unwrap(), 0);
    }
}
