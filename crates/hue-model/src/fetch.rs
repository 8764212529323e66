//! Model download with progress reporting.
//!
//! [`HttpFetcher`] streams `http(s)://` sources with `reqwest` and reads
//! `file://` sources from disk, reporting a [`DownloadProgress`] after every
//! chunk written.

use crate::error::BoxError;
use async_trait::async_trait;
use reqwest::Url;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, trace};

/// Chunk size for local file copies.
const FILE_CHUNK: usize = 64 * 1024;

/// Progress of one model download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadProgress {
    /// Bytes written so far. Never decreases within one download.
    pub bytes_received: u64,
    /// Total size when the source reports one.
    pub bytes_expected: Option<u64>,
    complete: bool,
}

impl DownloadProgress {
    /// Progress of a download still in flight.
    pub fn partial(bytes_received: u64, bytes_expected: Option<u64>) -> Self {
        Self {
            bytes_received,
            bytes_expected,
            complete: false,
        }
    }

    /// Terminal progress value of a finished download.
    pub fn finished(bytes_received: u64, bytes_expected: Option<u64>) -> Self {
        Self {
            bytes_received,
            bytes_expected,
            complete: true,
        }
    }

    /// Returns `true` for the last value reported by a successful download.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Completed fraction in `[0, 1]`, if the total size is known.
    pub fn fraction(&self) -> Option<f64> {
        match self.bytes_expected {
            Some(0) => Some(1.0),
            Some(total) => Some((self.bytes_received as f64 / total as f64).min(1.0)),
            None => None,
        }
    }
}

/// Progress callback.
pub type ProgressFn<'a> = dyn Fn(DownloadProgress) + Send + Sync + 'a;

/// Retrieves a model source into a local file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Writes the content of `url` to `dest`, returning the number of bytes.
    async fn fetch(&self, url: &Url, dest: &Path, progress: &ProgressFn<'_>) -> Result<u64, BoxError>;
}

/// Default fetcher for `http`, `https` and `file` URLs.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    async fn fetch_http(
        &self,
        url: &Url,
        dest: &Path,
        progress: &ProgressFn<'_>,
    ) -> Result<u64, BoxError> {
        let mut resp = self.client.get(url.clone()).send().await?.error_for_status()?;
        let expected = resp.content_length();
        debug!(url = %url, expected, "downloading model");

        let mut file = tokio::fs::File::create(dest).await?;
        let mut received = 0u64;
        progress(DownloadProgress::partial(0, expected));
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            received += chunk.len() as u64;
            trace!(received, "chunk");
            progress(DownloadProgress::partial(received, expected));
        }
        file.flush().await?;
        file.sync_all().await?;

        progress(DownloadProgress::finished(received, expected));
        Ok(received)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, dest: &Path, progress: &ProgressFn<'_>) -> Result<u64, BoxError> {
        match url.scheme() {
            "file" => fetch_file(url, dest, progress).await,
            _ => self.fetch_http(url, dest, progress).await,
        }
    }
}

async fn fetch_file(url: &Url, dest: &Path, progress: &ProgressFn<'_>) -> Result<u64, BoxError> {
    let path = url
        .to_file_path()
        .map_err(|_| format!("not a local path: {url}"))?;
    debug!(path = %path.display(), "copying model");

    let mut src = tokio::fs::File::open(&path).await?;
    let expected = src.metadata().await?.len();
    let mut out = tokio::fs::File::create(dest).await?;

    let mut buf = vec![0u8; FILE_CHUNK];
    let mut received = 0u64;
    progress(DownloadProgress::partial(0, Some(expected)));
    loop {
        let n = src.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n]).await?;
        received += n as u64;
        progress(DownloadProgress::partial(received, Some(expected)));
    }
    out.flush().await?;
    out.sync_all().await?;

    progress(DownloadProgress::finished(received, Some(expected)));
    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_fraction() {
        assert_eq!(DownloadProgress::partial(5, None).fraction(), None);
        assert_eq!(DownloadProgress::partial(0, Some(0)).fraction(), Some(1.0));
        assert_eq!(DownloadProgress::partial(25, Some(100)).fraction(), Some(0.25));
        assert!(!DownloadProgress::partial(100, Some(100)).is_complete());
        assert!(DownloadProgress::finished(100, Some(100)).is_complete());
    }

    #[tokio::test]
    async fn test_file_progress_is_monotonic() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("model.onnx");
        let payload: Vec<u8> = (0..200 * 1024).map(|i| (i % 251) as u8).collect();
        std::fs::write(&src, &payload).unwrap();
        let dest = dir.path().join("copy.bin");

        let seen = Mutex::new(Vec::new());
        let record = |p: DownloadProgress| seen.lock().unwrap().push(p);
        let url = Url::from_file_path(&src).unwrap();
        let n = HttpFetcher::new().fetch(&url, &dest, &record).await.unwrap();

        assert_eq!(n, payload.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), payload);

        let seen = seen.into_inner().unwrap();
        assert!(seen.len() >= 4, "expected several chunks, got {}", seen.len());
        assert!(
            seen.windows(2)
                .all(|w| w[0].bytes_received <= w[1].bytes_received)
        );
        let last = seen.last().unwrap();
        assert!(last.is_complete());
        assert_eq!(last.bytes_received, payload.len() as u64);
        assert_eq!(last.bytes_expected, Some(payload.len() as u64));
        assert_eq!(seen.iter().filter(|p| p.is_complete()).count(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("absent.onnx")).unwrap();
        let res = HttpFetcher::new()
            .fetch(&url, &dir.path().join("out"), &|_: DownloadProgress| {})
            .await;
        assert!(res.is_err());
    }
}
