//! Model cache state machine.
//!
//! ```text
//! Unchecked -> CacheHit ----------------------------> Ready
//! Unchecked -> CacheMiss -> Downloading -> Compiling -> Ready
//!     |           |             |             |
//!     +-----------+--> Failed <-+-------------+
//! ```
//!
//! `Unchecked -> Failed` covers a source that is not a usable URL and an
//! unwritable cache directory; `CacheHit -> Failed` an artifact the runtime
//! cannot load.
//!
//! A [`ModelCache`] publishes its [`ModelHandle`] exactly once. Later loads on
//! the same instance return the published handle without touching the disk.
//! Two loads racing on a cold cache both do the work; the first to finish
//! publishes and the other returns that same handle. Once published, the
//! reported state stays [`LoadState::Ready`] even if a racing load fails.

use crate::engine::{InferenceEngine, ModelHandle};
use crate::entry::{self, CacheEntry, DOWNLOADS_DIR};
use crate::error::{ModelError, ModelResult};
use crate::fetch::{DownloadProgress, Fetcher, HttpFetcher, ProgressFn};
use crate::runtime::ModelRuntime;
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Load progress of a [`ModelCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LoadState {
    /// Nothing checked yet.
    Unchecked = 0,
    /// A compiled artifact was found on disk.
    CacheHit = 1,
    /// No usable artifact; a download follows.
    CacheMiss = 2,
    /// Fetching the source model.
    Downloading = 3,
    /// Compiling the downloaded model.
    Compiling = 4,
    /// The handle is published.
    Ready = 5,
    /// The last load attempt failed.
    Failed = 6,
}

impl LoadState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::CacheHit,
            2 => Self::CacheMiss,
            3 => Self::Downloading,
            4 => Self::Compiling,
            5 => Self::Ready,
            6 => Self::Failed,
            _ => Self::Unchecked,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchecked => "unchecked",
            Self::CacheHit => "cache hit",
            Self::CacheMiss => "cache miss",
            Self::Downloading => "downloading",
            Self::Compiling => "compiling",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Event emitted while loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// The cache moved to a new state.
    State(LoadState),
    /// Bytes arrived for the current download.
    Progress(DownloadProgress),
}

type Observer<'a> = dyn Fn(LoadEvent) + Send + Sync + 'a;

/// Locates, downloads, compiles and loads the colorization model.
pub struct ModelCache {
    source: String,
    cache_dir: PathBuf,
    runtime: Arc<dyn ModelRuntime>,
    fetcher: Arc<dyn Fetcher>,
    handle: OnceLock<ModelHandle>,
    state: AtomicU8,
}

impl ModelCache {
    /// Creates a cache for `source` stored under `cache_dir`.
    pub fn new(
        source: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
        runtime: Arc<dyn ModelRuntime>,
    ) -> Self {
        Self {
            source: source.into(),
            cache_dir: cache_dir.into(),
            runtime,
            fetcher: Arc::new(HttpFetcher::new()),
            handle: OnceLock::new(),
            state: AtomicU8::new(LoadState::Unchecked as u8),
        }
    }

    /// Replaces the fetcher used on cache misses.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Configured source URL.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Last state reached.
    pub fn state(&self) -> LoadState {
        LoadState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Published handle, if a load has succeeded.
    pub fn handle(&self) -> Option<&ModelHandle> {
        self.handle.get()
    }

    /// Path the compiled artifact for the configured source lives at.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidSourceUrl`] if the source is not a usable URL.
    pub fn artifact_path(&self) -> ModelResult<PathBuf> {
        let url = parse_source(&self.source)?;
        Ok(entry::artifact_path(
            &self.cache_dir,
            &url,
            self.runtime.artifact_extension(),
        ))
    }

    /// Loads the model, from cache when possible.
    ///
    /// `progress` receives download progress on a cache miss.
    pub async fn load(&self, progress: Option<&ProgressFn<'_>>) -> ModelResult<ModelHandle> {
        let observer = |event: LoadEvent| {
            if let (LoadEvent::Progress(p), Some(cb)) = (event, progress) {
                cb(p);
            }
        };
        self.load_with(&observer).await
    }

    /// Loads on a spawned task, streaming every state change and progress
    /// value. The task's result is the terminal outcome.
    pub fn load_events(
        self: Arc<Self>,
    ) -> (UnboundedReceiver<LoadEvent>, JoinHandle<ModelResult<ModelHandle>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let observer = move |event: LoadEvent| {
                // Receiver may be gone; loading continues regardless
                let _ = tx.send(event);
            };
            self.load_with(&observer).await
        });
        (rx, task)
    }

    async fn load_with(&self, observer: &Observer<'_>) -> ModelResult<ModelHandle> {
        if let Some(handle) = self.handle.get() {
            trace!("model already loaded");
            return Ok(handle.clone());
        }

        self.set_state(LoadState::Unchecked, observer);
        match self.acquire(observer).await {
            Ok(handle) => {
                let published = self.handle.get_or_init(|| handle).clone();
                self.set_state(LoadState::Ready, observer);
                info!(artifact = %published.artifact().display(), "model ready");
                Ok(published)
            }
            Err(e) => {
                warn!(source = %self.source, error = %e, "model load failed");
                self.set_state(LoadState::Failed, observer);
                Err(e)
            }
        }
    }

    async fn acquire(&self, observer: &Observer<'_>) -> ModelResult<ModelHandle> {
        let url = parse_source(&self.source)?;
        tokio::fs::create_dir_all(&self.cache_dir).await?;

        let artifact =
            entry::artifact_path(&self.cache_dir, &url, self.runtime.artifact_extension());
        let sidecar = CacheEntry::sidecar_path(&artifact);

        if self.is_cached(&url, &artifact, &sidecar).await? {
            self.set_state(LoadState::CacheHit, observer);
            info!(artifact = %artifact.display(), "model cache hit");
            let engine = self.load_artifact(artifact.clone()).await?;
            return Ok(ModelHandle::new(engine, artifact));
        }

        self.set_state(LoadState::CacheMiss, observer);
        info!(url = %url, "model cache miss");

        self.set_state(LoadState::Downloading, observer);
        let downloads = self.cache_dir.join(DOWNLOADS_DIR);
        tokio::fs::create_dir_all(&downloads).await?;
        let download = tempfile::Builder::new()
            .prefix("fetch-")
            .tempfile_in(&downloads)?;

        let on_progress = |p: DownloadProgress| observer(LoadEvent::Progress(p));
        let bytes = self
            .fetcher
            .fetch(&url, download.path(), &on_progress)
            .await
            .map_err(|cause| ModelError::download(url.as_str(), cause))?;
        debug!(bytes, "download complete");

        self.set_state(LoadState::Compiling, observer);
        let runtime = Arc::clone(&self.runtime);
        let source = download.path().to_path_buf();
        let cache_dir = self.cache_dir.clone();
        let dest = artifact.clone();
        let engine = tokio::task::spawn_blocking(move || {
            compile_into_place(runtime.as_ref(), &source, &cache_dir, &dest)
        })
        .await
        .map_err(ModelError::compile)??;
        drop(download);

        CacheEntry::new(url.as_str(), &artifact, self.runtime.name()).write_atomic(&sidecar)?;
        Ok(ModelHandle::new(engine, artifact))
    }

    /// Checks for a usable artifact. A stale one is removed.
    async fn is_cached(&self, url: &Url, artifact: &Path, sidecar: &Path) -> ModelResult<bool> {
        if !tokio::fs::try_exists(artifact).await? {
            return Ok(false);
        }
        let stale = match CacheEntry::read(sidecar) {
            Ok(Some(entry)) => !entry.matches(url.as_str(), self.runtime.name()),
            Ok(None) => false,
            Err(e) => {
                warn!(sidecar = %sidecar.display(), error = %e, "unreadable cache entry");
                true
            }
        };
        if stale {
            warn!(artifact = %artifact.display(), "discarding mismatched cached model");
            remove_path(artifact).await?;
            return Ok(false);
        }
        Ok(true)
    }

    async fn load_artifact(&self, artifact: PathBuf) -> ModelResult<Arc<dyn InferenceEngine>> {
        let runtime = Arc::clone(&self.runtime);
        tokio::task::spawn_blocking(move || runtime.load(&artifact))
            .await
            .map_err(ModelError::compile)?
            .map_err(ModelError::compile)
    }

    /// Records `state` and reports it to this load's observer. A published
    /// handle pins the shared state at `Ready`.
    fn set_state(&self, state: LoadState, observer: &Observer<'_>) {
        if state == LoadState::Ready || self.handle.get().is_none() {
            self.state.store(state as u8, Ordering::Release);
        }
        debug!(%state, "model cache state");
        observer(LoadEvent::State(state));
    }
}

impl fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCache")
            .field("source", &self.source)
            .field("cache_dir", &self.cache_dir)
            .field("runtime", &self.runtime.name())
            .field("state", &self.state())
            .finish()
    }
}

/// Validates the configured source.
pub fn parse_source(source: &str) -> ModelResult<Url> {
    let url = Url::parse(source).map_err(|e| ModelError::InvalidSourceUrl {
        url: source.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" | "file" => Ok(url),
        other => Err(ModelError::InvalidSourceUrl {
            url: source.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Compiles into a staging directory inside the cache, then renames the
/// result over `dest` and loads it.
fn compile_into_place(
    runtime: &dyn ModelRuntime,
    source: &Path,
    cache_dir: &Path,
    dest: &Path,
) -> ModelResult<Arc<dyn InferenceEngine>> {
    let staging = tempfile::Builder::new()
        .prefix(".compile-")
        .tempdir_in(cache_dir)?;
    let staged = staging.path().join("artifact");

    debug!(runtime = runtime.name(), source = %source.display(), "compiling model");
    runtime.compile(source, &staged).map_err(ModelError::compile)?;
    std::fs::rename(&staged, dest)?;

    runtime.load(dest).map_err(ModelError::compile)
}

async fn remove_path(path: &Path) -> std::io::Result<()> {
    if tokio::fs::metadata(path).await?.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use async_trait::async_trait;
    use hue_core::{Tensor, OUTPUT_SHAPE};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    struct Zeros;

    impl InferenceEngine for Zeros {
        fn predict(&self, _input: &Tensor) -> Result<Tensor, BoxError> {
            Ok(Tensor::zeros(OUTPUT_SHAPE))
        }
    }

    /// Copies the download and counts compiles / loads.
    #[derive(Default)]
    struct CopyRuntime {
        compiles: AtomicUsize,
        loads: AtomicUsize,
    }

    impl ModelRuntime for CopyRuntime {
        fn name(&self) -> &str {
            "copy"
        }

        fn artifact_extension(&self) -> &str {
            "bin"
        }

        fn compile(&self, source: &Path, dest: &Path) -> Result<(), BoxError> {
            self.compiles.fetch_add(1, Ordering::SeqCst);
            std::fs::copy(source, dest)?;
            Ok(())
        }

        fn load(&self, artifact: &Path) -> Result<Arc<dyn InferenceEngine>, BoxError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if std::fs::read(artifact)?.is_empty() {
                return Err("empty artifact".into());
            }
            Ok(Arc::new(Zeros))
        }
    }

    /// Serves a fixed payload in two chunks.
    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(
            &self,
            _url: &Url,
            dest: &Path,
            progress: &ProgressFn<'_>,
        ) -> Result<u64, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::fs::write(dest, b"weights!")?;
            progress(DownloadProgress::partial(4, Some(8)));
            progress(DownloadProgress::partial(8, Some(8)));
            progress(DownloadProgress::finished(8, Some(8)));
            Ok(8)
        }
    }

    const SOURCE: &str = "https://models.example/colorizer.onnx";

    fn cache(
        dir: &Path,
        runtime: &Arc<CopyRuntime>,
        fetcher: &Arc<CountingFetcher>,
    ) -> ModelCache {
        ModelCache::new(SOURCE, dir, runtime.clone()).with_fetcher(fetcher.clone())
    }

    #[tokio::test]
    async fn test_cold_then_warm() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        let fetcher = Arc::new(CountingFetcher::default());

        let cold = cache(dir.path(), &runtime, &fetcher);
        assert_eq!(cold.state(), LoadState::Unchecked);
        let handle = cold.load(None).await.unwrap();
        assert_eq!(cold.state(), LoadState::Ready);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.compiles.load(Ordering::SeqCst), 1);
        assert!(handle.artifact().exists());
        assert!(CacheEntry::sidecar_path(handle.artifact()).exists());

        // New instance, same directory: served from disk
        let warm = cache(dir.path(), &runtime, &fetcher);
        let again = warm.load(None).await.unwrap();
        assert_eq!(warm.state(), LoadState::Ready);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.compiles.load(Ordering::SeqCst), 1);
        assert_eq!(again.artifact(), handle.artifact());
    }

    #[tokio::test]
    async fn test_same_instance_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = cache(dir.path(), &runtime, &fetcher);

        let first = cache.load(None).await.unwrap();
        let second = cache.load(None).await.unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(runtime.loads.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert!(cache.handle().unwrap().ptr_eq(&first));
    }

    #[tokio::test]
    async fn test_progress_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = cache(dir.path(), &runtime, &fetcher);

        let seen = Mutex::new(Vec::new());
        let record = |p: DownloadProgress| seen.lock().unwrap().push(p);
        cache.load(Some(&record)).await.unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.last().unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_event_stream_order() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = Arc::new(cache(dir.path(), &runtime, &fetcher));

        let (mut rx, task) = cache.clone().load_events();
        task.await.unwrap().unwrap();

        let mut states = Vec::new();
        let mut progress = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                LoadEvent::State(s) => states.push(s),
                LoadEvent::Progress(_) => progress += 1,
            }
        }
        assert_eq!(
            states,
            vec![
                LoadState::Unchecked,
                LoadState::CacheMiss,
                LoadState::Downloading,
                LoadState::Compiling,
                LoadState::Ready,
            ]
        );
        assert_eq!(progress, 3);
    }

    #[tokio::test]
    async fn test_mismatched_entry_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = cache(dir.path(), &runtime, &fetcher);

        let artifact = cache.artifact_path().unwrap();
        std::fs::write(&artifact, b"old").unwrap();
        CacheEntry::new(SOURCE, &artifact, "other-runtime")
            .write_atomic(&CacheEntry::sidecar_path(&artifact))
            .unwrap();

        cache.load(None).await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read(&artifact).unwrap(), b"weights!");
        let entry = CacheEntry::read(&CacheEntry::sidecar_path(&artifact))
            .unwrap()
            .unwrap();
        assert_eq!(entry.compiled, "copy");
    }

    #[tokio::test]
    async fn test_unreachable_source() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        let cache = ModelCache::new("http://127.0.0.1:9/colorizer.onnx", dir.path(), runtime);

        let (mut rx, task) = Arc::new(cache).load_events();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, ModelError::DownloadError { .. }), "{err}");

        let mut states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let LoadEvent::State(s) = event {
                states.push(s);
            }
        }
        assert!(!states.contains(&LoadState::Ready));
        assert_eq!(states.last(), Some(&LoadState::Failed));
    }

    #[tokio::test]
    async fn test_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let runtime = Arc::new(CopyRuntime::default());
        for bad in ["not a url", "ftp://host/model.onnx"] {
            let cache = ModelCache::new(bad, dir.path(), runtime.clone());
            let err = cache.load(None).await.unwrap_err();
            assert!(matches!(err, ModelError::InvalidSourceUrl { .. }), "{bad}: {err}");
            assert_eq!(cache.state(), LoadState::Failed);
        }
    }

    #[tokio::test]
    async fn test_invalid_source_fails_from_unchecked() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(CountingFetcher::default());
        let cache = ModelCache::new("not a url", dir.path(), Arc::new(CopyRuntime::default()))
            .with_fetcher(fetcher.clone());

        let (mut rx, task) = Arc::new(cache).load_events();
        assert!(task.await.unwrap().is_err());

        let mut states = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let LoadEvent::State(s) = event {
                states.push(s);
            }
        }
        assert_eq!(states, vec![LoadState::Unchecked, LoadState::Failed]);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    /// First call parks until released, then fails; later calls succeed.
    #[derive(Default)]
    struct GatedFetcher {
        calls: AtomicUsize,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Fetcher for GatedFetcher {
        async fn fetch(
            &self,
            _url: &Url,
            dest: &Path,
            _progress: &ProgressFn<'_>,
        ) -> Result<u64, BoxError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.notify_one();
                self.release.notified().await;
                return Err("connection reset".into());
            }
            std::fs::write(dest, b"weights!")?;
            Ok(8)
        }
    }

    #[tokio::test]
    async fn test_racing_failure_keeps_ready() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Arc::new(GatedFetcher::default());
        let cache = Arc::new(
            ModelCache::new(SOURCE, dir.path(), Arc::new(CopyRuntime::default()))
                .with_fetcher(fetcher.clone()),
        );

        let slow = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move { cache.load(None).await }
        });
        fetcher.entered.notified().await;

        let handle = cache.load(None).await.unwrap();
        assert_eq!(cache.state(), LoadState::Ready);

        fetcher.release.notify_one();
        let err = slow.await.unwrap().unwrap_err();
        assert!(matches!(err, ModelError::DownloadError { .. }), "{err}");

        assert_eq!(cache.state(), LoadState::Ready);
        assert!(cache.handle().unwrap().ptr_eq(&handle));
    }

    #[tokio::test]
    async fn test_compile_failure() {
        struct Broken;

        impl ModelRuntime for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn artifact_extension(&self) -> &str {
                "bin"
            }
            fn compile(&self, _source: &Path, _dest: &Path) -> Result<(), BoxError> {
                Err("unsupported operator".into())
            }
            fn load(&self, _artifact: &Path) -> Result<Arc<dyn InferenceEngine>, BoxError> {
                Err("unreachable".into())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let cache = ModelCache::new(SOURCE, dir.path(), Arc::new(Broken))
            .with_fetcher(Arc::new(CountingFetcher::default()));
        let err = cache.load(None).await.unwrap_err();
        assert!(matches!(err, ModelError::CompileError { .. }));
        assert_eq!(cache.state(), LoadState::Failed);
        assert!(cache.handle().is_none());
        assert!(!cache.artifact_path().unwrap().exists());
    }
}
