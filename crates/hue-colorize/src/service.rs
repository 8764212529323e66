//! Async front end tying the model cache to the pipeline.

use crate::adapter::ColorAdapter;
use crate::config::ColorizeConfig;
use crate::error::{ColorizeError, Result};
use crate::reconstruct::colorize_with_filter;
use hue_core::PixelBuffer;
use hue_model::{LoadEvent, ModelCache, ModelRuntime, ProgressFn};
use hue_ops::Filter;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::info;

/// Colorizes images once its model is loaded.
///
/// Cheap to share behind an `Arc`: concurrent [`Colorizer::colorize`] calls
/// only share the read-only model handle and color adapter.
#[derive(Debug)]
pub struct Colorizer {
    cache: Arc<ModelCache>,
    adapter: Arc<ColorAdapter>,
    filter: Filter,
}

impl Colorizer {
    /// Creates a colorizer from an injected cache and adapter.
    pub fn new(cache: ModelCache, adapter: ColorAdapter) -> Self {
        Self {
            cache: Arc::new(cache),
            adapter: Arc::new(adapter),
            filter: Filter::default(),
        }
    }

    /// Builds the cache and adapter described by `config`.
    pub fn from_config(config: &ColorizeConfig, runtime: Arc<dyn ModelRuntime>) -> Result<Self> {
        let cache = ModelCache::new(config.model_url()?, config.cache_dir()?, runtime);
        let adapter = ColorAdapter::new(&config.profiles()?)?;
        Ok(Self::new(cache, adapter).with_filter(config.filter()?))
    }

    /// Sets the resampling filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// The model cache.
    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Returns `true` once a model handle is published.
    pub fn is_ready(&self) -> bool {
        self.cache.handle().is_some()
    }

    /// Loads the model, returning the compiled artifact path.
    ///
    /// `progress` receives download progress on a cache miss.
    pub async fn load_model(&self, progress: Option<&ProgressFn<'_>>) -> Result<PathBuf> {
        let handle = self.cache.load(progress).await?;
        Ok(handle.artifact().to_path_buf())
    }

    /// Loads the model on a spawned task, streaming state and progress events.
    pub fn load_model_events(&self) -> (UnboundedReceiver<LoadEvent>, JoinHandle<Result<PathBuf>>) {
        let (events, task) = Arc::clone(&self.cache).load_events();
        let outcome = tokio::spawn(async move {
            let handle = task.await??;
            Ok::<_, ColorizeError>(handle.artifact().to_path_buf())
        });
        (events, outcome)
    }

    /// Colorizes `image` on a blocking worker.
    ///
    /// # Errors
    ///
    /// [`ColorizeError::ModelNotLoaded`] immediately if no model is loaded;
    /// otherwise whatever [`crate::colorize`] reports.
    pub async fn colorize(&self, image: PixelBuffer) -> Result<PixelBuffer> {
        let model = self
            .cache
            .handle()
            .cloned()
            .ok_or(ColorizeError::ModelNotLoaded)?;
        let adapter = Arc::clone(&self.adapter);
        let filter = self.filter;

        let (width, height) = (image.width(), image.height());
        let out = tokio::task::spawn_blocking(move || {
            colorize_with_filter(&image, &model, &adapter, filter)
        })
        .await??;
        info!(width, height, "colorized");
        Ok(out)
    }
}
