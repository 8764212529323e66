//! Backends that turn a downloaded model into a loadable artifact.

use crate::engine::InferenceEngine;
use crate::error::BoxError;
use std::path::Path;
use std::sync::Arc;

/// Compiles and loads models for one inference backend.
///
/// `compile` runs once per cache miss; `load` runs on every process start
/// that finds the compiled artifact in the cache. Both are blocking and are
/// called from a blocking worker thread.
pub trait ModelRuntime: Send + Sync {
    /// Short backend name, recorded in the cache entry.
    fn name(&self) -> &str;

    /// File extension of compiled artifacts (without the dot).
    fn artifact_extension(&self) -> &str;

    /// Compiles the downloaded model at `source` into `dest`.
    fn compile(&self, source: &Path, dest: &Path) -> Result<(), BoxError>;

    /// Loads a compiled artifact.
    fn load(&self, artifact: &Path) -> Result<Arc<dyn InferenceEngine>, BoxError>;
}
