//! # hue-model
//!
//! Acquires the colorization model and runs it.
//!
//! - [`ModelCache`] - Download / compile / cache state machine, publishes one [`ModelHandle`]
//! - [`ModelHandle`] - Shared, immutable handle to a loaded [`InferenceEngine`]
//! - [`ModelRuntime`] - Backend that compiles and loads artifacts
//! - [`Fetcher`] - Source retrieval with [`DownloadProgress`] reporting
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn run(runtime: std::sync::Arc<dyn hue_model::ModelRuntime>) -> hue_model::ModelResult<()> {
//! use hue_model::ModelCache;
//!
//! let cache = ModelCache::new("https://example.com/colorizer.onnx", "/tmp/hue", runtime);
//! let handle = cache.load(Some(&|p: hue_model::DownloadProgress| println!("{} bytes", p.bytes_received))).await?;
//! println!("loaded {}", handle.artifact().display());
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `onnx` - [`OnnxRuntime`] backend on ONNX Runtime (off by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod engine;
pub mod entry;
mod error;
pub mod fetch;
mod runtime;
pub mod signature;

#[cfg(feature = "onnx")]
mod onnx;

pub use cache::{parse_source, LoadEvent, LoadState, ModelCache};
pub use engine::{InferenceEngine, ModelHandle};
pub use entry::CacheEntry;
pub use error::{BoxError, ModelError, ModelResult};
pub use fetch::{DownloadProgress, Fetcher, HttpFetcher, ProgressFn};
pub use runtime::ModelRuntime;

#[cfg(feature = "onnx")]
pub use onnx::OnnxRuntime;
