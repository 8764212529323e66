//! CLI command implementations

pub mod cache;
pub mod colorize;
pub mod fetch;

use anyhow::Result;
use hue_colorize::ColorizeConfig;
use hue_model::{DownloadProgress, ModelRuntime};
use std::io::Write;
use std::sync::Arc;

/// Inference backend compiled into this binary.
#[cfg(feature = "onnx")]
pub fn runtime(config: &ColorizeConfig) -> Result<Arc<dyn ModelRuntime>> {
    Ok(Arc::new(hue_model::OnnxRuntime::new(config.intra_threads)))
}

/// Inference backend compiled into this binary.
#[cfg(not(feature = "onnx"))]
pub fn runtime(_config: &ColorizeConfig) -> Result<Arc<dyn ModelRuntime>> {
    anyhow::bail!("no inference backend compiled in (rebuild with --features onnx)")
}

/// Draws a one-line download indicator on stderr.
pub fn print_progress(p: DownloadProgress) {
    let mb = p.bytes_received as f64 / (1024.0 * 1024.0);
    let mut err = std::io::stderr().lock();
    let _ = match p.fraction() {
        Some(f) => write!(err, "\r  downloading {:5.1}% ({mb:.1} MiB)", f * 100.0),
        None => write!(err, "\r  downloading {mb:.1} MiB"),
    };
    if p.is_complete() {
        let _ = writeln!(err);
    }
}

/// Formats byte size as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} bytes", bytes)
    }
}
