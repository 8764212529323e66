//! Cache inspection commands.

use anyhow::{Context, Result};
use hue_colorize::ColorizeConfig;
use hue_model::{entry, ModelCache};

/// Prints the cache directory and, when a model URL is configured and a
/// backend is available, the artifact path for it.
pub fn run_path(config: &ColorizeConfig) -> Result<()> {
    let dir = config.cache_dir()?;
    println!("{}", dir.display());

    let Ok(url) = config.model_url() else {
        return Ok(());
    };
    let Ok(runtime) = super::runtime(config) else {
        return Ok(());
    };
    let artifact = ModelCache::new(url, &dir, runtime).artifact_path()?;
    let status = if artifact.exists() { "cached" } else { "missing" };
    println!("{} ({status})", artifact.display());
    Ok(())
}

/// Removes everything under the cache directory.
pub fn run_clear(config: &ColorizeConfig, verbose: bool) -> Result<()> {
    let dir = config.cache_dir()?;
    let removed = entry::clear_dir(&dir)
        .with_context(|| format!("Failed to clear cache: {}", dir.display()))?;
    if verbose {
        println!("Removed {removed} entries from {}", dir.display());
    }
    Ok(())
}
