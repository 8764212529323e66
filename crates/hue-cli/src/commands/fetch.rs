//! Model download command.

use anyhow::{Context, Result};
use hue_colorize::{ColorizeConfig, Colorizer};
use hue_model::LoadEvent;

/// Loads the model into the cache, reporting progress on stderr.
pub async fn run(config: &ColorizeConfig, verbose: bool) -> Result<()> {
    let colorizer = Colorizer::from_config(config, super::runtime(config)?)?;
    if verbose {
        println!("Source: {}", colorizer.cache().source());
        println!("Cache:  {}", colorizer.cache().cache_dir().display());
    }

    let (mut events, task) = colorizer.load_model_events();
    while let Some(event) = events.recv().await {
        match event {
            LoadEvent::Progress(p) => super::print_progress(p),
            LoadEvent::State(state) if verbose => println!("  {state}"),
            LoadEvent::State(_) => {}
        }
    }

    let artifact = task.await?.context("Failed to load model")?;
    let size = std::fs::metadata(&artifact).map(|m| m.len()).unwrap_or(0);
    println!(
        "Model ready: {} ({})",
        artifact.display(),
        super::format_size(size)
    );
    Ok(())
}
