//! Colorize command.

use crate::ColorizeArgs;
use anyhow::{bail, Context, Result};
use hue_colorize::{ColorizeConfig, Colorizer};
use std::time::Instant;

/// Loads the model (from cache when possible) and colorizes one image.
pub async fn run(args: ColorizeArgs, config: &ColorizeConfig, verbose: bool) -> Result<()> {
    let is_png = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if !is_png {
        bail!("Output must be a .png file: {}", args.output.display());
    }

    let image = hue_io::read(&args.input)
        .with_context(|| format!("Failed to load: {}", args.input.display()))?;
    if verbose {
        println!(
            "Loaded {} ({}x{}, {})",
            args.input.display(),
            image.width(),
            image.height(),
            image.color_model()
        );
    }

    let colorizer = Colorizer::from_config(config, super::runtime(config)?)?;
    colorizer
        .load_model(Some(&super::print_progress))
        .await
        .context("Failed to load model")?;

    let start = Instant::now();
    let output = colorizer
        .colorize(image)
        .await
        .with_context(|| format!("Failed to colorize: {}", args.input.display()))?;

    hue_io::write_png(&args.output, &output)
        .with_context(|| format!("Failed to save: {}", args.output.display()))?;

    if verbose {
        println!(
            "Colorized {} -> {} in {:.2?}",
            args.input.display(),
            args.output.display(),
            start.elapsed()
        );
    }
    Ok(())
}
