//! hue - colorize monochrome photographs
//!
//! Downloads and caches the colorization model, then runs it on images.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hue_colorize::ColorizeConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "hue")]
#[command(author, version, about = "Colorize monochrome images with a learned model")]
#[command(long_about = "
Colorizes grayscale photographs. The model is downloaded once into a local
cache and reused afterwards.

Examples:
  hue --model-url https://host/colorizer.onnx fetch
  hue colorize old.jpg -o color.png
  hue --config hue.yaml colorize scan.png -o out.png
  hue cache path
  hue cache clear
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Model source URL (http, https or file)
    #[arg(long, global = true)]
    model_url: Option<String>,

    /// Model cache directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Directory holding the two ICC profiles
    #[arg(long = "profiles", global = true)]
    profile_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and compile the model into the cache
    Fetch,

    /// Colorize an image
    #[command(visible_alias = "c")]
    Colorize(ColorizeArgs),

    /// Inspect or clear the model cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Arguments for the `colorize` command.
#[derive(Args)]
struct ColorizeArgs {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Resampling filter: nearest, bilinear, bicubic, lanczos3
    #[arg(short, long)]
    filter: Option<String>,
}

#[derive(Subcommand)]
enum CacheAction {
    /// Print the cache directory and artifact path
    Path,
    /// Remove every cached artifact
    Clear,
}

impl Cli {
    /// Config file values overridden by command-line flags.
    fn load_config(&self) -> Result<ColorizeConfig> {
        let mut config = match &self.config {
            Some(path) => ColorizeConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => ColorizeConfig::default(),
        };
        if let Some(url) = &self.model_url {
            config.model_url = Some(url.clone());
        }
        if let Some(dir) = &self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.profile_dir {
            config.profile_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = cli.load_config()?;
    tracing::debug!(?config, "configuration");

    match cli.command {
        Commands::Fetch => commands::fetch::run(&config, cli.verbose).await,
        Commands::Colorize(args) => {
            if let Some(filter) = &args.filter {
                config.filter = filter.clone();
            }
            commands::colorize::run(args, &config, cli.verbose).await
        }
        Commands::Cache { action } => match action {
            CacheAction::Path => commands::cache::run_path(&config),
            CacheAction::Clear => commands::cache::run_clear(&config, cli.verbose),
        },
    }
}
