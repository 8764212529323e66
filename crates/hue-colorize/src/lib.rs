//! # hue-colorize
//!
//! Colorizes monochrome images with a learned chroma model, working in
//! CIE L\*a\*b\* so the source luminance is kept as-is.
//!
//! ## Pipeline
//!
//! 1. [`normalize`](hue_ops::normalize) the source to 256x256
//! 2. [`extract_lab`] and keep L
//! 3. [`to_input_tensor`], run the model, [`from_output_tensor`]
//! 4. [`synthesize_image`] from L and the predicted a, b
//! 5. upscale back to the source resolution
//! 6. extract a, b from the upscaled image and L from the source
//! 7. synthesize the final image
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn run(runtime: std::sync::Arc<dyn hue_model::ModelRuntime>) -> hue_colorize::Result<()> {
//! use hue_colorize::{ColorizeConfig, Colorizer};
//!
//! let config = ColorizeConfig::from_file("hue.yaml")?;
//! let colorizer = Colorizer::from_config(&config, runtime)?;
//! colorizer.load_model(None).await?;
//!
//! let image = hue_core::PixelBuffer::gray8(2, 2, vec![0, 64, 128, 255])?;
//! let color = colorizer.colorize(image).await?;
//! assert_eq!(color.width(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapter;
pub mod config;
mod error;
pub mod extract;
pub mod marshal;
pub mod reconstruct;
mod service;

pub use adapter::ColorAdapter;
pub use config::ColorizeConfig;
pub use error::{ColorizeError, Result};
pub use extract::{extract_lab, synthesize_image};
pub use marshal::{from_output_tensor, to_input_tensor};
pub use reconstruct::{colorize, colorize_with_filter};
pub use service::Colorizer;
