//! Colorization error types.

use hue_core::ColorModel;
use hue_icc::IccError;
use hue_model::ModelError;
use hue_ops::OpsError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for colorization.
pub type Result<T> = std::result::Result<T, ColorizeError>;

/// Errors produced by the colorization pipeline.
#[derive(Debug, Error)]
pub enum ColorizeError {
    /// An ICC profile could not be found or parsed.
    #[error("color profile unavailable: {0}")]
    ColorProfileUnavailable(#[source] IccError),

    /// The image uses a color model the pipeline does not read.
    #[error("unsupported color space: {0}")]
    UnsupportedColorSpace(ColorModel),

    /// The image has no readable pixels.
    #[error("image has no pixel data")]
    NoPixelData,

    /// Planar channels do not cover the target image.
    #[error("channel lengths L={l} a={a} b={b} do not match {width}x{height}")]
    ChannelLengthMismatch {
        /// Length of L.
        l: usize,
        /// Length of a.
        a: usize,
        /// Length of b.
        b: usize,
        /// Target width.
        width: u32,
        /// Target height.
        height: u32,
    },

    /// A pixel buffer could not be built.
    #[error("pixel buffer: {0}")]
    Buffer(#[source] hue_core::Error),

    /// Resampling failed.
    #[error("resample failed: {0}")]
    ResampleFailure(#[source] OpsError),

    /// A tensor did not have the shape the model contract requires.
    #[error("tensor shape: {0}")]
    TensorShape(String),

    /// The engine failed while predicting.
    #[error("inference failed: {0}")]
    Inference(#[source] ModelError),

    /// Normalize, extract or inference failed.
    #[error("preprocessing failed: {source}")]
    PreprocessFailure {
        /// Step error.
        #[source]
        source: Box<ColorizeError>,
    },

    /// Synthesis, upscaling or recombination failed.
    #[error("postprocessing failed: {source}")]
    PostprocessFailure {
        /// Step error.
        #[source]
        source: Box<ColorizeError>,
    },

    /// Colorize was called before the model finished loading.
    #[error("model not loaded")]
    ModelNotLoaded,

    /// Model acquisition failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Config file not found.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking worker panicked or was cancelled.
    #[error("worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ColorizeError {
    pub(crate) fn preprocess(source: ColorizeError) -> Self {
        Self::PreprocessFailure {
            source: Box::new(source),
        }
    }

    pub(crate) fn postprocess(source: ColorizeError) -> Self {
        Self::PostprocessFailure {
            source: Box::new(source),
        }
    }
}

impl From<OpsError> for ColorizeError {
    fn from(e: OpsError) -> Self {
        Self::ResampleFailure(e)
    }
}

impl From<hue_core::Error> for ColorizeError {
    fn from(e: hue_core::Error) -> Self {
        match e {
            hue_core::Error::ChannelLength {
                l,
                a,
                b,
                width,
                height,
            } => Self::ChannelLengthMismatch {
                l,
                a,
                b,
                width,
                height,
            },
            hue_core::Error::TensorShape { .. } => Self::TensorShape(e.to_string()),
            other => Self::Buffer(other),
        }
    }
}
