//! # hue-core
//!
//! Core types shared by every hue-rs crate.
//!
//! - [`PixelBuffer`] - Raw device pixels with an explicit row stride and [`ColorModel`]
//! - [`LabChannels`] - Planar CIE L\*a\*b\* channels, one float per pixel
//! - [`Tensor`] - Fixed-shape NCHW float tensor exchanged with the inference engine
//!
//! ## Crate Structure
//!
//! ```text
//! hue-core (this crate)
//!    ^
//!    |
//!    +-- hue-icc (ICC transforms)
//!    +-- hue-ops (resampling, normalization)
//!    +-- hue-io (PNG / JPEG)
//!    +-- hue-model (model cache, inference engine)
//!    +-- hue-colorize (colorization pipeline)
//! ```
//!
//! All invariants (stride, channel lengths, tensor shapes) are checked when a
//! value is constructed, so downstream code can index without re-validating.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod lab;
pub mod tensor;

pub use buffer::{ColorModel, PixelBuffer};
pub use error::{Error, Result};
pub use lab::{Lab, LabChannels, Rgb};
pub use tensor::{Tensor, INPUT_SHAPE, MODEL_DIMENSION, OUTPUT_SHAPE};
