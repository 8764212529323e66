//! Tensor contract of the colorization model.
//!
//! The network takes a single-channel L tensor and returns the two predicted
//! chrominance channels. Names match the graph the model was exported with;
//! shapes are [`hue_core::INPUT_SHAPE`] and [`hue_core::OUTPUT_SHAPE`].

/// Name of the luminance input tensor.
pub const INPUT_NAME: &str = "input1";

/// Name of the chrominance output tensor.
pub const OUTPUT_NAME: &str = "796";
