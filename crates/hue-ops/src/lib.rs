//! # hue-ops
//!
//! Image operations used to feed the colorization model.
//!
//! # Modules
//!
//! - [`resize`] - Separable resampling of interleaved float images
//! - [`normalize`] - Resample a [`PixelBuffer`](hue_core::PixelBuffer) to a
//!   fixed size and re-pack it into the pipeline's byte layout
//!
//! # Example
//!
//! ```rust
//! use hue_core::PixelBuffer;
//! use hue_ops::normalize;
//!
//! let src = PixelBuffer::gray8(640, 480, vec![90u8; 640 * 480]).unwrap();
//! let small = normalize(&src, 256, 256).unwrap();
//! assert_eq!((small.width(), small.height()), (256, 256));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod normalize;
pub mod resize;

pub use error::{OpsError, OpsResult};
pub use normalize::{normalize, normalize_with_filter};
pub use resize::Filter;
