//! Two-pass colorization.
//!
//! The model sees a 256x256 L channel and predicts a and b at that size.
//! Predicted chroma is turned into a small RGB image, upscaled to the source
//! resolution, and converted back to Lab; its a and b are then recombined
//! with the full-resolution L of the source, so detail in the output comes
//! from the original luminance and only chroma is interpolated.
//!
//! ```text
//!  source ──normalize 256──> small ──extract──> L_small ──model──> a_pred, b_pred
//!                                                  │                   │
//!                                                  └────synthesize─────┘
//!                                                           │
//!                                              small RGB ──normalize WxH──> up
//!                                                                            │
//!  source ──repack──extract──> L_orig ───────synthesize(L_orig, a_up, b_up)──┘
//! ```

use crate::adapter::ColorAdapter;
use crate::error::{ColorizeError, Result};
use crate::extract::{extract_lab, synthesize_image};
use crate::marshal::{from_output_tensor, to_input_tensor};
use hue_core::{PixelBuffer, MODEL_DIMENSION};
use hue_model::ModelHandle;
use hue_ops::{normalize_with_filter, Filter};
use tracing::{debug, trace};

/// Model input L with its predicted chroma, all at model resolution.
struct Prediction {
    l: Vec<f32>,
    a: Vec<f32>,
    b: Vec<f32>,
}

/// Colorizes `image` with the Lanczos-3 resampler.
///
/// The result is RGBA8 at the source resolution. No partial image is
/// returned on failure.
///
/// # Errors
///
/// - [`ColorizeError::PreprocessFailure`] if normalizing, Lab extraction or
///   inference fails
/// - [`ColorizeError::PostprocessFailure`] if any later step fails
pub fn colorize(
    image: &PixelBuffer,
    model: &ModelHandle,
    adapter: &ColorAdapter,
) -> Result<PixelBuffer> {
    colorize_with_filter(image, model, adapter, Filter::Lanczos3)
}

/// Colorizes `image`, resampling with `filter` in both directions.
pub fn colorize_with_filter(
    image: &PixelBuffer,
    model: &ModelHandle,
    adapter: &ColorAdapter,
    filter: Filter,
) -> Result<PixelBuffer> {
    trace!(
        width = image.width(),
        height = image.height(),
        model = %image.color_model(),
        ?filter,
        "colorize"
    );

    let prediction =
        predict(image, model, adapter, filter).map_err(ColorizeError::preprocess)?;
    recombine(image, prediction, adapter, filter).map_err(ColorizeError::postprocess)
}

/// Steps 1-3: normalize, extract L, run the model.
fn predict(
    image: &PixelBuffer,
    model: &ModelHandle,
    adapter: &ColorAdapter,
    filter: Filter,
) -> Result<Prediction> {
    let model_kind = image.color_model();
    if !model_kind.is_colorizable() {
        return Err(ColorizeError::UnsupportedColorSpace(model_kind));
    }

    let d = MODEL_DIMENSION as u32;
    let small = normalize_with_filter(image, d, d, filter)?;
    let (l, _, _) = extract_lab(&small, adapter)?.into_parts();

    let input = to_input_tensor(&l, MODEL_DIMENSION)?;
    let output = model.predict(&input).map_err(ColorizeError::Inference)?;
    let (a, b) = from_output_tensor(&output, MODEL_DIMENSION)?;
    debug!("chroma predicted");

    Ok(Prediction { l, a, b })
}

/// Steps 4-7: synthesize, upscale, recombine with the source luminance.
fn recombine(
    image: &PixelBuffer,
    prediction: Prediction,
    adapter: &ColorAdapter,
    filter: Filter,
) -> Result<PixelBuffer> {
    let d = MODEL_DIMENSION as u32;
    let (width, height) = (image.width(), image.height());

    let small_rgb = synthesize_image(
        &prediction.l,
        &prediction.a,
        &prediction.b,
        d,
        d,
        adapter,
    )?;
    let up = normalize_with_filter(&small_rgb, width, height, filter)?;
    let (_, a_up, b_up) = extract_lab(&up, adapter)?.into_parts();

    // Same size: only the byte layout changes
    let source = normalize_with_filter(image, width, height, filter)?;
    let (l_orig, _, _) = extract_lab(&source, adapter)?.into_parts();

    debug!(width, height, "recombining luminance");
    synthesize_image(&l_orig, &a_up, &b_up, width, height, adapter)
}
