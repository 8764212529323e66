//! ONNX Runtime backend.
//!
//! "Compiling" runs the ONNX Runtime graph optimizer once and stores the
//! optimized graph as the cached artifact; loads on later starts skip it.

use crate::engine::InferenceEngine;
use crate::error::BoxError;
use crate::runtime::ModelRuntime;
use crate::signature::{INPUT_NAME, OUTPUT_NAME};
use hue_core::Tensor;
use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// [`ModelRuntime`] backed by ONNX Runtime on the CPU.
#[derive(Debug, Clone)]
pub struct OnnxRuntime {
    intra_threads: usize,
}

impl OnnxRuntime {
    /// Creates a runtime; `intra_threads == 0` lets ONNX Runtime decide.
    pub fn new(intra_threads: usize) -> Self {
        Self { intra_threads }
    }
}

impl Default for OnnxRuntime {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ModelRuntime for OnnxRuntime {
    fn name(&self) -> &str {
        "onnx"
    }

    fn artifact_extension(&self) -> &str {
        "onnx"
    }

    fn compile(&self, source: &Path, dest: &Path) -> Result<(), BoxError> {
        let optimized = dest.to_string_lossy().into_owned();
        let session = Session::builder()
            .map_err(|e| format!("session builder: {e}"))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| format!("optimization level: {e}"))?
            .with_optimized_model_path(optimized)
            .map_err(|e| format!("optimized model path: {e}"))?
            .commit_from_file(source)
            .map_err(|e| format!("compile {}: {e}", source.display()))?;
        drop(session);

        if !dest.exists() {
            return Err(format!("optimizer produced no output at {}", dest.display()).into());
        }
        Ok(())
    }

    fn load(&self, artifact: &Path) -> Result<Arc<dyn InferenceEngine>, BoxError> {
        let mut builder = Session::builder()
            .map_err(|e| format!("session builder: {e}"))?
            // Already optimized at compile time
            .with_optimization_level(GraphOptimizationLevel::Disable)
            .map_err(|e| format!("optimization level: {e}"))?;
        if self.intra_threads > 0 {
            builder = builder
                .with_intra_threads(self.intra_threads)
                .map_err(|e| format!("thread count: {e}"))?;
        }
        let session = builder
            .commit_from_file(artifact)
            .map_err(|e| format!("load {}: {e}", artifact.display()))?;
        debug!(artifact = %artifact.display(), "onnx session ready");

        Ok(Arc::new(OnnxEngine {
            session: Mutex::new(session),
        }))
    }
}

/// A loaded ONNX session. Runs are serialized on the session lock.
struct OnnxEngine {
    session: Mutex<Session>,
}

impl InferenceEngine for OnnxEngine {
    fn predict(&self, input: &Tensor) -> Result<Tensor, BoxError> {
        let [n, c, h, w] = input.shape();
        let array = Array4::from_shape_vec((n, c, h, w), input.data().to_vec())?;
        let value = ort::value::Tensor::from_array(array)
            .map_err(|e| format!("input tensor: {e}"))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| "session lock poisoned")?;
        let outputs = session
            .run(ort::inputs![INPUT_NAME => &value])
            .map_err(|e| format!("run: {e}"))?;
        let view = outputs[OUTPUT_NAME]
            .try_extract_array::<f32>()
            .map_err(|e| format!("output {OUTPUT_NAME}: {e}"))?;

        let dims = view.shape();
        if dims.len() != 4 {
            return Err(format!("output rank {} != 4", dims.len()).into());
        }
        let shape = [dims[0], dims[1], dims[2], dims[3]];
        let data: Vec<f32> = view.iter().copied().collect();
        Ok(Tensor::new(shape, data)?)
    }
}
