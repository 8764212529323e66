//! Inference engine abstraction and the shared model handle.

use crate::error::{BoxError, ModelError, ModelResult};
use hue_core::{Tensor, INPUT_SHAPE, OUTPUT_SHAPE};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

/// A loaded model that maps an L tensor to an (a, b) tensor.
///
/// Implementations must be usable from several threads at once; the
/// pipeline shares one engine between concurrent colorize calls.
pub trait InferenceEngine: Send + Sync {
    /// Runs one forward pass.
    fn predict(&self, input: &Tensor) -> Result<Tensor, BoxError>;
}

/// Cheap-clone handle to a loaded engine.
///
/// Published once by [`crate::ModelCache`] and immutable afterwards.
#[derive(Clone)]
pub struct ModelHandle {
    engine: Arc<dyn InferenceEngine>,
    artifact: PathBuf,
}

impl ModelHandle {
    /// Wraps a loaded engine and the artifact it was loaded from.
    pub fn new(engine: Arc<dyn InferenceEngine>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            artifact: artifact.into(),
        }
    }

    /// Path of the compiled artifact backing this handle.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Runs the model, checking both tensor shapes against the model signature.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Shape`] if the input or output is not the expected shape
    /// - [`ModelError::Inference`] if the engine fails
    pub fn predict(&self, input: &Tensor) -> ModelResult<Tensor> {
        input.expect_shape(INPUT_SHAPE)?;
        trace!(artifact = %self.artifact.display(), "predict");
        let output = self.engine.predict(input).map_err(ModelError::Inference)?;
        output.expect_shape(OUTPUT_SHAPE)?;
        Ok(output)
    }

    /// Returns `true` if both handles share the same engine instance.
    pub fn ptr_eq(&self, other: &ModelHandle) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("artifact", &self.artifact)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Zeros;

    impl InferenceEngine for Zeros {
        fn predict(&self, _input: &Tensor) -> Result<Tensor, BoxError> {
            Ok(Tensor::zeros(OUTPUT_SHAPE))
        }
    }

    struct WrongShape;

    impl InferenceEngine for WrongShape {
        fn predict(&self, _input: &Tensor) -> Result<Tensor, BoxError> {
            Ok(Tensor::zeros([1, 1, 256, 256]))
        }
    }

    #[test]
    fn test_predict_checks_input() {
        let handle = ModelHandle::new(Arc::new(Zeros), "m.bin");
        let bad = Tensor::zeros([1, 1, 128, 128]);
        assert!(matches!(handle.predict(&bad), Err(ModelError::Shape(_))));
        assert!(handle.predict(&Tensor::zeros(INPUT_SHAPE)).is_ok());
    }

    #[test]
    fn test_predict_checks_output() {
        let handle = ModelHandle::new(Arc::new(WrongShape), "m.bin");
        assert!(matches!(
            handle.predict(&Tensor::zeros(INPUT_SHAPE)),
            Err(ModelError::Shape(_))
        ));
    }

    #[test]
    fn test_ptr_eq() {
        let a = ModelHandle::new(Arc::new(Zeros), "m.bin");
        let b = a.clone();
        let c = ModelHandle::new(Arc::new(Zeros), "m.bin");
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
