//! Model management module
//!
//! Provides:
//! - The `Classifier` seam used by request handlers (real model or test double)
//! - ONNX model loading and execution via tract

pub mod onnx;

pub use onnx::OnnxClassifier;

use crate::error::ClassifierError;
use crate::labels::ClassLabels;
use tract_onnx::prelude::Tensor;

/// A loaded image classifier.
///
/// Implementations are shared read-only across requests once constructed.
pub trait Classifier: Send + Sync {
    /// Run a single-image batch and return the first output row
    fn classify(&self, input: Tensor) -> anyhow::Result<Vec<f32>>;

    /// Number of classes in the output row, if known ahead of time
    fn num_classes(&self) -> Option<usize> {
        None
    }
}

/// Check that the model's output width matches the configured labels
pub fn ensure_compatible(
    classifier: &dyn Classifier,
    labels: &ClassLabels,
) -> Result<(), ClassifierError> {
    match classifier.num_classes() {
        Some(outputs) if outputs != labels.len() => Err(ClassifierError::LabelMismatch {
            outputs,
            labels: labels.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<usize>);

    impl Classifier for Fixed {
        fn classify(&self, _input: Tensor) -> anyhow::Result<Vec<f32>> {
            Ok(vec![0.25; 4])
        }

        fn num_classes(&self) -> Option<usize> {
            self.0
        }
    }

    #[test]
    fn test_matching_width() {
        assert!(ensure_compatible(&Fixed(Some(4)), &ClassLabels::default()).is_ok());
    }

    #[test]
    fn test_unknown_width_is_accepted() {
        assert!(ensure_compatible(&Fixed(None), &ClassLabels::default()).is_ok());
    }

    #[test]
    fn test_mismatched_width() {
        let err = ensure_compatible(&Fixed(Some(3)), &ClassLabels::default()).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::LabelMismatch {
                outputs: 3,
                labels: 4
            }
        ));
    }
}
