//! ONNX classifier backed by tract

use super::Classifier;
use crate::error::ClassifierError;
use crate::preprocess::CHANNELS;
use std::path::Path;
use tract_onnx::prelude::*;

type Plan = TypedRunnableModel<TypedModel>;

/// An optimized ONNX graph with a fixed `[1, size, size, 3]` f32 input
pub struct OnnxClassifier {
    plan: Plan,
    num_classes: Option<usize>,
}

impl OnnxClassifier {
    /// Load and optimize the model at `path`.
    ///
    /// The input fact is pinned to a single channel-last image of
    /// `input_size` pixels square.
    pub fn load(path: &Path, input_size: u32) -> Result<Self, ClassifierError> {
        if !path.is_file() {
            return Err(ClassifierError::ModelNotFound(path.display().to_string()));
        }

        tracing::info!(model_path = %path.display(), "Loading ONNX model");

        let side = input_size as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(0, f32::fact([1, side, side, CHANNELS]).into())
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::ModelLoad(format!("{}: {:#}", path.display(), e)))?;

        let num_classes = plan
            .model()
            .output_fact(0)
            .ok()
            .and_then(|fact| fact.shape.as_concrete().map(|dims| dims.to_vec()))
            .and_then(|dims| dims.last().copied());

        tracing::info!(num_classes = ?num_classes, "Model loaded");

        Ok(Self { plan, num_classes })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, input: Tensor) -> anyhow::Result<Vec<f32>> {
        let outputs = self.plan.run(tvec!(input.into()))?;
        let first = outputs
            .first()
            .ok_or_else(|| anyhow::anyhow!("model produced no outputs"))?;

        let view = first.to_array_view::<f32>()?;
        // first (only) row of the batch
        let row: Vec<f32> = match view.ndim() {
            0 => anyhow::bail!("model output is a scalar"),
            1 => view.iter().copied().collect(),
            _ => view
                .index_axis(tract_ndarray::Axis(0), 0)
                .iter()
                .copied()
                .collect(),
        };

        Ok(row)
    }

    fn num_classes(&self) -> Option<usize> {
        self.num_classes
    }
}
