use std::path::Path;

use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::PredictError;
use crate::models::Prediction;
use crate::preprocess::{self, INPUT_SIZE};

/// Anything that turns a `[1, H, W, 3]` batch into one raw score per blood group.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError>;
}

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX classifier, loaded once and shared read-only between requests.
pub struct OnnxClassifier {
    plan: Plan,
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PredictError> {
        let path = path.as_ref();
        let size = INPUT_SIZE as usize;

        let plan = onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, size, size, 3]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| PredictError::ModelLoad(format!("{}: {:#}", path.display(), e)))?;

        log::info!("Loaded ONNX model from {}", path.display());
        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let tensor: Tensor = input.into();
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;

        let output = outputs
            .first()
            .ok_or_else(|| PredictError::Inference("model produced no outputs".to_string()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(format!("{:#}", e)))?;

        Ok(scores.iter().copied().collect())
    }
}

/// Runs the full decode, resize and inference path for one staged image.
pub fn classify_file(classifier: &dyn Classifier, path: &Path) -> Result<Prediction, PredictError> {
    let input = preprocess::load_input(path)?;
    let scores = classifier.predict(input)?;
    log::debug!("Raw scores: {:?}", scores);
    Prediction::from_scores(&scores)
}
