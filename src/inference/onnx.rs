//! ONNX Runtime classifier backend.

use std::path::Path;
use std::sync::Mutex;

use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use tracing::{debug, info};

use super::{FeatureVector, InferenceError};

/// Classifier graph taking a `[1, n_features]` f32 tensor.
///
/// The first output is either an i64 class index or f32 class scores.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    labels: Vec<String>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("labels", &self.labels)
            .finish()
    }
}

impl OnnxClassifier {
    pub fn load(model_path: &Path, labels: Vec<String>) -> Result<Self, InferenceError> {
        if !model_path.exists() {
            return Err(InferenceError::ArtifactNotFound(model_path.to_path_buf()));
        }
        if labels.is_empty() {
            return Err(InferenceError::InvalidArtifact(
                "ONNX classifier needs at least one label".to_string(),
            ));
        }

        let model_bytes = std::fs::read(model_path)?;

        let session = Session::builder()
            .map_err(|e| InferenceError::Onnx(e.to_string()))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Onnx(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e| InferenceError::Onnx(e.to_string()))?
            .commit_from_memory(&model_bytes)
            .map_err(|e| InferenceError::Onnx(format!("Failed to load model: {e}")))?;

        debug!(
            inputs = ?session.inputs.iter().map(|i| &i.name).collect::<Vec<_>>(),
            outputs = ?session.outputs.iter().map(|o| &o.name).collect::<Vec<_>>(),
            "Classifier graph loaded"
        );
        info!(labels = labels.len(), "ONNX emotion classifier ready");

        Ok(Self {
            session: Mutex::new(session),
            labels,
        })
    }

    /// Run the graph and map its output to a label.
    ///
    /// Indices outside the label table come back as their decimal string so
    /// they surface as unrecognized labels.
    pub fn predict(&self, x: &FeatureVector) -> Result<String, InferenceError> {
        let dense = x.to_dense();
        let input = Tensor::from_array(([1usize, dense.len()], dense.into_boxed_slice()))
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Onnx(format!("Session lock error: {e}")))?;

        let input_name = session.inputs[0].name.clone();
        let output_name = session.outputs[0].name.clone();

        let outputs = session
            .run(ort::inputs![input_name.as_str() => input])
            .map_err(|e| InferenceError::Onnx(e.to_string()))?;

        let output = outputs
            .get(output_name.as_str())
            .ok_or_else(|| InferenceError::Onnx(format!("Output '{}' not found", output_name)))?;

        let index = if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
            data.first()
                .copied()
                .ok_or_else(|| InferenceError::Onnx("Empty label output".to_string()))?
        } else {
            let (shape, scores) = output
                .try_extract_tensor::<f32>()
                .map_err(|e| InferenceError::Onnx(e.to_string()))?;
            debug!(?shape, "Classifier score output");
            argmax(scores)
                .map(|i| i as i64)
                .ok_or_else(|| InferenceError::Onnx("Empty score output".to_string()))?
        };

        Ok(usize::try_from(index)
            .ok()
            .and_then(|i| self.labels.get(i).cloned())
            .unwrap_or_else(|| index.to_string()))
    }
}

/// Index of the first maximum score
fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, max)) if score <= max => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
