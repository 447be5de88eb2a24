//! Emotion classifier built from pre-trained artifacts.
//!
//! A TF-IDF vectorizer turns a sentence into a sparse feature vector and a
//! linear classifier (JSON weights, or an ONNX graph with the `onnx`
//! feature) picks one label. Artifacts are loaded once and shared read-only.

mod linear;
mod model;
#[cfg(feature = "onnx")]
mod onnx;
mod vectorizer;

pub use linear::LinearClassifier;
pub use model::{EmotionClassifier, ModelPaths};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use vectorizer::{FeatureVector, TfidfVectorizer};

use std::path::PathBuf;

use crate::error::AppError;

/// Inference error types
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("Emotion classifier not loaded")]
    ModelNotLoaded,

    #[error("Model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    #[error("ONNX runtime error: {0}")]
    Onnx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::ModelNotLoaded
            | InferenceError::ArtifactNotFound(_)
            | InferenceError::BackendUnavailable(_) => AppError::Unavailable(err.to_string()),
            _ => AppError::Internal(err.to_string()),
        }
    }
}
