//! Emotion classifier assembled from vectorizer and classifier artifacts.

use std::path::PathBuf;

use tracing::info;

use super::{InferenceError, LinearClassifier, TfidfVectorizer};
use crate::config::{ClassifierBackend, ModelConfig};
use crate::diary::{EmotionLabel, EmotionPredictor};

#[cfg(feature = "onnx")]
use super::OnnxClassifier;

/// Resolved artifact locations
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl ModelPaths {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            vectorizer: config.vectorizer_path.clone(),
            classifier: config.classifier_path.clone(),
        }
    }

    /// Fail if either artifact is missing
    pub fn verify(&self) -> Result<(), InferenceError> {
        for path in [&self.vectorizer, &self.classifier] {
            if !path.exists() {
                return Err(InferenceError::ArtifactNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

enum Backend {
    Linear(LinearClassifier),
    #[cfg(feature = "onnx")]
    Onnx(OnnxClassifier),
}

/// Sentence-level emotion classifier.
///
/// Read-only after load; share it behind an `Arc`.
pub struct EmotionClassifier {
    vectorizer: TfidfVectorizer,
    backend: Backend,
}

impl std::fmt::Debug for EmotionClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmotionClassifier")
            .field("backend", &self.backend_kind())
            .field("n_features", &self.n_features())
            .finish()
    }
}

impl EmotionClassifier {
    /// Load both artifacts as configured
    pub fn load(config: &ModelConfig) -> Result<Self, InferenceError> {
        let paths = ModelPaths::from_config(config);
        paths.verify()?;

        info!(
            backend = %config.backend,
            vectorizer = %paths.vectorizer.display(),
            classifier = %paths.classifier.display(),
            "Loading emotion classifier"
        );

        let vectorizer = TfidfVectorizer::load(&paths.vectorizer)?;

        let classifier = match config.backend {
            ClassifierBackend::Linear => {
                let linear = LinearClassifier::load(&paths.classifier)?;
                Self::from_linear(vectorizer, linear)?
            }
            #[cfg(feature = "onnx")]
            ClassifierBackend::Onnx => {
                let onnx = OnnxClassifier::load(&paths.classifier, config.labels.clone())?;
                Self {
                    vectorizer,
                    backend: Backend::Onnx(onnx),
                }
            }
            #[cfg(not(feature = "onnx"))]
            ClassifierBackend::Onnx => {
                return Err(InferenceError::BackendUnavailable(
                    "onnx backend requires the `onnx` feature".to_string(),
                ));
            }
        };

        info!(
            n_features = classifier.n_features(),
            vocabulary = classifier.vectorizer.vocabulary_size(),
            "Emotion classifier loaded"
        );

        Ok(classifier)
    }

    /// Pair a vectorizer with linear weights, checking feature widths match
    pub fn from_linear(
        vectorizer: TfidfVectorizer,
        linear: LinearClassifier,
    ) -> Result<Self, InferenceError> {
        if linear.n_features() != vectorizer.n_features() {
            return Err(InferenceError::InvalidArtifact(format!(
                "classifier expects {} features, vectorizer produces {}",
                linear.n_features(),
                vectorizer.n_features()
            )));
        }

        Ok(Self {
            vectorizer,
            backend: Backend::Linear(linear),
        })
    }

    pub fn backend_kind(&self) -> ClassifierBackend {
        match self.backend {
            Backend::Linear(_) => ClassifierBackend::Linear,
            #[cfg(feature = "onnx")]
            Backend::Onnx(_) => ClassifierBackend::Onnx,
        }
    }

    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    /// Classify one sentence
    pub fn classify(&self, sentence: &str) -> Result<EmotionLabel, InferenceError> {
        let features = self.vectorizer.transform(sentence);

        let label = match &self.backend {
            Backend::Linear(linear) => linear.predict(&features).to_string(),
            #[cfg(feature = "onnx")]
            Backend::Onnx(onnx) => onnx.predict(&features)?,
        };

        Ok(EmotionLabel::parse(&label))
    }
}

impl EmotionPredictor for EmotionClassifier {
    fn predict(&self, sentence: &str) -> Result<EmotionLabel, InferenceError> {
        self.classify(sentence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::Emotion;
    use std::path::Path;

    const VECTORIZER: &str = r#"{
        "vocabulary": {"즐거웠다": 0, "슬펐다": 1, "화가": 2},
        "idf": [1.0, 1.0, 1.0]
    }"#;

    const CLASSIFIER: &str = r#"{
        "classes": ["happy", "sad", "fear"],
        "coef": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        "intercept": [0.0, 0.0, 0.0]
    }"#;

    fn write_artifacts(dir: &Path, vectorizer: &str, classifier: &str) -> ModelConfig {
        let vectorizer_path = dir.join("vectorizer.json");
        let classifier_path = dir.join("classifier.json");
        std::fs::write(&vectorizer_path, vectorizer).unwrap();
        std::fs::write(&classifier_path, classifier).unwrap();

        ModelConfig {
            vectorizer_path,
            classifier_path,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_load_and_classify() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), VECTORIZER, CLASSIFIER);

        let classifier = EmotionClassifier::load(&config).unwrap();
        assert_eq!(classifier.backend_kind(), ClassifierBackend::Linear);
        assert_eq!(classifier.n_features(), 3);

        assert_eq!(
            classifier.classify("점심에 친구를 만나서 즐거웠다").unwrap(),
            EmotionLabel::Known(Emotion::Happy)
        );
        assert_eq!(
            classifier.classify("밤에 조금 슬펐다").unwrap(),
            EmotionLabel::Known(Emotion::Sad)
        );
    }

    #[test]
    fn test_label_outside_set_is_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_artifacts(dir.path(), VECTORIZER, CLASSIFIER);
        let classifier = EmotionClassifier::load(&config).unwrap();

        assert_eq!(
            classifier.classify("너무 화가 났다").unwrap(),
            EmotionLabel::Unrecognized("fear".to_string())
        );
    }

    #[test]
    fn test_missing_artifact_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig {
            vectorizer_path: dir.path().join("missing.json"),
            classifier_path: dir.path().join("classifier.json"),
            ..ModelConfig::default()
        };

        let err = EmotionClassifier::load(&config).unwrap_err();
        assert!(matches!(err, InferenceError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_feature_width_mismatch_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = r#"{
            "classes": ["happy", "sad"],
            "coef": [[1.0, 0.0], [0.0, 1.0]],
            "intercept": [0.0, 0.0]
        }"#;
        let config = write_artifacts(dir.path(), VECTORIZER, classifier);

        let err = EmotionClassifier::load(&config).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_backend_requires_feature() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = write_artifacts(dir.path(), VECTORIZER, CLASSIFIER);
        config.backend = ClassifierBackend::Onnx;

        let err = EmotionClassifier::load(&config).unwrap_err();
        assert!(matches!(err, InferenceError::BackendUnavailable(_)));
    }
}
