//! Linear classifier over TF-IDF features, loaded from JSON weights.

use std::path::Path;

use serde::Deserialize;

use super::{FeatureVector, InferenceError};

/// One-vs-rest linear model: `argmax(coef · x + intercept)`
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
}

impl LinearClassifier {
    /// Load classifier weights from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        if !path.exists() {
            return Err(InferenceError::ArtifactNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        let classifier: Self = serde_json::from_str(json)?;
        classifier.check_shape()?;
        Ok(classifier)
    }

    fn check_shape(&self) -> Result<(), InferenceError> {
        if self.classes.len() < 2 {
            return Err(InferenceError::InvalidArtifact(format!(
                "classifier needs at least 2 classes, got {}",
                self.classes.len()
            )));
        }

        let expected_rows = if self.is_binary() {
            1
        } else {
            self.classes.len()
        };
        if self.coef.len() != expected_rows {
            return Err(InferenceError::InvalidArtifact(format!(
                "expected {expected_rows} coefficient rows for {} classes, got {}",
                self.classes.len(),
                self.coef.len()
            )));
        }

        if self.intercept.len() != self.coef.len() {
            return Err(InferenceError::InvalidArtifact(format!(
                "expected {} intercepts, got {}",
                self.coef.len(),
                self.intercept.len()
            )));
        }

        let width = self.coef[0].len();
        if width == 0 || self.coef.iter().any(|row| row.len() != width) {
            return Err(InferenceError::InvalidArtifact(
                "coefficient rows must be non-empty and equally wide".to_string(),
            ));
        }

        Ok(())
    }

    /// Binary models store a single coefficient row
    fn is_binary(&self) -> bool {
        self.classes.len() == 2 && self.coef.len() == 1
    }

    /// Number of features each coefficient row expects
    pub fn n_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Raw decision score per coefficient row
    pub fn decision_function(&self, x: &FeatureVector) -> Vec<f32> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| x.dot(row) + b)
            .collect()
    }

    /// Predict a class label. On ties the earliest class wins.
    pub fn predict(&self, x: &FeatureVector) -> &str {
        let scores = self.decision_function(x);

        if self.is_binary() {
            let idx = usize::from(scores[0] > 0.0);
            return &self.classes[idx];
        }

        let mut best = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = i;
            }
        }
        &self.classes[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(dim: usize, entries: &[(usize, f32)]) -> FeatureVector {
        FeatureVector::new(dim, entries.to_vec())
    }

    #[test]
    fn test_multiclass_argmax() {
        let classifier = LinearClassifier::from_json_str(
            r#"{
                "classes": ["happy", "sad", "anger"],
                "coef": [[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]],
                "intercept": [0.0, 0.0, 0.0]
            }"#,
        )
        .unwrap();

        assert_eq!(classifier.n_features(), 2);
        assert_eq!(classifier.predict(&features(2, &[(0, 1.0)])), "happy");
        assert_eq!(classifier.predict(&features(2, &[(1, 1.0)])), "sad");
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let classifier = LinearClassifier::from_json_str(
            r#"{
                "classes": ["happy", "sad", "love"],
                "coef": [[0.0], [0.0], [0.0]],
                "intercept": [0.2, 0.2, 0.1]
            }"#,
        )
        .unwrap();

        assert_eq!(classifier.predict(&features(1, &[])), "happy");
    }

    #[test]
    fn test_intercept_only_prediction() {
        let classifier = LinearClassifier::from_json_str(
            r#"{
                "classes": ["happy", "sad"],
                "coef": [[0.0, 0.0], [0.0, 0.0]],
                "intercept": [-1.0, 0.5]
            }"#,
        )
        .unwrap();

        assert_eq!(classifier.predict(&features(2, &[])), "sad");
    }

    #[test]
    fn test_binary_single_row() {
        let classifier = LinearClassifier::from_json_str(
            r#"{"classes": ["sad", "happy"], "coef": [[2.0]], "intercept": [-1.0]}"#,
        )
        .unwrap();

        assert_eq!(classifier.predict(&features(1, &[(0, 1.0)])), "happy");
        assert_eq!(classifier.predict(&features(1, &[(0, 0.2)])), "sad");
    }

    #[test]
    fn test_rejects_row_count_mismatch() {
        let err = LinearClassifier::from_json_str(
            r#"{"classes": ["a", "b", "c"], "coef": [[1.0], [1.0]], "intercept": [0.0, 0.0]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = LinearClassifier::from_json_str(
            r#"{"classes": ["a", "b", "c"], "coef": [[1.0], [1.0, 2.0], [1.0]], "intercept": [0.0, 0.0, 0.0]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_intercept_mismatch() {
        let err = LinearClassifier::from_json_str(
            r#"{"classes": ["a", "b", "c"], "coef": [[1.0], [1.0], [1.0]], "intercept": [0.0]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_single_class() {
        let err = LinearClassifier::from_json_str(
            r#"{"classes": ["a"], "coef": [[1.0]], "intercept": [0.0]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::InvalidArtifact(_)));
    }
}
