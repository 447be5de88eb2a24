//! TF-IDF vectorizer loaded from a fitted vocabulary/IDF table.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use super::InferenceError;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"))
}

/// Row normalization applied after TF-IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Serialized vectorizer artifact
#[derive(Debug, Clone, Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default = "default_norm")]
    norm: Option<Norm>,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

/// Sparse feature vector, entries sorted by column
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f32)>,
}

impl FeatureVector {
    pub fn new(dim: usize, mut entries: Vec<(usize, f32)>) -> Self {
        entries.retain(|(col, _)| *col < dim);
        entries.sort_by_key(|(col, _)| *col);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    /// True when no vocabulary term was found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dot(&self, weights: &[f32]) -> f32 {
        self.entries
            .iter()
            .filter_map(|(col, v)| weights.get(*col).map(|w| w * v))
            .sum()
    }

    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.dim];
        for (col, v) in &self.entries {
            dense[*col] = *v;
        }
        dense
    }
}

/// Bag-of-words TF-IDF vectorizer with a fixed vocabulary
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    ngram_range: (usize, usize),
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Load a vectorizer artifact from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        if !path.exists() {
            return Err(InferenceError::ArtifactNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, InferenceError> {
        let artifact: VectorizerArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    fn from_artifact(artifact: VectorizerArtifact) -> Result<Self, InferenceError> {
        if artifact.idf.is_empty() {
            return Err(InferenceError::InvalidArtifact(
                "vectorizer has an empty idf table".to_string(),
            ));
        }

        if let Some((term, col)) = artifact
            .vocabulary
            .iter()
            .find(|(_, col)| **col >= artifact.idf.len())
        {
            return Err(InferenceError::InvalidArtifact(format!(
                "vocabulary term '{term}' maps to column {col}, but idf has {} entries",
                artifact.idf.len()
            )));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(InferenceError::InvalidArtifact(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vectorize a sentence. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, text: &str) -> FeatureVector {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = token_pattern()
            .find_iter(&text)
            .map(|m| m.as_str())
            .collect();

        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let gram = window.join(" ");
                if let Some(&col) = self.vocabulary.get(&gram) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (col, tf * self.idf[col])
            })
            .collect();

        let norm = match self.norm {
            Some(Norm::L2) => entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt(),
            Some(Norm::L1) => entries.iter().map(|(_, v)| v.abs()).sum::<f32>(),
            None => 0.0,
        };
        if norm > 0.0 {
            for (_, v) in &mut entries {
                *v /= norm;
            }
        }

        FeatureVector::new(self.n_features(), entries)
    }
}
