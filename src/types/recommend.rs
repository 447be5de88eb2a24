//! Request and response bodies for the recommendation endpoint.

use serde::{Deserialize, Serialize};

use crate::diary::Emotion;
use crate::recommend::{RecommendationSet, Recommendations};

/// Request recommendations for an emotion.
///
/// Either `emotion` or `analysis_id` must be set; with an id the stored
/// analysis' dominant emotion is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub emotion: Option<Emotion>,
    #[serde(default)]
    pub analysis_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub emotion: Emotion,
    /// Display label for the emotion
    pub label: String,
    pub music: Recommendations,
    pub movies: Recommendations,
}

impl From<RecommendationSet> for RecommendResponse {
    fn from(set: RecommendationSet) -> Self {
        Self {
            emotion: set.emotion,
            label: set.emotion.korean_label().to_string(),
            music: set.music,
            movies: set.movies,
        }
    }
}
