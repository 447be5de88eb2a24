//! Request and response bodies for the diary endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::diary::{AnalysisResult, Correction, Emotion, FeedbackRow, ScoreMatrix, TimeSlot};

/// Request to analyze a diary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Analysis of one diary entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Handle for feedback and later lookups
    pub analysis_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub matrix: ScoreMatrix,
    pub results: Vec<AnalysisResult>,
    /// Absent when no sentence received a recognized emotion
    #[serde(default)]
    pub dominant_emotion: Option<Emotion>,
}

/// A previously stored analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAnalysisResponse {
    pub analysis_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub text: String,
    pub matrix: ScoreMatrix,
    pub results: Vec<AnalysisResult>,
    #[serde(default)]
    pub dominant_emotion: Option<Emotion>,
    pub age_seconds: u64,
}

/// Synthetic diary text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleDiaryResponse {
    pub text: String,
}

/// Corrected labels, index-aligned with the analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub corrections: Vec<Correction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Number of rows persisted
    pub saved: usize,
    #[serde(default)]
    pub rows: Vec<FeedbackRow>,
    /// Sink that received the rows
    pub sink: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAnalysisResponse {
    pub deleted: bool,
    pub analysis_id: String,
}

/// Emotion entry for the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionInfo {
    pub id: Emotion,
    /// Display label shown to users
    pub label: String,
}

/// Time slot entry with its trigger keywords
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotInfo {
    pub id: TimeSlot,
    pub keywords: Vec<String>,
    /// Slot used when no keyword matches
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionListResponse {
    pub emotions: Vec<EmotionInfo>,
    pub time_slots: Vec<TimeSlotInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub loaded: bool,
    pub backend: String,
    pub n_features: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_request_msgpack() {
        let req = FeedbackRequest {
            corrections: vec![Correction {
                emotion: Emotion::Love,
                time_slot: TimeSlot::Midday,
            }],
        };

        let bytes = rmp_serde::to_vec_named(&req).unwrap();
        let decoded: FeedbackRequest = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(decoded.corrections, req.corrections);
    }

    #[test]
    fn test_analyze_response_without_dominant() {
        let json = serde_json::json!({
            "analysis_id": "abc",
            "analyzed_at": "2024-05-01T09:30:00Z",
            "matrix": {},
            "results": []
        });
        let response: AnalyzeResponse = serde_json::from_value(json).unwrap();
        assert!(response.dominant_emotion.is_none());
        assert!(response.matrix.is_empty());
    }
}
