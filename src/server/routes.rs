//! HTTP route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::diary::{Emotion, TimeSlot, TimeSlotClassifier};
use crate::types::{
    ConfigResponse, EmotionInfo, EmotionListResponse, FeedbackInfo, HealthResponse, HealthStatus,
    ModelInfo, RecommendInfo, ServerInfo, TimeSlotInfo,
};

use super::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `MessagePack` response wrapper
pub struct MsgPack<T>(pub T);

impl<T: serde::Serialize> IntoResponse for MsgPack<T> {
    fn into_response(self) -> Response {
        match rmp_serde::to_vec_named(&self.0) {
            Ok(bytes) => (
                StatusCode::OK,
                [("content-type", "application/msgpack")],
                bytes,
            )
                .into_response(),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize response: {e}"),
            )
                .into_response(),
        }
    }
}

/// Health check endpoint
///
/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> MsgPack<HealthResponse> {
    let classifier_loaded = state.has_classifier().await;
    let active_analyses = state.sessions.read().await.session_count();

    // Degraded: the server answers but cannot analyze
    let status = if classifier_loaded {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    MsgPack(HealthResponse {
        status,
        version: VERSION.to_string(),
        classifier_loaded,
        active_analyses,
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Configuration endpoint
///
/// GET /api/v1/config
pub async fn config(State(state): State<AppState>) -> MsgPack<ConfigResponse> {
    let config = &state.config;

    let loaded = state.has_classifier().await;
    let n_features = state
        .classifier
        .read()
        .await
        .as_ref()
        .map(|c| c.n_features());

    MsgPack(ConfigResponse {
        model: ModelInfo {
            backend: config.model.backend.to_string(),
            vectorizer_path: config.model.vectorizer_path.display().to_string(),
            classifier_path: config.model.classifier_path.display().to_string(),
            loaded,
            n_features,
        },
        server: ServerInfo {
            host: config.server.host.clone(),
            port: config.server.port,
        },
        session_ttl_secs: config.session.ttl_secs,
        recommend: RecommendInfo {
            music_enabled: state.recommender.has_music(),
            movies_enabled: state.recommender.has_movies(),
            timeout_secs: config.recommend.timeout_secs,
        },
        feedback: FeedbackInfo {
            sink: state.feedback_sink.name().to_string(),
            configured_backend: config.feedback.backend.to_string(),
        },
    })
}

/// List emotions and time slots
///
/// GET /api/v1/emotions
pub async fn emotions() -> MsgPack<EmotionListResponse> {
    let classifier = TimeSlotClassifier::default();

    let emotions = Emotion::ALL
        .into_iter()
        .map(|e| EmotionInfo {
            id: e,
            label: e.korean_label().to_string(),
        })
        .collect();

    let time_slots = TimeSlot::ALL
        .into_iter()
        .map(|slot| TimeSlotInfo {
            id: slot,
            keywords: classifier
                .keywords_for(slot)
                .iter()
                .map(|k| (*k).to_string())
                .collect(),
            fallback: slot == classifier.fallback(),
        })
        .collect();

    MsgPack(EmotionListResponse {
        emotions,
        time_slots,
    })
}
