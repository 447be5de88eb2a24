//! HTTP server setup and routing.

mod diary;
mod extractors;
mod model;
mod recommend;
mod routes;
mod session;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::diary::DiaryAnalyzer;
use crate::error::AppError;
use crate::inference::{EmotionClassifier, InferenceError};
use crate::recommend::Recommender;
use crate::storage::{sink_from_config, FeedbackSink};

pub use session::{
    spawn_session_cleanup_task, AnalysisSession, AnalysisSessionManager, SharedSessionManager,
};

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Loaded analyzer; `None` until the classifier artifacts load
    pub analyzer: Arc<RwLock<Option<Arc<DiaryAnalyzer>>>>,
    /// Artifact-backed classifier behind the analyzer, for status output
    pub classifier: Arc<RwLock<Option<Arc<EmotionClassifier>>>>,
    /// Analyses awaiting feedback
    pub sessions: SharedSessionManager,
    pub recommender: Arc<Recommender>,
    pub feedback_sink: Arc<dyn FeedbackSink>,
    /// Server start time for uptime calculation
    pub started_at: Instant,
}

impl AppState {
    /// Build state from configuration with no classifier loaded.
    ///
    /// Call [`AppState::load_classifier`] afterwards, or inject an analyzer
    /// with [`AppState::with_analyzer`].
    pub fn new(config: AppConfig) -> Self {
        let timeout = Duration::from_secs(config.recommend.timeout_secs);
        let recommender = Recommender::from_config(&config.recommend);
        let feedback_sink = sink_from_config(&config.feedback, timeout);
        let ttl = Duration::from_secs(config.session.ttl_secs);

        Self {
            config: Arc::new(config),
            analyzer: Arc::new(RwLock::new(None)),
            classifier: Arc::new(RwLock::new(None)),
            sessions: Arc::new(RwLock::new(AnalysisSessionManager::new(ttl))),
            recommender: Arc::new(recommender),
            feedback_sink,
            started_at: Instant::now(),
        }
    }

    /// Use a ready analyzer (any predictor) instead of loading artifacts
    pub fn with_analyzer(self, analyzer: DiaryAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(RwLock::new(Some(Arc::new(analyzer)))),
            ..self
        }
    }

    pub fn with_recommender(mut self, recommender: Recommender) -> Self {
        self.recommender = Arc::new(recommender);
        self
    }

    pub fn with_feedback_sink(mut self, sink: Arc<dyn FeedbackSink>) -> Self {
        self.feedback_sink = sink;
        self
    }

    /// Check if an analyzer is ready
    pub async fn has_classifier(&self) -> bool {
        self.analyzer.read().await.is_some()
    }

    /// Current analyzer, or `Unavailable` when no classifier is loaded
    pub async fn analyzer(&self) -> Result<Arc<DiaryAnalyzer>, AppError> {
        self.analyzer
            .read()
            .await
            .clone()
            .ok_or_else(|| InferenceError::ModelNotLoaded.into())
    }

    /// Load classifier artifacts from the configured paths, replacing any
    /// existing analyzer. Loading runs in a blocking task.
    pub async fn load_classifier(&self) -> Result<Arc<EmotionClassifier>, AppError> {
        let model_config = self.config.model.clone();
        let classifier = tokio::task::spawn_blocking(move || EmotionClassifier::load(&model_config))
            .await
            .map_err(|e| AppError::Internal(format!("Join error: {e}")))??;

        let classifier = Arc::new(classifier);
        let analyzer = DiaryAnalyzer::new(classifier.clone());

        let mut analyzer_guard = self.analyzer.write().await;
        let mut classifier_guard = self.classifier.write().await;
        *analyzer_guard = Some(Arc::new(analyzer));
        *classifier_guard = Some(classifier.clone());

        info!(backend = %classifier.backend_kind(), "Analyzer ready");
        Ok(classifier)
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Creates the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(routes::health))
        .route("/config", get(routes::config))
        .route("/emotions", get(routes::emotions))
        .route("/model/reload", post(model::reload))
        // Diary analysis
        .route("/diary/analyze", post(diary::analyze))
        .route("/diary/sample", get(diary::sample))
        .route(
            "/diary/:analysis_id",
            get(diary::get_analysis).delete(diary::delete_analysis),
        )
        .route("/diary/:analysis_id/feedback", post(diary::feedback))
        // Recommendations
        .route("/recommend", post(recommend::recommend));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
