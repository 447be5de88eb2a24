//! Classifier management route handlers.

use axum::extract::State;
use tracing::warn;

use crate::error::AppError;
use crate::types::ReloadResponse;

use super::routes::MsgPack;
use super::AppState;

/// POST /api/v1/model/reload
///
/// Reload the vectorizer and classifier from the configured paths. On
/// failure the previously loaded analyzer stays active.
pub async fn reload(State(state): State<AppState>) -> Result<MsgPack<ReloadResponse>, AppError> {
    let classifier = state.load_classifier().await.map_err(|e| {
        warn!(error = %e, "Classifier reload failed");
        e
    })?;

    Ok(MsgPack(ReloadResponse {
        loaded: true,
        backend: classifier.backend_kind().to_string(),
        n_features: classifier.n_features(),
    }))
}
