//! Recommendation route handler.

use axum::extract::State;
use tracing::info;

use crate::error::AppError;
use crate::types::{RecommendRequest, RecommendResponse};

use super::diary::parse_analysis_id;
use super::extractors::MsgPackExtractor;
use super::routes::MsgPack;
use super::AppState;

/// POST /api/v1/recommend
///
/// Music and movie picks for an emotion, given directly or taken from a
/// stored analysis. Catalog failures are reported per category, not as
/// request errors.
pub async fn recommend(
    State(state): State<AppState>,
    MsgPackExtractor(req): MsgPackExtractor<RecommendRequest>,
) -> Result<MsgPack<RecommendResponse>, AppError> {
    let emotion = match (req.emotion, req.analysis_id) {
        (Some(emotion), _) => emotion,
        (None, Some(raw_id)) => {
            let id = parse_analysis_id(&raw_id)?;
            let mut sessions = state.sessions.write().await;
            let session = sessions
                .touch(&id)
                .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found or expired")))?;
            session.analysis.dominant_emotion().ok_or_else(|| {
                AppError::BadRequest(
                    "Analysis has no dominant emotion; nothing to recommend".to_string(),
                )
            })?
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either emotion or analysis_id must be provided".to_string(),
            ));
        }
    };

    let set = state.recommender.recommend(emotion).await;
    info!(
        %emotion,
        music = set.music.items().len(),
        movies = set.movies.items().len(),
        "Recommendations served"
    );

    Ok(MsgPack(RecommendResponse::from(set)))
}
