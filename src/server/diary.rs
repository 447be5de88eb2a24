//! Diary analysis and feedback route handlers.

use axum::extract::{Path, State};
use tracing::{debug, info};
use uuid::Uuid;

use crate::diary::{generate_sample_diary, reconcile};
use crate::error::AppError;
use crate::types::{
    AnalyzeRequest, AnalyzeResponse, DeleteAnalysisResponse, FeedbackRequest, FeedbackResponse,
    SampleDiaryResponse, StoredAnalysisResponse,
};

use super::extractors::MsgPackExtractor;
use super::routes::MsgPack;
use super::AppState;

pub(super) fn parse_analysis_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid analysis id: {raw}")))
}

fn not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("Analysis {id} not found or expired"))
}

/// POST /api/v1/diary/analyze
///
/// Split the diary into sentences, classify each, and store the analysis
/// for feedback.
pub async fn analyze(
    State(state): State<AppState>,
    MsgPackExtractor(req): MsgPackExtractor<AnalyzeRequest>,
) -> Result<MsgPack<AnalyzeResponse>, AppError> {
    let analyzer = state.analyzer().await?;

    let text = req.text;
    let (text, analysis) = tokio::task::spawn_blocking(move || {
        let analysis = analyzer.analyze(&text);
        (text, analysis)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Join error: {e}")))?;
    let analysis = analysis?;

    let dominant_emotion = analysis.dominant_emotion();
    let unrecognized = analysis.unrecognized_count();

    let mut sessions = state.sessions.write().await;
    let session = sessions.insert(text, analysis);

    info!(
        analysis_id = %session.id,
        sentences = session.analysis.results.len(),
        unrecognized,
        dominant = ?dominant_emotion,
        "Diary analyzed"
    );

    Ok(MsgPack(AnalyzeResponse {
        analysis_id: session.id.to_string(),
        analyzed_at: session.analyzed_at,
        matrix: session.analysis.matrix,
        results: session.analysis.results.clone(),
        dominant_emotion,
    }))
}

/// GET /api/v1/diary/sample
///
/// Synthetic diary with one sentence per time slot.
pub async fn sample() -> MsgPack<SampleDiaryResponse> {
    let text = generate_sample_diary(&mut rand::thread_rng());
    MsgPack(SampleDiaryResponse { text })
}

/// GET /api/v1/diary/:analysis_id
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<MsgPack<StoredAnalysisResponse>, AppError> {
    let id = parse_analysis_id(&analysis_id)?;

    let mut sessions = state.sessions.write().await;
    let session = sessions.touch(&id).ok_or_else(|| not_found(&id))?;

    Ok(MsgPack(StoredAnalysisResponse {
        analysis_id: session.id.to_string(),
        analyzed_at: session.analyzed_at,
        text: session.text.clone(),
        matrix: session.analysis.matrix,
        results: session.analysis.results.clone(),
        dominant_emotion: session.analysis.dominant_emotion(),
        age_seconds: session.age_seconds(),
    }))
}

/// DELETE /api/v1/diary/:analysis_id
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<MsgPack<DeleteAnalysisResponse>, AppError> {
    let id = parse_analysis_id(&analysis_id)?;

    let removed = state.sessions.write().await.remove(&id);
    if removed.is_none() {
        return Err(not_found(&id));
    }

    debug!(analysis_id = %id, "Analysis cleared");
    Ok(MsgPack(DeleteAnalysisResponse {
        deleted: true,
        analysis_id: id.to_string(),
    }))
}

/// POST /api/v1/diary/:analysis_id/feedback
///
/// Compare corrections with the stored predictions and persist the changed
/// sentences. Diaries without a dominant emotion do not take feedback.
pub async fn feedback(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
    MsgPackExtractor(req): MsgPackExtractor<FeedbackRequest>,
) -> Result<MsgPack<FeedbackResponse>, AppError> {
    let id = parse_analysis_id(&analysis_id)?;

    let (results, dominant) = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.touch(&id).ok_or_else(|| not_found(&id))?;
        (
            session.analysis.results.clone(),
            session.analysis.dominant_emotion(),
        )
    };

    if dominant.is_none() {
        return Err(AppError::BadRequest(
            "Analysis has no recognized emotion; feedback is not accepted".to_string(),
        ));
    }

    let rows = reconcile(&results, &req.corrections)?;
    let sink = state.feedback_sink.name().to_string();

    if rows.is_empty() {
        debug!(analysis_id = %id, "No corrections differ from predictions");
        return Ok(MsgPack(FeedbackResponse {
            saved: 0,
            rows,
            sink,
        }));
    }

    let saved = state.feedback_sink.append(&rows).await?;
    info!(analysis_id = %id, saved, sink = %sink, "Feedback saved");

    Ok(MsgPack(FeedbackResponse { saved, rows, sink }))
}
