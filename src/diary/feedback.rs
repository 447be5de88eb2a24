//! Reconciling user corrections against model predictions.

use serde::{Deserialize, Serialize};

use super::{AnalysisResult, Emotion, TimeSlot};
use crate::error::AppError;

/// Human-provided labels for one analyzed sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub emotion: Emotion,
    pub time_slot: TimeSlot,
}

/// A corrected sentence ready to be persisted as training feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRow {
    pub text: String,
    pub label: Emotion,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    #[error("Correction count mismatch: {original} analyzed sentences, {corrected} corrections")]
    LengthMismatch { original: usize, corrected: usize },
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Collect the sentences the user changed.
///
/// `corrected` must be index-aligned with `original`. A row is produced when
/// either the emotion or the time slot differs; only the corrected emotion is
/// carried, the time slot just marks the sentence as changed. An empty result
/// means there is nothing to persist.
pub fn reconcile(
    original: &[AnalysisResult],
    corrected: &[Correction],
) -> Result<Vec<FeedbackRow>, FeedbackError> {
    if original.len() != corrected.len() {
        return Err(FeedbackError::LengthMismatch {
            original: original.len(),
            corrected: corrected.len(),
        });
    }

    let rows = original
        .iter()
        .zip(corrected)
        .filter(|(result, correction)| {
            result.emotion.emotion() != Some(correction.emotion)
                || result.time_slot != correction.time_slot
        })
        .map(|(result, correction)| FeedbackRow {
            text: result.text.clone(),
            label: correction.emotion,
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::EmotionLabel;

    fn result(text: &str, emotion: EmotionLabel, time_slot: TimeSlot) -> AnalysisResult {
        AnalysisResult {
            text: text.to_string(),
            emotion,
            time_slot,
        }
    }

    fn originals() -> Vec<AnalysisResult> {
        vec![
            result("아침 일찍 일어났다", Emotion::Exhausted.into(), TimeSlot::Morning),
            result("점심에 즐거웠다", Emotion::Happy.into(), TimeSlot::Midday),
            result("밤에 슬펐다", Emotion::Sad.into(), TimeSlot::Evening),
        ]
    }

    fn unchanged(original: &[AnalysisResult]) -> Vec<Correction> {
        original
            .iter()
            .map(|r| Correction {
                emotion: r.emotion.emotion().unwrap(),
                time_slot: r.time_slot,
            })
            .collect()
    }

    #[test]
    fn test_no_changes_yields_empty() {
        let original = originals();
        let rows = reconcile(&original, &unchanged(&original)).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reconcile(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch_fails() {
        let original = originals();
        let mut corrections = unchanged(&original);
        corrections.pop();

        let err = reconcile(&original, &corrections).unwrap_err();
        assert_eq!(
            err,
            FeedbackError::LengthMismatch {
                original: 3,
                corrected: 2
            }
        );
    }

    #[test]
    fn test_emotion_change_emits_row() {
        let original = originals();
        let mut corrections = unchanged(&original);
        corrections[1].emotion = Emotion::Love;

        let rows = reconcile(&original, &corrections).unwrap();
        assert_eq!(
            rows,
            vec![FeedbackRow {
                text: "점심에 즐거웠다".to_string(),
                label: Emotion::Love,
            }]
        );
    }

    #[test]
    fn test_time_slot_change_emits_row_with_unchanged_label() {
        let original = originals();
        let mut corrections = unchanged(&original);
        corrections[0].time_slot = TimeSlot::Evening;

        let rows = reconcile(&original, &corrections).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "아침 일찍 일어났다");
        assert_eq!(rows[0].label, Emotion::Exhausted);
    }

    #[test]
    fn test_one_row_per_changed_index() {
        let original = originals();
        let mut corrections = unchanged(&original);
        corrections[0].emotion = Emotion::Happy;
        corrections[2].emotion = Emotion::Anger;
        corrections[2].time_slot = TimeSlot::Midday;

        let rows = reconcile(&original, &corrections).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, Emotion::Happy);
        assert_eq!(rows[1].label, Emotion::Anger);
        assert_eq!(rows[1].text, "밤에 슬펐다");
    }

    #[test]
    fn test_unrecognized_prediction_always_differs() {
        let original = vec![result(
            "그냥 그랬다",
            EmotionLabel::parse("neutral"),
            TimeSlot::Evening,
        )];
        let corrections = vec![Correction {
            emotion: Emotion::Sad,
            time_slot: TimeSlot::Evening,
        }];

        let rows = reconcile(&original, &corrections).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, Emotion::Sad);
    }
}
