//! Sentence segmentation and per-sentence classification.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AnalysisResult, Emotion, EmotionLabel, ScoreMatrix, TimeSlotClassifier};
use crate::inference::InferenceError;

/// Predicts an emotion label for a single sentence.
///
/// Implemented by the artifact-backed classifier; tests plug in fakes.
pub trait EmotionPredictor: Send + Sync {
    fn predict(&self, sentence: &str) -> Result<EmotionLabel, InferenceError>;
}

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| Regex::new(r"[.?!]").expect("valid sentence boundary pattern"))
}

/// Split diary text into trimmed, non-empty sentences in diary order
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_boundary()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Output of one analysis call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryAnalysis {
    pub matrix: ScoreMatrix,
    pub results: Vec<AnalysisResult>,
}

impl DiaryAnalysis {
    pub fn dominant_emotion(&self) -> Option<Emotion> {
        self.matrix.dominant_emotion()
    }

    /// Sentences whose label fell outside the fixed emotion set
    pub fn unrecognized_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| !r.emotion.is_recognized())
            .count()
    }
}

/// Drives time slot and emotion classification over a diary entry
pub struct DiaryAnalyzer {
    time_slots: TimeSlotClassifier,
    emotions: Arc<dyn EmotionPredictor>,
}

impl std::fmt::Debug for DiaryAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiaryAnalyzer")
            .field("time_slots", &self.time_slots)
            .finish_non_exhaustive()
    }
}

impl DiaryAnalyzer {
    pub fn new(emotions: Arc<dyn EmotionPredictor>) -> Self {
        Self {
            time_slots: TimeSlotClassifier::default(),
            emotions,
        }
    }

    pub fn with_time_slots(mut self, time_slots: TimeSlotClassifier) -> Self {
        self.time_slots = time_slots;
        self
    }

    /// Analyze a diary entry.
    ///
    /// Text without any sentence yields an all-zero matrix and no results.
    pub fn analyze(&self, text: &str) -> Result<DiaryAnalysis, InferenceError> {
        let mut analysis = DiaryAnalysis::default();

        for sentence in split_sentences(text) {
            let time_slot = self.time_slots.classify(sentence);
            let emotion = self.emotions.predict(sentence)?;

            if !analysis.matrix.record(time_slot, &emotion) {
                warn!(label = %emotion, "Classifier returned an unrecognized label");
            }

            debug!(%time_slot, %emotion, sentence, "Sentence classified");

            analysis.results.push(AnalysisResult {
                text: sentence.to_string(),
                emotion,
                time_slot,
            });
        }

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::TimeSlot;

    /// Keyword-driven stand-in for the trained model
    struct FakePredictor;

    impl EmotionPredictor for FakePredictor {
        fn predict(&self, sentence: &str) -> Result<EmotionLabel, InferenceError> {
            let label = if sentence.contains("즐거") {
                "happy"
            } else if sentence.contains("슬펐") {
                "sad"
            } else {
                "neutral"
            };
            Ok(EmotionLabel::parse(label))
        }
    }

    struct FailingPredictor;

    impl EmotionPredictor for FailingPredictor {
        fn predict(&self, _sentence: &str) -> Result<EmotionLabel, InferenceError> {
            Err(InferenceError::Onnx("session closed".to_string()))
        }
    }

    fn analyzer() -> DiaryAnalyzer {
        DiaryAnalyzer::new(Arc::new(FakePredictor))
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("하나. 둘? 셋! 넷");
        assert_eq!(sentences, vec!["하나", "둘", "셋", "넷"]);
    }

    #[test]
    fn test_split_discards_empty_fragments() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   ").is_empty());
        assert!(split_sentences("...?!").is_empty());
        assert_eq!(split_sentences("  끝났다...  정말! "), vec!["끝났다", "정말"]);
    }

    #[test]
    fn test_split_preserves_order() {
        let text = "first one. second one? third one!";
        let sentences = split_sentences(text);

        let mut cursor = 0;
        for sentence in &sentences {
            let pos = text[cursor..].find(sentence).unwrap();
            cursor += pos + sentence.len();
        }
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn test_analyze_three_sentence_diary() {
        let analysis = analyzer()
            .analyze("아침 일찍 일어났다. 점심에 친구를 만나서 즐거웠다. 밤에 조금 슬펐다.")
            .unwrap();

        assert_eq!(analysis.results.len(), 3);
        let slots: Vec<TimeSlot> = analysis.results.iter().map(|r| r.time_slot).collect();
        assert_eq!(
            slots,
            vec![TimeSlot::Morning, TimeSlot::Midday, TimeSlot::Evening]
        );
        assert_eq!(analysis.results[0].text, "아침 일찍 일어났다");
        assert_eq!(analysis.results[2].text, "밤에 조금 슬펐다");
    }

    #[test]
    fn test_unrecognized_labels_kept_but_not_counted() {
        let analysis = analyzer()
            .analyze("아침 일찍 일어났다. 점심에 친구를 만나서 즐거웠다. 밤에 조금 슬펐다.")
            .unwrap();

        assert_eq!(
            analysis.results[0].emotion,
            EmotionLabel::Unrecognized("neutral".to_string())
        );
        assert_eq!(analysis.unrecognized_count(), 1);

        let recognized = analysis
            .results
            .iter()
            .filter(|r| r.emotion.is_recognized())
            .count() as u32;
        assert_eq!(analysis.matrix.total(), recognized);
        assert_eq!(analysis.matrix.get(TimeSlot::Midday, Emotion::Happy), 1);
        assert_eq!(analysis.matrix.get(TimeSlot::Evening, Emotion::Sad), 1);
    }

    #[test]
    fn test_dominant_from_analysis() {
        let analysis = analyzer()
            .analyze("점심에 친구를 만나서 즐거웠다. 밤에 조금 슬펐다.")
            .unwrap();
        // Happy and Sad tie at one each; Happy comes first
        assert_eq!(analysis.dominant_emotion(), Some(Emotion::Happy));
    }

    #[test]
    fn test_analyze_empty_input() {
        let analysis = analyzer().analyze("").unwrap();
        assert!(analysis.results.is_empty());
        assert!(analysis.matrix.is_empty());
        assert_eq!(analysis.dominant_emotion(), None);
    }

    #[test]
    fn test_analyze_deterministic() {
        let text = "오전에 회의를 했다. 저녁에 즐거웠다.";
        let a = analyzer().analyze(text).unwrap();
        let b = analyzer().analyze(text).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predictor_error_propagates() {
        let analyzer = DiaryAnalyzer::new(Arc::new(FailingPredictor));
        assert!(analyzer.analyze("아침이다.").is_err());
        // No sentences means the predictor is never called
        assert!(analyzer.analyze("").is_ok());
    }
}
