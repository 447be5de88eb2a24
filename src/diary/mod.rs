//! Diary emotion analysis.
//!
//! A diary entry is split into sentences, each sentence is bucketed into a
//! time of day by keyword and labelled with an emotion by the loaded text
//! classifier. Counts are kept per time slot and reduced to a single
//! dominant emotion for the day.

pub mod analyzer;
pub mod feedback;
pub mod keywords;
pub mod matrix;
pub mod sample;

pub use analyzer::{split_sentences, DiaryAnalysis, DiaryAnalyzer, EmotionPredictor};
pub use feedback::{reconcile, Correction, FeedbackError, FeedbackRow};
pub use keywords::{SlotKeywords, TimeSlotClassifier, TIME_SLOT_KEYWORDS};
pub use matrix::ScoreMatrix;
pub use sample::generate_sample_diary;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed emotion label set, in canonical order.
///
/// The order matters: dominant emotion ties are resolved in favour of the
/// emotion listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Love,
    Sad,
    Anger,
    Exhausted,
    Surprise,
}

impl Emotion {
    pub const COUNT: usize = 6;

    /// All emotions in canonical order
    pub const ALL: [Emotion; Emotion::COUNT] = [
        Emotion::Happy,
        Emotion::Love,
        Emotion::Sad,
        Emotion::Anger,
        Emotion::Exhausted,
        Emotion::Surprise,
    ];

    /// Wire identifier (`snake_case`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Love => "love",
            Self::Sad => "sad",
            Self::Anger => "anger",
            Self::Exhausted => "exhausted",
            Self::Surprise => "surprise",
        }
    }

    /// Korean label used by the diary UI and by Korean-trained models
    pub fn korean_label(self) -> &'static str {
        match self {
            Self::Happy => "기쁨",
            Self::Love => "사랑",
            Self::Sad => "슬픔",
            Self::Anger => "분노",
            Self::Exhausted => "피곤",
            Self::Surprise => "놀람",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Parse a classifier label.
    ///
    /// Accepts the wire identifier case-insensitively or the Korean label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(label) || e.korean_label() == label)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse time-of-day bucket assigned to each sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Midday,
    Evening,
}

impl TimeSlot {
    pub const COUNT: usize = 3;

    /// All slots in keyword priority order
    pub const ALL: [TimeSlot; TimeSlot::COUNT] =
        [TimeSlot::Morning, TimeSlot::Midday, TimeSlot::Evening];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Midday => "midday",
            Self::Evening => "evening",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label emitted by the emotion classifier.
///
/// Models can drift and emit labels outside the fixed set. Those are kept
/// verbatim for display and feedback but never counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmotionLabel {
    Known(Emotion),
    Unrecognized(String),
}

impl EmotionLabel {
    pub fn parse(label: &str) -> Self {
        match Emotion::from_label(label) {
            Some(emotion) => Self::Known(emotion),
            None => Self::Unrecognized(label.to_string()),
        }
    }

    /// The recognized emotion, if any
    pub fn emotion(&self) -> Option<Emotion> {
        match self {
            Self::Known(emotion) => Some(*emotion),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(emotion) => emotion.as_str(),
            Self::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<Emotion> for EmotionLabel {
    fn from(emotion: Emotion) -> Self {
        Self::Known(emotion)
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EmotionLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EmotionLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Self::parse(&label))
    }
}

/// Per-sentence analysis output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Sentence text (trimmed, without the terminal punctuation)
    pub text: String,
    /// Predicted emotion label
    pub emotion: EmotionLabel,
    /// Assigned time slot
    pub time_slot: TimeSlot,
}
