//! Time-of-day keyword tables.
//!
//! Sentences are matched against these tables in priority order. Matching
//! is plain substring containment, so a keyword also matches inside longer
//! words (`밤` matches `밤하늘`).

use super::TimeSlot;

/// Keywords associated with one time slot
#[derive(Debug, Clone, Copy)]
pub struct SlotKeywords {
    pub slot: TimeSlot,
    pub keywords: &'static [&'static str],
}

pub const MORNING_KEYWORDS: SlotKeywords = SlotKeywords {
    slot: TimeSlot::Morning,
    keywords: &["아침", "오전", "새벽", "기상", "출근", "등교"],
};

pub const MIDDAY_KEYWORDS: SlotKeywords = SlotKeywords {
    slot: TimeSlot::Midday,
    keywords: &["점심", "정오", "오후", "낮"],
};

pub const EVENING_KEYWORDS: SlotKeywords = SlotKeywords {
    slot: TimeSlot::Evening,
    keywords: &["저녁", "밤", "퇴근", "하교", "자기 전", "잠들"],
};

/// All keyword tables, first match wins
pub const TIME_SLOT_KEYWORDS: &[SlotKeywords] =
    &[MORNING_KEYWORDS, MIDDAY_KEYWORDS, EVENING_KEYWORDS];

/// Assigns a [`TimeSlot`] to a sentence by keyword lookup
#[derive(Debug, Clone)]
pub struct TimeSlotClassifier {
    table: &'static [SlotKeywords],
    fallback: TimeSlot,
}

impl Default for TimeSlotClassifier {
    fn default() -> Self {
        Self {
            table: TIME_SLOT_KEYWORDS,
            fallback: TimeSlot::Evening,
        }
    }
}

impl TimeSlotClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a sentence. Total over all inputs; no match yields Evening.
    pub fn classify(&self, sentence: &str) -> TimeSlot {
        self.table
            .iter()
            .find(|entry| entry.keywords.iter().any(|kw| sentence.contains(kw)))
            .map(|entry| entry.slot)
            .unwrap_or(self.fallback)
    }

    /// Slot assigned when no keyword matches
    pub fn fallback(&self) -> TimeSlot {
        self.fallback
    }

    /// Keywords configured for a slot
    pub fn keywords_for(&self, slot: TimeSlot) -> &'static [&'static str] {
        self.table
            .iter()
            .find(|entry| entry.slot == slot)
            .map(|entry| entry.keywords)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_per_slot() {
        let classifier = TimeSlotClassifier::new();
        assert_eq!(classifier.classify("아침 일찍 일어났다"), TimeSlot::Morning);
        assert_eq!(
            classifier.classify("점심에 친구를 만나서 즐거웠다"),
            TimeSlot::Midday
        );
        assert_eq!(classifier.classify("밤에 조금 슬펐다"), TimeSlot::Evening);
    }

    #[test]
    fn test_empty_and_unmatched_fall_back_to_evening() {
        let classifier = TimeSlotClassifier::new();
        assert_eq!(classifier.classify(""), TimeSlot::Evening);
        assert_eq!(classifier.classify("그냥 그런 하루였다"), TimeSlot::Evening);
        assert_eq!(classifier.classify("no keywords here"), TimeSlot::Evening);
    }

    #[test]
    fn test_morning_wins_over_evening() {
        let classifier = TimeSlotClassifier::new();
        assert_eq!(
            classifier.classify("밤새 못 자고 아침을 맞았다"),
            TimeSlot::Morning
        );
    }

    #[test]
    fn test_midday_wins_over_evening() {
        let classifier = TimeSlotClassifier::new();
        assert_eq!(classifier.classify("오후부터 밤까지 일했다"), TimeSlot::Midday);
    }

    #[test]
    fn test_substring_match_inside_words() {
        let classifier = TimeSlotClassifier::new();
        assert_eq!(classifier.classify("밤하늘이 예뻤다"), TimeSlot::Evening);
        assert_eq!(classifier.classify("낮잠을 잤다"), TimeSlot::Midday);
    }

    #[test]
    fn test_keywords_for() {
        let classifier = TimeSlotClassifier::new();
        assert!(classifier.keywords_for(TimeSlot::Morning).contains(&"아침"));
        assert!(classifier.keywords_for(TimeSlot::Evening).contains(&"밤"));
    }

    #[test]
    fn test_priority_order() {
        let slots: Vec<TimeSlot> = TIME_SLOT_KEYWORDS.iter().map(|e| e.slot).collect();
        assert_eq!(slots, TimeSlot::ALL.to_vec());
    }
}
