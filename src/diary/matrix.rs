//! Time slot × emotion count table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Emotion, EmotionLabel, TimeSlot};

/// Nested wire form: `{ "morning": { "happy": 1, ... }, ... }`
type CountTable = BTreeMap<TimeSlot, BTreeMap<Emotion, u32>>;

/// Emotion counts per time slot for one diary entry.
///
/// Every cell starts at zero. The sum over all cells equals the number of
/// sentences whose predicted label was a recognized [`Emotion`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CountTable", from = "CountTable")]
pub struct ScoreMatrix {
    cells: [[u32; Emotion::COUNT]; TimeSlot::COUNT],
}

impl ScoreMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, slot: TimeSlot, emotion: Emotion) {
        self.cells[slot.index()][emotion.index()] += 1;
    }

    /// Count a classifier label. Unrecognized labels are skipped.
    ///
    /// Returns whether the label was counted.
    pub fn record(&mut self, slot: TimeSlot, label: &EmotionLabel) -> bool {
        match label.emotion() {
            Some(emotion) => {
                self.increment(slot, emotion);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, slot: TimeSlot, emotion: Emotion) -> u32 {
        self.cells[slot.index()][emotion.index()]
    }

    /// Count for one emotion summed over all time slots
    pub fn emotion_total(&self, emotion: Emotion) -> u32 {
        self.cells.iter().map(|row| row[emotion.index()]).sum()
    }

    /// Sum over all cells
    pub fn total(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Emotion with the highest total across all time slots.
    ///
    /// Ties go to the emotion that comes first in [`Emotion::ALL`]. Returns
    /// `None` when nothing was counted; callers skip recommendations then.
    pub fn dominant_emotion(&self) -> Option<Emotion> {
        let mut best: Option<(Emotion, u32)> = None;

        for emotion in Emotion::ALL {
            let total = self.emotion_total(emotion);
            if total == 0 {
                continue;
            }
            match best {
                Some((_, max)) if total <= max => {}
                _ => best = Some((emotion, total)),
            }
        }

        best.map(|(emotion, _)| emotion)
    }
}

impl From<ScoreMatrix> for CountTable {
    fn from(matrix: ScoreMatrix) -> Self {
        TimeSlot::ALL
            .into_iter()
            .map(|slot| {
                let row = Emotion::ALL
                    .into_iter()
                    .map(|emotion| (emotion, matrix.get(slot, emotion)))
                    .collect();
                (slot, row)
            })
            .collect()
    }
}

impl From<CountTable> for ScoreMatrix {
    fn from(table: CountTable) -> Self {
        let mut matrix = ScoreMatrix::new();
        for (slot, row) in table {
            for (emotion, count) in row {
                matrix.cells[slot.index()][emotion.index()] = count;
            }
        }
        matrix
    }
}
