//! In-process feedback sink.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::{FeedbackSink, StorageError};
use crate::diary::FeedbackRow;

/// Keeps appended rows in memory for the process lifetime
#[derive(Debug, Default)]
pub struct MemoryFeedbackSink {
    rows: Mutex<Vec<FeedbackRow>>,
}

impl MemoryFeedbackSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far
    pub fn rows(&self) -> Result<Vec<FeedbackRow>, StorageError> {
        self.rows
            .lock()
            .map(|rows| rows.clone())
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }
}

#[async_trait]
impl FeedbackSink for MemoryFeedbackSink {
    async fn append(&self, rows: &[FeedbackRow]) -> Result<usize, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut stored = self
            .rows
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        stored.extend_from_slice(rows);

        debug!(appended = rows.len(), total = stored.len(), "Feedback rows stored");
        Ok(rows.len())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
