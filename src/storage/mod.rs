//! Feedback persistence.
//!
//! Corrected sentence labels are handed to a [`FeedbackSink`]:
//! - Google Sheets (rows appended to a spreadsheet range)
//! - in-memory (default, and for tests)

mod memory;
mod sheets;

pub use memory::MemoryFeedbackSink;
pub use sheets::SheetsFeedbackSink;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::config::{FeedbackBackend, FeedbackConfig};
use crate::diary::FeedbackRow;
use crate::error::AppError;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Storage not configured: {0}")]
    NotConfigured(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Http(_) | StorageError::Status { .. } => {
                AppError::Upstream(err.to_string())
            }
            _ => AppError::Internal(err.to_string()),
        }
    }
}

/// Append-only store for corrected labels
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    /// Append rows in order. Returns the number of rows written.
    async fn append(&self, rows: &[FeedbackRow]) -> Result<usize, StorageError>;

    /// Backend name for status output
    fn name(&self) -> &'static str;
}

/// Build the configured sink.
///
/// An incomplete Sheets configuration falls back to the in-memory sink.
pub fn sink_from_config(config: &FeedbackConfig, timeout: Duration) -> Arc<dyn FeedbackSink> {
    match config.backend {
        FeedbackBackend::Memory => Arc::new(MemoryFeedbackSink::new()),
        FeedbackBackend::Sheets => match SheetsFeedbackSink::from_config(&config.sheets, timeout) {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!(error = %e, "Sheets feedback sink unavailable, keeping feedback in memory");
                Arc::new(MemoryFeedbackSink::new())
            }
        },
    }
}
