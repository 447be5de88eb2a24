//! Short-lived store of analyses awaiting feedback.
//!
//! Each analysis gets an id that the client passes back with corrections or
//! a recommendation request. Entries expire after a period of inactivity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::diary::DiaryAnalysis;

/// Interval for session cleanup checks (60 seconds)
const CLEANUP_INTERVAL_SECS: u64 = 60;

/// A stored analysis of one diary entry
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub id: Uuid,
    /// Diary text as submitted
    pub text: String,
    pub analysis: DiaryAnalysis,
    /// Wall-clock time of the analysis, reported to clients
    pub analyzed_at: DateTime<Utc>,
    pub created_at: Instant,
    pub last_activity: Instant,
}

impl AnalysisSession {
    fn new(text: String, analysis: DiaryAnalysis) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            text,
            analysis,
            analyzed_at: Utc::now(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn age_seconds(&self) -> u64 {
        self.created_at.elapsed().as_secs()
    }

    fn is_timed_out(&self, ttl: Duration) -> bool {
        self.last_activity.elapsed() >= ttl
    }
}

/// Manager for all stored analyses
#[derive(Debug)]
pub struct AnalysisSessionManager {
    sessions: HashMap<Uuid, AnalysisSession>,
    ttl: Duration,
}

impl AnalysisSessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            ttl,
        }
    }

    /// Store an analysis
    pub fn insert(&mut self, text: String, analysis: DiaryAnalysis) -> &AnalysisSession {
        let session = AnalysisSession::new(text, analysis);
        self.sessions.entry(session.id).or_insert(session)
    }

    /// Fetch a live session and refresh its activity time
    pub fn touch(&mut self, id: &Uuid) -> Option<&AnalysisSession> {
        let ttl = self.ttl;
        let expired = self.sessions.get(id)?.is_timed_out(ttl);
        if expired {
            self.sessions.remove(id);
            return None;
        }

        let session = self.sessions.get_mut(id)?;
        session.last_activity = Instant::now();
        Some(session)
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<AnalysisSession> {
        self.sessions.remove(id)
    }

    /// Drop sessions idle for at least the TTL
    pub fn cleanup_timed_out(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.sessions.len();
        self.sessions.retain(|id, session| {
            let keep = !session.is_timed_out(ttl);
            if !keep {
                info!(analysis_id = %id, "Cleaned up expired analysis");
            }
            keep
        });
        before - self.sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Type alias for shared session manager
pub type SharedSessionManager = Arc<RwLock<AnalysisSessionManager>>;

/// Periodically evict expired analyses
pub fn spawn_session_cleanup_task(manager: SharedSessionManager) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));

        loop {
            interval.tick().await;

            let cleaned = {
                let mut mgr = manager.write().await;
                mgr.cleanup_timed_out()
            };

            if cleaned > 0 {
                info!(count = cleaned, "Cleaned up expired analyses");
            }
        }
    });

    info!(
        interval_secs = CLEANUP_INTERVAL_SECS,
        "Started analysis session cleanup task"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_touch() {
        let mut manager = AnalysisSessionManager::new(Duration::from_secs(60));
        let id = manager
            .insert("오늘 아침은 좋았다.".to_string(), DiaryAnalysis::default())
            .id;

        assert_eq!(manager.session_count(), 1);
        let session = manager.touch(&id).unwrap();
        assert_eq!(session.text, "오늘 아침은 좋았다.");
        assert!(manager.touch(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut manager = AnalysisSessionManager::new(Duration::ZERO);
        let id = manager.insert("text".to_string(), DiaryAnalysis::default()).id;

        assert!(manager.touch(&id).is_none());
        assert_eq!(manager.session_count(), 0);
    }

    #[test]
    fn test_cleanup_timed_out() {
        let mut expiring = AnalysisSessionManager::new(Duration::ZERO);
        expiring.insert("a".to_string(), DiaryAnalysis::default());
        expiring.insert("b".to_string(), DiaryAnalysis::default());
        assert_eq!(expiring.cleanup_timed_out(), 2);
        assert_eq!(expiring.session_count(), 0);

        let mut live = AnalysisSessionManager::new(Duration::from_secs(3600));
        live.insert("c".to_string(), DiaryAnalysis::default());
        assert_eq!(live.cleanup_timed_out(), 0);
        assert_eq!(live.session_count(), 1);
    }

    #[test]
    fn test_remove() {
        let mut manager = AnalysisSessionManager::new(Duration::from_secs(60));
        let id = manager.insert("text".to_string(), DiaryAnalysis::default()).id;

        assert!(manager.remove(&id).is_some());
        assert!(manager.remove(&id).is_none());
    }
}
