//! Shared types for the diary API.
//!
//! These types are used across the application for request/response handling.

pub mod diary;
pub mod recommend;

use serde::{Deserialize, Serialize};

pub use diary::*;
pub use recommend::*;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(default)]
    pub classifier_loaded: bool,
    #[serde(default)]
    pub active_analyses: usize,
    #[serde(default)]
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Configuration response (subset of config safe to expose)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub model: ModelInfo,
    pub server: ServerInfo,
    pub session_ttl_secs: u64,
    pub recommend: RecommendInfo,
    pub feedback: FeedbackInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub backend: String,
    pub vectorizer_path: String,
    pub classifier_path: String,
    pub loaded: bool,
    pub n_features: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendInfo {
    pub music_enabled: bool,
    pub movies_enabled: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackInfo {
    /// Active sink name (may differ from the configured backend on fallback)
    pub sink: String,
    pub configured_backend: String,
}
