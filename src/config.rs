use config::{Config, ConfigError, Environment};
use serde::Deserializer;
use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use crate::diary::Emotion;

/// Application configuration loaded from environment variables.
///
/// All settings can be configured via environment variables with the `DIARY_` prefix.
/// For example: `DIARY_SERVER__PORT=8097`, `DIARY_MODEL__BACKEND=onnx`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Classifier artifact configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Analysis session retention
    #[serde(default)]
    pub session: SessionConfig,

    /// Music and movie recommendation services
    #[serde(default)]
    pub recommend: RecommendConfig,

    /// Feedback persistence
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Which classifier artifact format to load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// JSON linear weights (no native runtime needed)
    #[default]
    Linear,
    /// ONNX graph, requires the `onnx` feature
    Onnx,
}

impl std::fmt::Display for ClassifierBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Onnx => write!(f, "onnx"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the fitted TF-IDF vectorizer (JSON)
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer_path: PathBuf,

    /// Path to the classifier (JSON weights or ONNX graph)
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,

    #[serde(default)]
    pub backend: ClassifierBackend,

    /// Class labels by output index (ONNX backend only).
    /// Accepts a list or a comma-separated string.
    #[serde(default = "default_labels", deserialize_with = "deserialize_labels")]
    pub labels: Vec<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vectorizer_path: default_vectorizer_path(),
            classifier_path: default_classifier_path(),
            backend: ClassifierBackend::default(),
            labels: default_labels(),
        }
    }
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from("models/vectorizer.json")
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("models/classifier.json")
}

fn default_labels() -> Vec<String> {
    Emotion::ALL.iter().map(|e| e.as_str().to_string()).collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabelList {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let labels = match LabelList::deserialize(deserializer)? {
        LabelList::List(labels) => labels,
        LabelList::Csv(raw) => raw.split(',').map(str::to_string).collect(),
    };

    Ok(labels
        .into_iter()
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8097
}

impl ServerConfig {
    /// Returns the socket address for binding the server
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Seconds of inactivity before a stored analysis is dropped
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_ttl() -> u64 {
    1800
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendConfig {
    /// Request timeout for catalog lookups
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub spotify: SpotifyConfig,

    #[serde(default)]
    pub tmdb: TmdbConfig,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            spotify: SpotifyConfig::default(),
            tmdb: TmdbConfig::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyConfig {
    /// Client credentials; music lookups are disabled without them
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_spotify_accounts_url")]
    pub accounts_url: String,

    #[serde(default = "default_spotify_api_url")]
    pub api_url: String,

    /// Market code passed to track search
    #[serde(default = "default_market")]
    pub market: String,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            accounts_url: default_spotify_accounts_url(),
            api_url: default_spotify_api_url(),
            market: default_market(),
        }
    }
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com".to_string()
}

fn default_market() -> String {
    "KR".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
    /// API key; movie lookups are disabled without it
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_tmdb_api_url")]
    pub api_url: String,

    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_tmdb_api_url(),
            language: default_language(),
        }
    }
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_language() -> String {
    "ko-KR".to_string()
}

/// Where corrected labels are persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackBackend {
    /// Keep rows in process memory
    #[default]
    Memory,
    /// Append rows to a Google Sheets spreadsheet
    Sheets,
}

impl std::fmt::Display for FeedbackBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sheets => write!(f, "sheets"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default)]
    pub backend: FeedbackBackend,

    #[serde(default)]
    pub sheets: SheetsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// A1 range rows are appended after
    #[serde(default = "default_sheet_range")]
    pub range: String,

    /// OAuth bearer token with spreadsheet write scope
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_sheets_api_url")]
    pub api_url: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: default_sheet_range(),
            access_token: None,
            api_url: default_sheets_api_url(),
        }
    }
}

fn default_sheet_range() -> String {
    "Sheet1!A:B".to_string()
}

fn default_sheets_api_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables should be prefixed with `DIARY_` and use
    /// double underscores for nested values:
    /// - `DIARY_MODEL__VECTORIZER_PATH` -> model.vectorizer_path
    /// - `DIARY_MODEL__LABELS=happy,love,sad` -> model.labels
    /// - `DIARY_RECOMMEND__TMDB__API_KEY` -> recommend.tmdb.api_key
    /// - `DIARY_SERVER__PORT` -> server.port
    ///
    /// Values are kept as raw strings so numeric-looking keys and tokens
    /// are not rewritten.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(environment())
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("DIARY")
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.model.vectorizer_path, PathBuf::from("models/vectorizer.json"));
        assert_eq!(config.model.backend, ClassifierBackend::Linear);
        assert_eq!(config.model.labels.len(), 6);
        assert_eq!(config.model.labels[0], "happy");
        assert_eq!(config.server.port, 8097);
        assert_eq!(config.session.ttl_secs, 1800);
        assert_eq!(config.recommend.timeout_secs, 10);
        assert!(config.recommend.spotify.client_id.is_none());
        assert_eq!(config.recommend.tmdb.language, "ko-KR");
        assert_eq!(config.feedback.backend, FeedbackBackend::Memory);
        assert_eq!(config.feedback.sheets.range, "Sheet1!A:B");
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        let addr = server.socket_addr().unwrap();
        assert_eq!(addr.port(), 8097);
    }

    #[test]
    fn test_invalid_socket_addr() {
        let server = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_backend_deserialize() {
        let backend: ClassifierBackend = serde_json::from_str(r#""onnx""#).unwrap();
        assert_eq!(backend, ClassifierBackend::Onnx);
        assert_eq!(backend.to_string(), "onnx");

        let backend: FeedbackBackend = serde_json::from_str(r#""sheets""#).unwrap();
        assert_eq!(backend, FeedbackBackend::Sheets);
    }

    fn load_from(vars: &[(&str, &str)]) -> AppConfig {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        AppConfig::from_environment(environment().source(Some(map))).unwrap()
    }

    #[test]
    fn test_load_nested_env_vars() {
        let config = load_from(&[
            ("DIARY_SERVER__PORT", "9000"),
            ("DIARY_SESSION__TTL_SECS", "60"),
            ("DIARY_MODEL__VECTORIZER_PATH", "/srv/diary/vectorizer.json"),
            ("DIARY_MODEL__BACKEND", "onnx"),
            ("DIARY_FEEDBACK__BACKEND", "sheets"),
        ]);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.session.ttl_secs, 60);
        assert_eq!(
            config.model.vectorizer_path,
            PathBuf::from("/srv/diary/vectorizer.json")
        );
        assert_eq!(config.model.backend, ClassifierBackend::Onnx);
        assert_eq!(config.feedback.backend, FeedbackBackend::Sheets);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_labels_from_comma_separated_var() {
        let config = load_from(&[("DIARY_MODEL__LABELS", "기쁨, 사랑,슬픔,")]);
        assert_eq!(config.model.labels, vec!["기쁨", "사랑", "슬픔"]);
    }

    #[test]
    fn test_load_keeps_numeric_looking_credentials() {
        let config = load_from(&[
            ("DIARY_RECOMMEND__TMDB__API_KEY", "0042"),
            ("DIARY_RECOMMEND__SPOTIFY__CLIENT_ID", "1e10"),
            ("DIARY_RECOMMEND__SPOTIFY__CLIENT_SECRET", "true"),
            ("DIARY_FEEDBACK__SHEETS__SPREADSHEET_ID", "000123"),
        ]);

        assert_eq!(config.recommend.tmdb.api_key.as_deref(), Some("0042"));
        assert_eq!(config.recommend.spotify.client_id.as_deref(), Some("1e10"));
        assert_eq!(config.recommend.spotify.client_secret.as_deref(), Some("true"));
        assert_eq!(config.feedback.sheets.spreadsheet_id.as_deref(), Some("000123"));
    }

    #[test]
    fn test_load_ignores_vars_without_prefix() {
        let config = load_from(&[
            ("SERVER__PORT", "9000"),
            ("OTHER_SERVER__PORT", "9001"),
            ("DIARYSERVER__PORT", "9002"),
        ]);

        assert_eq!(config.server.port, 8097);
        assert_eq!(config.model.labels, default_labels());
    }
}
