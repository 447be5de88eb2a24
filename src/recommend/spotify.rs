//! Spotify track search using the client-credentials flow.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ensure_success, MusicCatalog, RecommendError, TrackCandidate};
use crate::config::SpotifyConfig;

/// Tracks requested per search
const SEARCH_LIMIT: u32 = 50;

/// Refresh tokens this long before Spotify expires them
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Option<TrackItem>>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    artists: Vec<ArtistItem>,
}

#[derive(Debug, Deserialize)]
struct ArtistItem {
    #[serde(default)]
    name: Option<String>,
}

impl TrackItem {
    fn into_candidate(self) -> Option<TrackCandidate> {
        let title = self.name.filter(|n| !n.trim().is_empty())?;
        let artist = self
            .artists
            .into_iter()
            .find_map(|a| a.name)
            .unwrap_or_else(|| "Unknown Artist".to_string());
        Some(TrackCandidate { title, artist })
    }
}

pub struct SpotifyCatalog {
    client: Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    market: String,
    token: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for SpotifyCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyCatalog")
            .field("api_url", &self.api_url)
            .field("market", &self.market)
            .finish_non_exhaustive()
    }
}

impl SpotifyCatalog {
    pub fn new(
        client: Client,
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        market: impl Into<String>,
    ) -> Self {
        Self {
            client,
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            market: market.into(),
            token: Mutex::new(None),
        }
    }

    /// `None` unless both client id and secret are set
    pub fn from_config(config: &SpotifyConfig, client: Client) -> Option<Self> {
        let client_id = config.client_id.clone().filter(|s| !s.is_empty())?;
        let client_secret = config.client_secret.clone().filter(|s| !s.is_empty())?;
        Some(Self::new(
            client,
            config.accounts_url.clone(),
            config.api_url.clone(),
            client_id,
            client_secret,
            config.market.clone(),
        ))
    }

    async fn access_token(&self) -> Result<String, RecommendError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let response = ensure_success(response).await.map_err(|e| match e {
            RecommendError::Status { status, body } => {
                RecommendError::Auth(format!("token request returned {status}: {body}"))
            }
            other => other,
        })?;

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        debug!(expires_in = token.expires_in, "Spotify access token refreshed");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }
}

#[async_trait]
impl MusicCatalog for SpotifyCatalog {
    async fn search_tracks(&self, genre: &str) -> Result<Vec<TrackCandidate>, RecommendError> {
        let token = self.access_token().await?;
        let query = format!("genre:\"{genre}\"");
        let limit = SEARCH_LIMIT.to_string();

        let response = self
            .client
            .get(format!("{}/v1/search", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("type", "track"),
                ("limit", limit.as_str()),
                ("market", self.market.as_str()),
            ])
            .send()
            .await?;

        let page: SearchResponse = ensure_success(response).await?.json().await?;
        let tracks = page
            .tracks
            .map(|t| t.items)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(TrackItem::into_candidate)
            .collect();
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog(server: &MockServer) -> SpotifyCatalog {
        SpotifyCatalog::new(
            Client::new(),
            server.uri(),
            server.uri(),
            "id",
            "secret",
            "KR",
        )
    }

    async fn mount_token(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_search_parses_tracks() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "genre:\"k-pop\""))
            .and(query_param("type", "track"))
            .and(query_param("market", "KR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tracks": {"items": [
                    {"name": "Spring Day", "artists": [{"name": "BTS"}]},
                    {"name": "Nameless Artist", "artists": []},
                    {"name": null, "artists": [{"name": "Ghost"}]},
                    null
                ]}
            })))
            .mount(&server)
            .await;

        let tracks = catalog(&server).search_tracks("k-pop").await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].to_string(), "Spring Day - BTS");
        assert_eq!(tracks[1].artist, "Unknown Artist");
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"tracks": {"items": []}})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let catalog = catalog(&server);
        assert!(catalog.search_tracks("jazz").await.unwrap().is_empty());
        assert!(catalog.search_tracks("jazz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_token_rejected_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let err = catalog(&server).search_tracks("rock").await.unwrap_err();
        assert!(matches!(err, RecommendError::Auth(_)));
    }

    #[tokio::test]
    async fn test_missing_tracks_object_is_empty() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        assert!(catalog(&server).search_tracks("edm").await.unwrap().is_empty());
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let mut config = SpotifyConfig::default();
        assert!(SpotifyCatalog::from_config(&config, Client::new()).is_none());

        config.client_id = Some("id".to_string());
        assert!(SpotifyCatalog::from_config(&config, Client::new()).is_none());

        config.client_secret = Some("secret".to_string());
        assert!(SpotifyCatalog::from_config(&config, Client::new()).is_some());
    }
}
