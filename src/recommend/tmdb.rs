//! TMDB movie discovery by genre.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ensure_success, MovieCatalog, RecommendError};
use crate::config::TmdbConfig;

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<MovieItem>,
}

#[derive(Debug, Deserialize)]
struct MovieItem {
    #[serde(default)]
    title: Option<String>,
}

pub struct TmdbCatalog {
    client: Client,
    api_url: String,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for TmdbCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbCatalog")
            .field("api_url", &self.api_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbCatalog {
    pub fn new(
        client: Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &TmdbConfig, client: Client) -> Option<Self> {
        let api_key = config.api_key.clone().filter(|k| !k.is_empty())?;
        Some(Self::new(
            client,
            config.api_url.clone(),
            api_key,
            config.language.clone(),
        ))
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn discover_movies(&self, genre_ids: &[u32]) -> Result<Vec<String>, RecommendError> {
        // "|" means any of the genres
        let genres = genre_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("|");

        let response = self
            .client
            .get(format!("{}/3/discover/movie", self.api_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("with_genres", genres.as_str()),
                ("language", self.language.as_str()),
                ("sort_by", "popularity.desc"),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        let page: DiscoverResponse = ensure_success(response).await?.json().await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(|m| m.title)
            .filter(|t| !t.trim().is_empty())
            .collect())
    }
}
