//! Mood-congruent music and movie recommendations.
//!
//! Candidates come from external catalogs queried by the genres mapped to
//! the day's dominant emotion; up to [`MAX_RECOMMENDATIONS`] are sampled at
//! random from each pool.

pub mod genres;
mod spotify;
mod tmdb;

pub use genres::{genres_for, EmotionGenres, EMOTION_GENRES};
pub use spotify::SpotifyCatalog;
pub use tmdb::TmdbCatalog;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RecommendConfig;
use crate::diary::Emotion;

/// Items returned per category
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Error type for catalog lookups
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Authentication failed: {0}")]
    Auth(String),
}

/// Outcome of one recommendation lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendations {
    Items { items: Vec<String> },
    /// Lookup failed or found nothing; `message` is shown to the user
    Unavailable { message: String },
}

impl Recommendations {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Recommended items; empty when unavailable
    pub fn items(&self) -> &[String] {
        match self {
            Self::Items { items } => items,
            Self::Unavailable { .. } => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Items { .. })
    }
}

/// A track candidate from the music catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCandidate {
    pub title: String,
    pub artist: String,
}

impl std::fmt::Display for TrackCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// Tracks matching a genre seed
    async fn search_tracks(&self, genre: &str) -> Result<Vec<TrackCandidate>, RecommendError>;
}

#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Movie titles matching any of the genre ids
    async fn discover_movies(&self, genre_ids: &[u32]) -> Result<Vec<String>, RecommendError>;
}

/// Music and movie recommendations for one emotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub emotion: Emotion,
    pub music: Recommendations,
    pub movies: Recommendations,
}

/// Sample up to [`MAX_RECOMMENDATIONS`] distinct candidates.
///
/// An empty pool is reported as unavailable.
pub fn sample_recommendations<R: Rng + ?Sized>(
    candidates: Vec<String>,
    rng: &mut R,
) -> Recommendations {
    let mut pool: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !pool.contains(&candidate) {
            pool.push(candidate);
        }
    }

    if pool.is_empty() {
        return Recommendations::unavailable("No matching titles found");
    }

    let items = pool
        .choose_multiple(rng, MAX_RECOMMENDATIONS)
        .cloned()
        .collect();
    Recommendations::Items { items }
}

/// Queries the configured catalogs and samples their candidates
pub struct Recommender {
    music: Option<Arc<dyn MusicCatalog>>,
    movies: Option<Arc<dyn MovieCatalog>>,
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("music", &self.music.is_some())
            .field("movies", &self.movies.is_some())
            .finish()
    }
}

impl Recommender {
    pub fn new(
        music: Option<Arc<dyn MusicCatalog>>,
        movies: Option<Arc<dyn MovieCatalog>>,
    ) -> Self {
        Self {
            music,
            movies,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Replace the random source (seeded in tests)
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Build catalogs for every service with credentials configured
    pub fn from_config(config: &RecommendConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client with timeout, using defaults");
                Client::new()
            });

        let music: Option<Arc<dyn MusicCatalog>> =
            SpotifyCatalog::from_config(&config.spotify, client.clone())
                .map(|c| Arc::new(c) as Arc<dyn MusicCatalog>);
        let movies: Option<Arc<dyn MovieCatalog>> = TmdbCatalog::from_config(&config.tmdb, client)
            .map(|c| Arc::new(c) as Arc<dyn MovieCatalog>);

        if music.is_none() {
            warn!("Spotify credentials not configured, music recommendations disabled");
        }
        if movies.is_none() {
            warn!("TMDB API key not configured, movie recommendations disabled");
        }

        Self::new(music, movies)
    }

    pub fn has_music(&self) -> bool {
        self.music.is_some()
    }

    pub fn has_movies(&self) -> bool {
        self.movies.is_some()
    }

    fn with_rng_locked<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// Look up music and movies concurrently; each fails independently
    pub async fn recommend(&self, emotion: Emotion) -> RecommendationSet {
        let (music, movies) = tokio::join!(
            self.recommend_music(emotion),
            self.recommend_movies(emotion)
        );
        RecommendationSet {
            emotion,
            music,
            movies,
        }
    }

    pub async fn recommend_music(&self, emotion: Emotion) -> Recommendations {
        let Some(catalog) = &self.music else {
            return Recommendations::unavailable("Music recommendations are not configured");
        };

        let genres = genres_for(emotion).music;
        let genre = self
            .with_rng_locked(|rng| genres.choose(rng).copied())
            .unwrap_or("pop");

        match catalog.search_tracks(genre).await {
            Ok(tracks) => {
                debug!(%emotion, genre, candidates = tracks.len(), "Music candidates fetched");
                let candidates = tracks.iter().map(ToString::to_string).collect();
                self.with_rng_locked(|rng| sample_recommendations(candidates, rng))
            }
            Err(e) => {
                warn!(%emotion, genre, error = %e, "Music lookup failed");
                Recommendations::unavailable(format!("Could not load music recommendations: {e}"))
            }
        }
    }

    pub async fn recommend_movies(&self, emotion: Emotion) -> Recommendations {
        let Some(catalog) = &self.movies else {
            return Recommendations::unavailable("Movie recommendations are not configured");
        };

        let genre_ids = genres_for(emotion).movies;

        match catalog.discover_movies(genre_ids).await {
            Ok(titles) => {
                debug!(%emotion, candidates = titles.len(), "Movie candidates fetched");
                self.with_rng_locked(|rng| sample_recommendations(titles, rng))
            }
            Err(e) => {
                warn!(%emotion, error = %e, "Movie lookup failed");
                Recommendations::unavailable(format!("Could not load movie recommendations: {e}"))
            }
        }
    }
}

/// Turn a non-success response into [`RecommendError::Status`]
pub(crate) async fn ensure_success(response: Response) -> Result<Response, RecommendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RecommendError::Status {
        status: status.as_u16(),
        body,
    })
}
