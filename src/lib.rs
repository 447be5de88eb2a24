//! Mood Diary
//!
//! Classifies the emotional tone of diary entries per time of day and
//! suggests mood-congruent music and movies.
//!
//! Each sentence is assigned a time slot by keyword lookup and an emotion by
//! a pre-trained TF-IDF + linear classifier. Counts are aggregated into a
//! time slot × emotion matrix whose dominant emotion drives recommendations.

pub mod config;
pub mod diary;
pub mod error;
pub mod inference;
pub mod recommend;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use diary::{DiaryAnalysis, DiaryAnalyzer, Emotion, EmotionLabel, ScoreMatrix, TimeSlot};
pub use error::{AppError, Result};
pub use inference::EmotionClassifier;
