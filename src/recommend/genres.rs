//! Emotion to genre tables used to query the catalogs.

use crate::diary::Emotion;

/// Search genres for one emotion
#[derive(Debug, Clone, Copy)]
pub struct EmotionGenres {
    pub emotion: Emotion,
    /// Music catalog genre seeds
    pub music: &'static [&'static str],
    /// TMDB movie genre ids
    pub movies: &'static [u32],
}

pub const EMOTION_GENRES: &[EmotionGenres] = &[
    EmotionGenres {
        emotion: Emotion::Happy,
        music: &["k-pop", "dance", "pop"],
        movies: &[35, 16],
    },
    EmotionGenres {
        emotion: Emotion::Love,
        music: &["romance", "r-n-b", "acoustic"],
        movies: &[10749],
    },
    EmotionGenres {
        emotion: Emotion::Sad,
        music: &["sad", "piano", "indie"],
        movies: &[18],
    },
    EmotionGenres {
        emotion: Emotion::Anger,
        music: &["rock", "metal", "hip-hop"],
        movies: &[28, 53],
    },
    EmotionGenres {
        emotion: Emotion::Exhausted,
        music: &["chill", "ambient", "jazz"],
        movies: &[10751, 14],
    },
    EmotionGenres {
        emotion: Emotion::Surprise,
        music: &["edm", "electronic", "funk"],
        movies: &[9648, 878],
    },
];

/// Genre table entry for an emotion
pub fn genres_for(emotion: Emotion) -> &'static EmotionGenres {
    EMOTION_GENRES
        .iter()
        .find(|g| g.emotion == emotion)
        .unwrap_or(&EMOTION_GENRES[0])
}
