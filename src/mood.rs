//! Theme interpretation: free-text theme (and optionally a dominant color)
//! to a mood tag plus hashtags.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Color;
use crate::error::FeedError;

mod keywords;

use keywords::{color_mood, hashtags, keyword_mood, DEFAULT_MOODS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    // keyword moods
    Romantic,
    Adventurous,
    Chill,
    Mysterious,
    Playful,
    Artistic,
    Energetic,
    // color moods
    Nature,
    Summer,
    Floral,
    Calm,
    Cozy,
    // defaults
    Aesthetic,
    Dreamy,
    Vintage,
    Modern,
    Bold,
}

impl Mood {
    pub fn tag(self) -> &'static str {
        match self {
            Mood::Romantic => "romantic",
            Mood::Adventurous => "adventurous",
            Mood::Chill => "chill",
            Mood::Mysterious => "mysterious",
            Mood::Playful => "playful",
            Mood::Artistic => "artistic",
            Mood::Energetic => "energetic",
            Mood::Nature => "nature",
            Mood::Summer => "summer",
            Mood::Floral => "floral",
            Mood::Calm => "calm",
            Mood::Cozy => "cozy",
            Mood::Aesthetic => "aesthetic",
            Mood::Dreamy => "dreamy",
            Mood::Vintage => "vintage",
            Mood::Modern => "modern",
            Mood::Bold => "bold",
        }
    }

    pub fn hashtags(self) -> &'static str {
        hashtags(self)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How the mood was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodSource {
    Keyword,
    Color,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodResult {
    pub mood: Mood,
    pub hashtags: String,
    pub source: MoodSource,
}

impl MoodResult {
    fn new(mood: Mood, source: MoodSource) -> Self {
        Self {
            mood,
            hashtags: mood.hashtags().to_string(),
            source,
        }
    }
}

/// Reject empty or whitespace-only themes; returns the trimmed theme.
pub fn validate_theme(theme: &str) -> Result<&str, FeedError> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        return Err(FeedError::empty_theme());
    }
    Ok(trimmed)
}

/// Resolve a mood: keywords first, then the dominant color, then a random default.
pub fn interpret<R: Rng>(
    theme: &str,
    dominant: Option<&Color>,
    rng: &mut R,
) -> MoodResult {
    let lowered = theme.to_lowercase();

    if let Some(mood) = keyword_mood(lowered.split_whitespace()) {
        tracing::debug!(%mood, "mood from theme keywords");
        return MoodResult::new(mood, MoodSource::Keyword);
    }

    if let Some(mood) = dominant.and_then(|c| color_mood(c.rgb())) {
        tracing::debug!(%mood, "mood from dominant color");
        return MoodResult::new(mood, MoodSource::Color);
    }

    let mood = DEFAULT_MOODS[rng.gen_range(0..DEFAULT_MOODS.len())];
    tracing::debug!(%mood, "mood from random fallback");
    MoodResult::new(mood, MoodSource::Random)
}
