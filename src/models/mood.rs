use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// A user-selectable mood that steers recommendations toward a fixed set of genres
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Adventurous,
    Relaxed,
    Strategic,
    Competitive,
    Creative,
    Nostalgic,
    Social,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Adventurous,
        Mood::Relaxed,
        Mood::Strategic,
        Mood::Competitive,
        Mood::Creative,
        Mood::Nostalgic,
        Mood::Social,
    ];

    /// Genres associated with this mood, in display order
    pub fn genres(self) -> &'static [&'static str] {
        match self {
            Mood::Adventurous => &["Action", "Adventure", "Open World"],
            Mood::Relaxed => &["Casual", "Simulation", "Puzzle"],
            Mood::Strategic => &["Strategy", "Puzzle", "RPG"],
            Mood::Competitive => &["Sports", "Racing", "Fighting"],
            Mood::Creative => &["Simulation", "Building", "Sandbox"],
            Mood::Nostalgic => &["Retro", "Platformer", "Classic"],
            Mood::Social => &["Multiplayer", "Co-op", "Massively Multiplayer"],
        }
    }

    pub fn includes_genre(self, genre: &str) -> bool {
        self.genres().contains(&genre)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Adventurous => "adventurous",
            Mood::Relaxed => "relaxed",
            Mood::Strategic => "strategic",
            Mood::Competitive => "competitive",
            Mood::Creative => "creative",
            Mood::Nostalgic => "nostalgic",
            Mood::Social => "social",
        }
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// A mood together with its genres, as listed to clients
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodProfile {
    pub mood: Mood,
    pub genres: Vec<&'static str>,
}

impl From<Mood> for MoodProfile {
    fn from(mood: Mood) -> Self {
        Self {
            mood,
            genres: mood.genres().to_vec(),
        }
    }
}
