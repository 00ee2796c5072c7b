use serde::{Deserialize, Serialize};

pub mod game;
pub mod mood;

pub use game::{Game, RawRecord, TagList};
pub use mood::{Mood, MoodProfile, UnknownMood};

/// One page of catalog results returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GamesPage {
    pub games: Vec<Game>,
    /// Number of entries matching the filter, before pagination
    pub total: usize,
    pub has_more: bool,
}

/// Request for mood-based recommendations drawn from the caller's library
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    /// Mood identifier; unknown values produce an empty result
    pub mood: String,
    #[serde(default)]
    pub library_ids: Vec<u32>,
    #[serde(default)]
    pub liked_ids: Vec<u32>,
}

/// A recommended game and why it was picked
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedGame {
    pub game: Game,
    pub score: i32,
    pub mood_matches: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub mood: Option<Mood>,
    pub favorite_genres: Vec<String>,
    pub recommendations: Vec<RecommendedGame>,
}
