//! Mood-based recommendations drawn from a user's library.
//!
//! Each library game is scored against the genres of the selected mood, with a
//! smaller boost for genres the user has liked before. The best mood matches are
//! kept, and a random sample from the next tier adds variety between calls.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;

use rand::{seq::SliceRandom, Rng};

use crate::models::{Game, Mood, RecommendedGame};

/// Points per genre shared with the selected mood
pub const MOOD_MATCH_WEIGHT: i32 = 10;
/// Extra points per mood match once a game matches more than one mood genre
pub const MULTI_MATCH_BONUS: i32 = 5;
/// Points per genre shared with the user's liked games
pub const LIKED_GENRE_WEIGHT: i32 = 3;
/// Subtracted from games that share no genre with the mood
pub const NO_MATCH_PENALTY: i32 = 30;
/// Highest-scoring mood matches that are always recommended
pub const TOP_PICKS: usize = 3;
/// Ranked mood matches after the top picks that random picks are drawn from
pub const CANDIDATE_WINDOW: usize = 12;
/// Highest-scoring non-matching games considered when topping up a short list
pub const TOP_UP_WINDOW: usize = 10;
/// Number of recommendations returned when the library allows it
pub const TARGET_SIZE: usize = 6;
/// Most frequent liked genres used to explain recommendations
pub const FAVORITE_GENRE_COUNT: usize = 5;

/// Tunable weights and selection sizes for the recommendation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendConfig {
    pub mood_match_weight: i32,
    pub multi_match_bonus: i32,
    pub liked_genre_weight: i32,
    pub no_match_penalty: i32,
    pub top_picks: usize,
    pub candidate_window: usize,
    pub top_up_window: usize,
    pub target_size: usize,
    pub favorite_genre_count: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            mood_match_weight: MOOD_MATCH_WEIGHT,
            multi_match_bonus: MULTI_MATCH_BONUS,
            liked_genre_weight: LIKED_GENRE_WEIGHT,
            no_match_penalty: NO_MATCH_PENALTY,
            top_picks: TOP_PICKS,
            candidate_window: CANDIDATE_WINDOW,
            top_up_window: TOP_UP_WINDOW,
            target_size: TARGET_SIZE,
            favorite_genre_count: FAVORITE_GENRE_COUNT,
        }
    }
}

/// A library game with its score for one recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredGame<'a> {
    pub game: &'a Game,
    pub score: i32,
    pub mood_matches: usize,
    pub liked_matches: usize,
}

/// Why a game was recommended, for display only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationReason {
    MoodMatch { mood: Mood, genres: Vec<String> },
    SimilarToLiked { genres: Vec<String> },
    FromLibrary,
}

impl Display for RecommendationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationReason::MoodMatch { mood, genres } => {
                write!(f, "Matches your {} mood with {}", mood, genres.join(", "))
            }
            RecommendationReason::SimilarToLiked { genres } => {
                write!(f, "Similar to games you like ({})", genres.join(", "))
            }
            RecommendationReason::FromLibrary => write!(f, "From your library"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation<'a> {
    pub scored: ScoredGame<'a>,
    pub reason: RecommendationReason,
}

impl From<Recommendation<'_>> for RecommendedGame {
    fn from(recommendation: Recommendation<'_>) -> Self {
        Self {
            game: recommendation.scored.game.clone(),
            score: recommendation.scored.score,
            mood_matches: recommendation.scored.mood_matches,
            reason: recommendation.reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recommendations<'a> {
    pub picks: Vec<Recommendation<'a>>,
    /// Most frequent genres among liked games, most frequent first
    pub favorite_genres: Vec<String>,
}

/// Scores a library against a mood and picks a small, partly random selection
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendConfig) -> Self {
        Self { config }
    }

    /// Recommends up to `target_size` games from `library` for `mood`
    ///
    /// Games sharing no genre with the mood only appear when fewer than
    /// `target_size` games match it, or when none do.
    pub fn recommend<'a, R: Rng + ?Sized>(
        &self,
        library: &[&'a Game],
        liked: &[&Game],
        mood: Mood,
        rng: &mut R,
    ) -> Recommendations<'a> {
        if library.is_empty() {
            return Recommendations::default();
        }

        let liked_genres: HashSet<&str> = liked
            .iter()
            .flat_map(|game| game.genres.iter().map(String::as_str))
            .collect();
        let favorite_genres = favorite_genres(liked, self.config.favorite_genre_count);

        let scored: Vec<ScoredGame<'a>> = library
            .iter()
            .map(|&game| self.score(game, mood, &liked_genres))
            .collect();

        let selected = self.select(&scored, rng);

        tracing::debug!(
            mood = %mood,
            library = library.len(),
            liked = liked.len(),
            selected = selected.len(),
            "Generated recommendations"
        );

        let picks = selected
            .into_iter()
            .map(|scored| Recommendation {
                reason: recommendation_reason(scored.game, mood, &favorite_genres),
                scored,
            })
            .collect();

        Recommendations {
            picks,
            favorite_genres,
        }
    }

    /// Scores one game against the mood and the liked-genre set
    pub fn score<'a>(&self, game: &'a Game, mood: Mood, liked_genres: &HashSet<&str>) -> ScoredGame<'a> {
        let cfg = &self.config;

        let mood_matches = game.genres.iter().filter(|g| mood.includes_genre(g)).count();
        let liked_matches = game
            .genres
            .iter()
            .filter(|g| liked_genres.contains(g.as_str()))
            .count();

        let mut score = cfg.mood_match_weight * mood_matches as i32;
        if mood_matches > 1 {
            score += cfg.multi_match_bonus * mood_matches as i32;
        }
        score += cfg.liked_genre_weight * liked_matches as i32;
        if mood_matches == 0 {
            score -= cfg.no_match_penalty;
        }

        ScoredGame {
            game,
            score,
            mood_matches,
            liked_matches,
        }
    }

    fn select<'a, R: Rng + ?Sized>(&self, scored: &[ScoredGame<'a>], rng: &mut R) -> Vec<ScoredGame<'a>> {
        let cfg = &self.config;
        let target = cfg.target_size;

        let (mut matched, mut unmatched): (Vec<ScoredGame<'a>>, Vec<ScoredGame<'a>>) =
            scored.iter().partition(|s| s.mood_matches > 0);
        // Stable sorts keep library order among equal scores
        matched.sort_by(|a, b| b.score.cmp(&a.score));

        if matched.len() >= target {
            let top = cfg.top_picks.min(target);
            let window_end = top.saturating_add(cfg.candidate_window).min(matched.len());

            let mut picks = matched[..top].to_vec();
            picks.extend(matched[top..window_end].choose_multiple(rng, target - top).copied());
            picks
        } else if !matched.is_empty() {
            let shortfall = target - matched.len();

            // Only games with some liked-genre signal are worth offering as filler
            unmatched.retain(|s| s.liked_matches > 0);
            unmatched.sort_by(|a, b| b.score.cmp(&a.score));
            unmatched.truncate(cfg.top_up_window);

            let mut picks = matched;
            picks.extend(unmatched.choose_multiple(rng, shortfall).copied());
            picks
        } else {
            scored.choose_multiple(rng, target).copied().collect()
        }
    }
}

/// The `count` most frequent genres across `liked`, ties broken by first appearance
pub fn favorite_genres(liked: &[&Game], count: usize) -> Vec<String> {
    let mut tally: HashMap<&str, (usize, usize)> = HashMap::new();

    for genre in liked.iter().flat_map(|game| game.genres.iter()) {
        let next_seen = tally.len();
        let entry = tally.entry(genre.as_str()).or_insert((0, next_seen));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, (usize, usize))> = tally.into_iter().collect();
    ranked.sort_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
        count_b.cmp(count_a).then(seen_a.cmp(seen_b))
    });

    ranked
        .into_iter()
        .take(count)
        .map(|(genre, _)| genre.to_string())
        .collect()
}

/// Explains a pick: mood genres first, then favorite genres, then the library itself
pub fn recommendation_reason(game: &Game, mood: Mood, favorite_genres: &[String]) -> RecommendationReason {
    let mood_genres: Vec<String> = game
        .genres
        .iter()
        .filter(|g| mood.includes_genre(g))
        .cloned()
        .collect();
    if !mood_genres.is_empty() {
        return RecommendationReason::MoodMatch {
            mood,
            genres: mood_genres,
        };
    }

    let liked_genres: Vec<String> = game
        .genres
        .iter()
        .filter(|g| favorite_genres.contains(g))
        .cloned()
        .collect();
    if !liked_genres.is_empty() {
        return RecommendationReason::SimilarToLiked { genres: liked_genres };
    }

    RecommendationReason::FromLibrary
}
