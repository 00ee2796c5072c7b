use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::models::{Game, GamesPage};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Which fields a search term is matched against
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Game name only
    #[default]
    Name,
    /// Name, genres and description
    Extended,
}

/// 1-based pagination window
///
/// Pages below 1 are treated as page 1. A limit of zero or less yields an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    fn limit(&self) -> i64 {
        self.limit.max(0)
    }

    fn skip(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }
}

/// Filters applied to a catalog query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Case-insensitive substring to look for, whitespace included; empty means no search
    pub search: Option<String>,
    pub exclude_ids: Vec<u32>,
    pub randomize: bool,
}

/// A page of borrowed catalog entries
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<'a> {
    pub games: Vec<&'a Game>,
    /// Entries that passed the filters, counted before shuffling and pagination
    pub total: usize,
    pub has_more: bool,
}

impl QueryResult<'_> {
    pub fn into_page(self) -> GamesPage {
        GamesPage {
            games: self.games.into_iter().cloned().collect(),
            total: self.total,
            has_more: self.has_more,
        }
    }
}

/// Filters, optionally shuffles, and paginates the catalog
///
/// The catalog slice is never modified; filtering and shuffling work on a list of
/// references. Search terms are matched literally, so input like `c++` or `(` is safe.
pub fn query_games<'a, R: Rng + ?Sized>(
    games: &'a [Game],
    page: PageRequest,
    options: &QueryOptions,
    scope: SearchScope,
    rng: &mut R,
) -> QueryResult<'a> {
    let excluded: HashSet<u32> = options.exclude_ids.iter().copied().collect();
    let term = options
        .search
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<&Game> = games
        .iter()
        .filter(|game| !excluded.contains(&game.id))
        .filter(|game| term.as_deref().map_or(true, |t| matches_search(game, t, scope)))
        .collect();

    let total = filtered.len();

    if options.randomize {
        filtered.shuffle(rng);
    }

    let skip = page.skip();
    let limit = page.limit();
    let has_more = skip.saturating_add(limit) < total as i64;

    let start = usize::try_from(skip).unwrap_or(usize::MAX).min(total);
    let end = start
        .saturating_add(usize::try_from(limit).unwrap_or(usize::MAX))
        .min(total);

    tracing::debug!(
        total,
        skip,
        limit,
        returned = end - start,
        randomize = options.randomize,
        "Catalog query"
    );

    QueryResult {
        games: filtered.drain(start..end).collect(),
        total,
        has_more,
    }
}

/// `term` must already be lowercase
fn matches_search(game: &Game, term: &str, scope: SearchScope) -> bool {
    if game.name.to_lowercase().contains(term) {
        return true;
    }

    match scope {
        SearchScope::Name => false,
        SearchScope::Extended => {
            game.genres.iter().any(|g| g.to_lowercase().contains(term))
                || game.description.to_lowercase().contains(term)
        }
    }
}
