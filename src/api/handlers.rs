use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{
    Game, GamesPage, Mood, MoodProfile, RecommendationRequest, RecommendationResponse,
    RecommendedGame,
};
use crate::services::query::{self, PageRequest, QueryOptions, DEFAULT_LIMIT, DEFAULT_PAGE};

use super::AppState;

/// Query string for `GET /api/games`
///
/// Numbers arrive as strings so malformed values produce a JSON error body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    /// Comma-separated ids to leave out
    pub exclude_ids: Option<String>,
    /// `true` to shuffle results before paginating
    pub random: Option<String>,
    /// Comma-separated ids; when present, search and pagination are skipped
    pub ids: Option<String>,
}

/// Parses a comma-separated id list, skipping anything that is not an id
fn parse_id_list(raw: &str) -> Vec<u32> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

fn parse_int(name: &str, raw: Option<&str>, default: i64) -> AppResult<i64> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("{name} must be an integer, got '{value}'"))),
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| s.trim().eq_ignore_ascii_case("true"))
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "games": state.catalog.len() })),
    )
}

/// Browse, search or fetch games by id
pub async fn list_games(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<GamesQuery>,
) -> AppResult<Json<GamesPage>> {
    state.ensure_catalog().await?;

    if let Some(raw_ids) = params.ids.as_deref() {
        let ids = parse_id_list(raw_ids);
        let games: Vec<Game> = state.catalog.get_by_ids(&ids).into_iter().cloned().collect();

        tracing::debug!(
            request_id = %request_id,
            requested = ids.len(),
            found = games.len(),
            "Fetched games by id"
        );

        return Ok(Json(GamesPage {
            total: games.len(),
            has_more: false,
            games,
        }));
    }

    let page = PageRequest::new(
        parse_int("page", params.page.as_deref(), DEFAULT_PAGE)?,
        parse_int("limit", params.limit.as_deref(), DEFAULT_LIMIT)?,
    );
    let options = QueryOptions {
        search: params.search,
        exclude_ids: params.exclude_ids.as_deref().map(parse_id_list).unwrap_or_default(),
        randomize: parse_flag(params.random.as_deref()),
    };

    let result = query::query_games(
        state.catalog.games(),
        page,
        &options,
        state.search_scope,
        &mut rand::thread_rng(),
    );

    tracing::info!(
        request_id = %request_id,
        page = page.page,
        limit = page.limit,
        total = result.total,
        returned = result.games.len(),
        "Served games page"
    );

    Ok(Json(result.into_page()))
}

/// Fetch a single game
pub async fn get_game(
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> AppResult<Json<Game>> {
    let Path(id) = id?;
    state.ensure_catalog().await?;

    state
        .catalog
        .get_by_id(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Game {id} not found")))
}

/// List the available moods and their genres
pub async fn list_moods() -> Json<Vec<MoodProfile>> {
    Json(Mood::ALL.into_iter().map(MoodProfile::from).collect())
}

/// Recommend games from the caller's library for a mood
///
/// Unknown moods and empty libraries produce an empty list rather than an error.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    request: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = request?;
    state.ensure_catalog().await?;

    let mood = match request.mood.parse::<Mood>() {
        Ok(mood) => mood,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Unknown mood requested");
            return Ok(Json(RecommendationResponse {
                mood: None,
                favorite_genres: Vec::new(),
                recommendations: Vec::new(),
            }));
        }
    };

    let library = state.catalog.get_by_ids(&request.library_ids);
    let liked = state.catalog.get_by_ids(&request.liked_ids);
    let result = state
        .engine
        .recommend(&library, &liked, mood, &mut rand::thread_rng());

    tracing::info!(
        request_id = %request_id,
        mood = %mood,
        library = library.len(),
        liked = liked.len(),
        recommended = result.picks.len(),
        "Generated recommendations"
    );

    Ok(Json(RecommendationResponse {
        mood: Some(mood),
        favorite_genres: result.favorite_genres,
        recommendations: result.picks.into_iter().map(RecommendedGame::from).collect(),
    }))
}
