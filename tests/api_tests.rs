use std::io::Write;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use gamedeck_api::api::{create_router, AppState};
use gamedeck_api::db::{CatalogStore, JsonFileSource};
use gamedeck_api::services::SearchScope;

const CATALOG: &str = r#"[
    {"name": "The Legend of Zelda: Breath of the Wild", "genres": "Action, Adventure, Open World",
     "types": "app", "url": "https://store.steampowered.com/app/100/Zelda/"},
    {"name": "Zelda Soundtrack", "genres": "Action", "types": "dlc"},
    {"name": "Portal 2", "genres": "Puzzle, Action", "types": "app"},
    {"name": "Stardew Valley", "genres": "Simulation, RPG, Casual", "types": "app",
     "game_description": "Inherit your grandfather's old farm"},
    {"name": "Rocket League", "genres": "Sports, Racing, Multiplayer", "types": "app"},
    {"name": "C++ Tycoon", "genres": "Simulation, Strategy", "types": "app"},
    {"name": "Celeste", "genres": "Platformer, Indie", "types": "app"},
    {"name": "Civilization", "genres": "Strategy", "types": "app"},
    {"id": 4242, "name": "Hades", "genres": "Action, Indie", "types": "app"}
]"#;

fn create_test_server_with(contents: &str, scope: SearchScope) -> TestServer {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();

    let state = AppState::new(CatalogStore::new(JsonFileSource::new(file.path())), scope);
    state.catalog.load();

    let app = create_router(state);
    TestServer::new(app).unwrap()
}

/// Server whose catalog is only read when the first catalog request arrives
fn create_unloaded_test_server(contents: &str) -> (TestServer, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();

    let state = AppState::new(CatalogStore::new(JsonFileSource::new(file.path())), SearchScope::Name);
    let server = TestServer::new(create_router(state)).unwrap();
    (server, file)
}

fn create_test_server() -> TestServer {
    create_test_server_with(CATALOG, SearchScope::Name)
}

fn ids(page: &Value) -> Vec<u64> {
    page["games"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["games"], 8);
}

#[tokio::test]
async fn test_list_games_defaults() {
    let server = create_test_server();

    let response = server.get("/api/games").await;
    response.assert_status_ok();

    let page: Value = response.json();
    assert_eq!(ids(&page), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(page["total"], 8);
    assert_eq!(page["hasMore"], false);
    assert_eq!(page["games"][7]["name"], "Hades");
}

#[tokio::test]
async fn test_pagination_walks_catalog_once() {
    let server = create_test_server();
    let mut seen = Vec::new();

    for (page_number, expect_more) in [(1, true), (2, true), (3, false)] {
        let page: Value = server
            .get(&format!("/api/games?page={page_number}&limit=3"))
            .await
            .json();
        assert_eq!(page["total"], 8);
        assert_eq!(page["hasMore"], expect_more);
        seen.extend(ids(&page));
    }

    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[tokio::test]
async fn test_non_positive_page_and_limit() {
    let server = create_test_server();

    let first: Value = server.get("/api/games?page=0&limit=2").await.json();
    assert_eq!(ids(&first), vec![1, 2]);

    let empty: Value = server.get("/api/games?limit=0").await.json();
    assert!(ids(&empty).is_empty());
    assert_eq!(empty["total"], 8);
}

#[tokio::test]
async fn test_malformed_numbers_are_rejected() {
    let server = create_test_server();

    let response = server.get("/api/games?page=abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("page"));
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_skips_non_apps() {
    let server = create_test_server();

    let page: Value = server.get("/api/games?search=ZELDA").await.json();
    assert_eq!(ids(&page), vec![1]);
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn test_search_with_special_characters() {
    let server = create_test_server();

    let page: Value = server.get("/api/games?search=c%2B%2B").await.json();
    assert_eq!(ids(&page), vec![5]);

    let response = server.get("/api/games?search=%5B(").await;
    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn test_search_keeps_whitespace() {
    let server = create_test_server();

    let page: Value = server.get("/api/games?search=%20").await.json();
    assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);

    let page: Value = server.get("/api/games?search=zelda%20").await.json();
    assert_eq!(page["total"], 0);

    let page: Value = server.get("/api/games?search=").await.json();
    assert_eq!(page["total"], 8);
}

#[tokio::test]
async fn test_extended_search_scope() {
    let server = create_test_server_with(CATALOG, SearchScope::Extended);

    let page: Value = server.get("/api/games?search=farm").await.json();
    assert_eq!(ids(&page), vec![3]);

    let page: Value = server.get("/api/games?search=indie").await.json();
    assert_eq!(ids(&page), vec![6, 8]);
}

#[tokio::test]
async fn test_random_excluding_liked_games() {
    let server = create_test_server();

    let page: Value = server
        .get("/api/games?page=1&limit=10&excludeIds=1,2,3&random=true")
        .await
        .json();

    let mut returned = ids(&page);
    assert_eq!(page["total"], 5);
    assert_eq!(page["hasMore"], false);
    returned.sort_unstable();
    assert_eq!(returned, vec![4, 5, 6, 7, 8]);
}

#[tokio::test]
async fn test_fetch_by_ids_bypasses_pagination() {
    let server = create_test_server();

    let page: Value = server
        .get("/api/games?ids=7,2,99,oops&limit=1&search=nothing")
        .await
        .json();

    assert_eq!(ids(&page), vec![2, 7]);
    assert_eq!(page["total"], 2);
    assert_eq!(page["hasMore"], false);
}

#[tokio::test]
async fn test_get_game_by_id() {
    let server = create_test_server();

    let response = server.get("/api/games/1").await;
    response.assert_status_ok();
    let game: Value = response.json();
    assert_eq!(game["name"], "The Legend of Zelda: Breath of the Wild");
    assert_eq!(game["genres"], json!(["Action", "Adventure", "Open World"]));
    assert_eq!(
        game["imageUrl"],
        "https://cdn.akamai.steamstatic.com/steam/apps/100/header.jpg"
    );

    let response = server.get("/api/games/999").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Game 999 not found");
}

#[tokio::test]
async fn test_non_numeric_game_id_is_json_error() {
    let server = create_test_server();

    let response = server.get("/api/games/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_moods() {
    let server = create_test_server();

    let moods: Vec<Value> = server.get("/api/moods").await.json();
    assert_eq!(moods.len(), 7);
    assert_eq!(moods[0]["mood"], "adventurous");
    assert_eq!(moods[0]["genres"], json!(["Action", "Adventure", "Open World"]));
}

#[tokio::test]
async fn test_recommendations_for_mood() {
    let server = create_test_server();

    let response = server
        .post("/api/recommendations")
        .json(&json!({
            "mood": "adventurous",
            "libraryIds": [4, 1, 2],
            "likedIds": [8]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["mood"], "adventurous");
    assert_eq!(body["favoriteGenres"], json!(["Action", "Indie"]));

    let picks = body["recommendations"].as_array().unwrap();
    let pick_ids: Vec<u64> = picks.iter().map(|p| p["game"]["id"].as_u64().unwrap()).collect();
    assert_eq!(pick_ids, vec![1, 2]);
    assert_eq!(picks[0]["score"], 48);
    assert_eq!(picks[0]["moodMatches"], 3);
    assert_eq!(
        picks[0]["reason"],
        "Matches your adventurous mood with Action, Adventure, Open World"
    );
    assert_eq!(picks[1]["score"], 13);
}

#[tokio::test]
async fn test_unknown_mood_returns_empty() {
    let server = create_test_server();

    let response = server
        .post("/api/recommendations")
        .json(&json!({ "mood": "sleepy", "libraryIds": [1, 2, 3] }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["mood"].is_null());
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_recommendation_body_is_json_error() {
    let server = create_test_server();

    let response = server
        .post("/api/recommendations")
        .json(&json!({ "libraryIds": "not a list" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_empty_library_returns_empty() {
    let server = create_test_server();

    let body: Value = server
        .post("/api/recommendations")
        .json(&json!({ "mood": "social", "libraryIds": [] }))
        .await
        .json();

    assert_eq!(body["mood"], "social");
    assert!(body["recommendations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "7a1c4f5e-9a0b-4c3d-8e2f-1b2c3d4e5f60";

    let response = server
        .get("/health")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_unreadable_catalog_serves_empty_results() {
    let server = create_test_server_with("{ this is not a catalog", SearchScope::Name);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["games"], 0);

    let response = server.get("/api/games?random=true").await;
    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["total"], 0);
    assert_eq!(page["hasMore"], false);

    server.get("/api/games/1").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_first_catalog_request_loads_catalog() {
    let (server, _file) = create_unloaded_test_server(CATALOG);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["games"], 0);

    let page: Value = server.get("/api/games").await.json();
    assert_eq!(page["total"], 8);

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["games"], 8);
}
