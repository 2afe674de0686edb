//! Integration tests for the JSON API, with Wikipedia replaced by a mock server.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

use footy_quiz::server::{build_router, AppState};
use footy_quiz::{QuizConfig, WikiClient, NAME_PLACEHOLDER};

const MESSI: &str = include_str!("fixtures/messi.html");
const NOT_FOOTBALLER: &str = include_str!("fixtures/not_footballer.html");
const API_PATH: &str = "/w/api.php";

fn build_test_app(server: &MockServer, debug: bool) -> Router {
    build_app(QuizConfig {
        api_url: server.url(API_PATH),
        debug,
        ..QuizConfig::default()
    })
}

fn build_app(config: QuizConfig) -> Router {
    let client = WikiClient::from_config(&config).unwrap();
    build_router(AppState::new(client, config))
}

/// Every API call answers, but only after `delay`.
async fn mock_slow_upstream(server: &MockServer, delay: Duration) {
    server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH);
            then.status(200).delay(delay).json_body(json!({}));
        })
        .await;
}

async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Exact-title lookup that finds `title` as a real article.
async fn mock_exact_title(server: &MockServer, title: &str) {
    let title = title.to_string();
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("action", "query")
                .query_param("prop", "pageprops");
            then.status(200).json_body(json!({
                "batchcomplete": true,
                "query": {
                    "pages": [
                        {"pageid": 1, "ns": 0, "title": &title},
                        {"ns": 0, "title": format!("{title} (footballer)"), "missing": true}
                    ]
                }
            }));
        })
        .await;
}

async fn mock_parse(server: &MockServer, title: &str, markup: &str) {
    let title = title.to_string();
    let markup = markup.to_string();
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("action", "parse")
                .query_param("page", &title);
            then.status(200).json_body(json!({
                "parse": {"title": &title, "pageid": 1, "text": &markup}
            }));
        })
        .await;
}

// ---------------------------------------------------------------------------
// Test: a known footballer comes back masked, with the answer in the payload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn player_returns_masked_career() {
    let server = MockServer::start_async().await;
    mock_exact_title(&server, "Lionel Messi").await;
    mock_parse(&server, "Lionel Messi", MESSI).await;

    let app = build_test_app(&server, false);
    let response = get(app, "/api/player?name=Lionel%20Messi").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let player = &json["player"];

    assert_eq!(player["wikipedia_title"], "Lionel Messi");
    assert_eq!(player["search_query"], "Lionel Messi");
    assert_eq!(player["career"]["full_name"], NAME_PLACEHOLDER);
    assert_eq!(player["career"]["position"], "Forward");
    assert_eq!(player["career"]["birth_date"], "1987-06-24");
    assert_eq!(player["career"]["clubs"].as_array().unwrap().len(), 5);
    assert_eq!(player["career"]["national_team"].as_array().unwrap().len(), 3);
    assert!(player["career"]["clubs"][4]["apps"].is_null());
    assert!(!json.to_string().contains("Lionel Andrés Messi"));
}

// ---------------------------------------------------------------------------
// Test: nothing plausible found
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_player_returns_404() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("action", "query")
                .query_param("prop", "pageprops");
            then.status(200).json_body(json!({
                "query": {
                    "normalized": [{"from": "xyzqqq123", "to": "Xyzqqq123"}],
                    "pages": [{"ns": 0, "title": "Xyzqqq123", "missing": true}]
                }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("list", "search");
            then.status(200)
                .json_body(json!({"query": {"searchinfo": {"totalhits": 0}, "search": []}}));
        })
        .await;

    let app = build_test_app(&server, false);
    let response = get(app, "/api/player?name=xyzqqq123").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "not_found");
    assert!(json.get("player").is_none());
    assert!(json.get("details").is_none());
}

// ---------------------------------------------------------------------------
// Test: a page without any career data is not a footballer
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_footballer_page_returns_500() {
    let server = MockServer::start_async().await;
    mock_exact_title(&server, "Jane Painter").await;
    mock_parse(&server, "Jane Painter", NOT_FOOTBALLER).await;

    let app = build_test_app(&server, false);
    let response = get(app, "/api/player?name=Jane+Painter").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "not_a_footballer");
    assert!(json["error"].as_str().unwrap().contains("Jane Painter"));
}

// ---------------------------------------------------------------------------
// Test: close search scores are ambiguous
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ambiguous_name_returns_400() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("action", "query")
                .query_param("prop", "pageprops");
            then.status(200).json_body(json!({
                "query": {
                    "pages": [
                        {"pageid": 7, "ns": 0, "title": "Ronaldo", "pageprops": {"disambiguation": ""}},
                        {"ns": 0, "title": "Ronaldo (footballer)", "missing": true}
                    ]
                }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("list", "search")
                .query_param("srsearch", "Ronaldo footballer");
            then.status(200).json_body(json!({
                "query": {
                    "search": [
                        {
                            "title": "Cristiano Ronaldo",
                            "snippet": "Portuguese professional <span class=\"searchmatch\">footballer</span> who plays as a forward for Al Nassr and captains the Portugal national team"
                        },
                        {
                            "title": "Ronaldo Nazário",
                            "snippet": "Brazilian former professional <span class=\"searchmatch\">footballer</span> who played as a striker for clubs including Real Madrid"
                        }
                    ]
                }
            }));
        })
        .await;

    let app = build_test_app(&server, false);
    let response = get(app, "/api/player?name=Ronaldo").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ambiguous");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("Cristiano Ronaldo"));
    assert!(message.contains("Ronaldo Nazário"));
}

// ---------------------------------------------------------------------------
// Test: missing name is rejected before any upstream call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_name_returns_400() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    for uri in ["/api/player", "/api/player?name=%20%20"] {
        let app = build_test_app(&server, false);
        let response = get(app, uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "invalid_input");
        assert_eq!(json["error"], "Player name is required");
    }
    upstream.assert_hits_async(0).await;
}

// ---------------------------------------------------------------------------
// Test: upstream failures are 502, with details only in debug mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upstream_failure_returns_502_with_debug_details() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH);
            then.status(503);
        })
        .await;

    let response = get(build_test_app(&server, true), "/api/player?name=Pele").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "upstream_unavailable");
    assert!(json["details"].as_str().unwrap().contains("503"));

    let response = get(build_test_app(&server, false), "/api/player?name=Pele").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn malformed_query_string_returns_json_400() {
    let server = MockServer::start_async().await;

    for uri in ["/api/player?name=a&name=b", "/api/suggest?q=mes&q=mess"] {
        let response = get(build_test_app(&server, false), uri).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "invalid_input");
        assert!(json["error"].as_str().unwrap().contains("duplicate field"));
    }
}

// ---------------------------------------------------------------------------
// Test: timeouts are 408 with the usual error body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_upstream_returns_408_timeout() {
    let server = MockServer::start_async().await;
    mock_slow_upstream(&server, Duration::from_secs(3)).await;

    let app = build_app(QuizConfig {
        api_url: server.url(API_PATH),
        upstream_timeout_secs: 1,
        ..QuizConfig::default()
    });
    let response = get(app, "/api/player?name=Pele").await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "timeout");
    assert_eq!(json["error"], "Wikipedia took too long to respond");
}

#[tokio::test]
async fn request_timeout_returns_408_json() {
    let server = MockServer::start_async().await;
    mock_slow_upstream(&server, Duration::from_secs(3)).await;

    let app = build_app(QuizConfig {
        api_url: server.url(API_PATH),
        request_timeout_secs: 1,
        debug: true,
        ..QuizConfig::default()
    });
    let response = get(app, "/api/player?name=Pele").await;

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "timeout");
    assert!(json["error"].as_str().unwrap().contains("1 seconds"));
    assert!(json["details"].as_str().unwrap().contains("RequestTimeout"));
}

// ---------------------------------------------------------------------------
// Test: suggestions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_suggest_query_returns_empty_list() {
    let server = MockServer::start_async().await;
    let upstream = server
        .mock_async(|when, then| {
            when.method(GET).path(API_PATH);
            then.status(200).json_body(json!(["", [], [], []]));
        })
        .await;

    let response = get(build_test_app(&server, false), "/api/suggest?q=me").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"suggestions": []}));
    upstream.assert_hits_async(0).await;
}

#[tokio::test]
async fn suggest_returns_names_and_titles() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(API_PATH)
                .query_param("action", "opensearch")
                .query_param("search", "mbap footballer");
            then.status(200).json_body(json!([
                "mbap footballer",
                ["Kylian Mbappé", "Ethan Mbappé"],
                ["", ""],
                [
                    "https://en.wikipedia.org/wiki/Kylian_Mbapp%C3%A9",
                    "https://en.wikipedia.org/wiki/Ethan_Mbapp%C3%A9"
                ]
            ]));
        })
        .await;

    let response = get(build_test_app(&server, false), "/api/suggest?q=mbap").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["suggestions"][0]["name"], "Kylian Mbappé");
    assert_eq!(json["suggestions"][0]["page_title"], "Kylian Mbappé");
    assert_eq!(json["suggestions"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: health and unknown routes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_version() {
    let server = MockServer::start_async().await;
    let response = get(build_test_app(&server, false), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let server = MockServer::start_async().await;
    let response = get(build_test_app(&server, false), "/api/nothing-here").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
