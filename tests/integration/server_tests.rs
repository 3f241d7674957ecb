use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use leaderboard::Result;
use leaderboard::config::Config;
use leaderboard::core::{Entry, LeaderboardFetcher, ResultSet, Source};
use leaderboard::error::LbError;
use leaderboard::server::{ServerState, build_router};
use leaderboard::test_utils::LeaderboardFixture;

struct Offline;

impl LeaderboardFetcher for Offline {
    fn fetch(&self, source: Source) -> Result<ResultSet> {
        Err(LbError::Fetch {
            tab: source,
            message: "connection refused".to_string(),
        })
    }
}

fn router(fetcher: Arc<dyn LeaderboardFetcher + Send + Sync>, config: &Config) -> Router {
    build_router(Arc::new(ServerState::new(config, fetcher)))
}

fn seeded(count: usize) -> (LeaderboardFixture, Router) {
    let fixture = LeaderboardFixture::new();
    fixture.seed_ranked(Source::Snark, count);
    let app = router(fixture.stores.clone(), &fixture.config);
    (fixture, app)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let (_fixture, app) = seeded(0);
    let (status, body) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn snapshot_returns_token_and_stats() {
    let (_fixture, app) = seeded(12);
    let (status, body) = get(&app, "/api/snark/snapshot").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["token"].as_str().unwrap().starts_with("snark-"));
    assert_eq!(json["stats"]["total_count"], 12);
}

#[tokio::test]
async fn page_without_token_fetches_and_then_reuses_snapshot() {
    let (_fixture, app) = seeded(25);
    let (status, first) =
        post_json(&app, "/api/snark/page", &json!({"page_size": 10, "page_number": 1})).await;
    assert_eq!(status, StatusCode::OK);
    let token = first["token"].as_str().unwrap().to_string();
    assert_eq!(first["total_pages"], 3);
    assert_eq!(first["rows"][0]["rank"], 1);

    let (status, second) = post_json(
        &app,
        "/api/snark/page",
        &json!({"page_size": 10, "page_number": 3, "token": token}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["token"], token.as_str());
    assert_eq!(second["rows"].as_array().unwrap().len(), 5);
    assert_eq!(second["controls"]["controls"][6]["enabled"], false);
}

#[tokio::test]
async fn replaced_snapshot_is_gone() {
    let (_fixture, app) = seeded(5);
    let (_, body) = get(&app, "/api/snark/snapshot").await;
    let old: Value = serde_json::from_str(&body).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    get(&app, "/api/snark/snapshot").await;

    let (status, err) = post_json(
        &app,
        "/api/snark/page",
        &json!({"page_size": 10, "page_number": 1, "token": old["token"]}),
    )
    .await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(err["code"], "stale_snapshot");
}

#[tokio::test]
async fn token_for_other_source_is_bad_request() {
    let (_fixture, app) = seeded(5);
    let (_, body) = get(&app, "/api/snark/snapshot").await;
    let snap: Value = serde_json::from_str(&body).unwrap();
    let (status, err) = post_json(
        &app,
        "/api/sidecar/page",
        &json!({"page_size": 10, "page_number": 1, "token": snap["token"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_request");
}

#[tokio::test]
async fn unknown_source_is_not_found() {
    let (_fixture, app) = seeded(1);
    let (status, body) = get(&app, "/api/uptime/snapshot").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(err["code"], "unknown_source");
}

#[tokio::test]
async fn malformed_body_and_zero_page_size_are_bad_requests() {
    let (_fixture, app) = seeded(3);
    let request = Request::post("/api/snark/page")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) =
        post_json(&app, "/api/snark/page", &json!({"page_size": 0, "page_number": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_request");
}

#[tokio::test]
async fn inline_result_set_is_validated_and_not_cached() {
    let app = router(Arc::new(Offline), &Config::default());
    let entries: Vec<Entry> = (1..=7)
        .map(|i| Entry::new(format!("B62qinline{i}"), Some(10 - i), 50.0))
        .collect();
    let result_set = ResultSet::new(Source::Sidecar, entries, 10, None);

    let (status, page) = post_json(
        &app,
        "/api/sidecar/page",
        &json!({
            "page_size": 5,
            "page_number": 1,
            "search_term": "INLINE",
            "result_set": result_set,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.get("token").is_none());
    assert_eq!(page["total_filtered_count"], 7);
    assert_eq!(page["total_pages"], 2);

    let mut broken = serde_json::to_value(&result_set).unwrap();
    broken["total_count"] = json!(99);
    let (status, err) = post_json(
        &app,
        "/api/sidecar/page",
        &json!({"page_size": 5, "page_number": 1, "result_set": broken}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["code"], "invalid_result_set");
}

#[tokio::test]
async fn store_failure_is_bad_gateway() {
    let app = router(Arc::new(Offline), &Config::default());
    let (status, err) =
        post_json(&app, "/api/snark/page", &json!({"page_size": 10, "page_number": 1})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(err["code"], "fetch_failed");
}

#[tokio::test]
async fn html_fragment_renders_page() {
    let (_fixture, app) = seeded(25);
    let response = app
        .clone()
        .oneshot(
            Request::get("/snark/page?page_size=10&page_number=2&offset=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec(),
    )
    .unwrap();
    assert!(html.contains("<td scope=\"row\">11</td>"));
    assert!(html.contains("B62q0020"));
    assert!(!html.contains("B62q0021"));
    assert!(html.contains("token=snark-"));
}

#[tokio::test]
async fn html_fragment_search_and_empty_states() {
    let fixture = LeaderboardFixture::new();
    fixture.seed_ranked(Source::Snark, 3);
    let app = router(fixture.stores.clone(), &fixture.config);

    let (status, html) = get(&app, "/snark/page?search=nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No matching block producers."));

    let (status, html) = get(&app, "/sidecar/page").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No scored block producers yet."));
}

#[tokio::test]
async fn maintenance_mode_applies_to_api() {
    let fixture = LeaderboardFixture::new();
    fixture.seed_ranked(Source::Snark, 30);
    let mut config = fixture.config.clone();
    config.display.maintenance_mode = true;
    let app = router(fixture.stores.clone(), &config);

    let (status, page) =
        post_json(&app, "/api/snark/page", &json!({"page_size": 10, "page_number": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["maintenance"], true);
    assert!(page["rows"].as_array().unwrap().is_empty());
    assert_eq!(page["total_pages"], 3);
}

#[tokio::test]
async fn fragment_uses_configured_page_sizes_and_link() {
    let fixture = LeaderboardFixture::new();
    fixture.seed_ranked(Source::Snark, 30);
    let mut config = fixture.config.clone();
    config.pagination.page_size_options = vec![5, 15];
    config.display.external_link_url = "https://example.org/delegation".to_string();
    let app = router(fixture.stores.clone(), &config);

    let (status, html) = get(&app, "/snark/page?page_size=15&search=q00").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(">5</option>"));
    assert!(html.contains("search=q00") && html.contains("selected>15</option>"));
    assert!(!html.contains(">100</option>"));
    assert!(html.contains("https://example.org/delegation"));
}

#[tokio::test]
async fn page_number_at_usize_max_is_an_empty_page() {
    let (_fixture, app) = seeded(25);
    let (status, page) = post_json(
        &app,
        "/api/snark/page",
        &json!({"page_size": 10, "page_number": u64::MAX}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(page["rows"].as_array().unwrap().is_empty());
    assert_eq!(page["total_pages"], 3);
}
