mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::NormalizePathLayer;

#[tokio::test]
async fn test_create_redirect_stats_flow() {
    let app = common::create_test_state();
    let server = common::test_server(app.state);

    let created = server
        .post("/shorturls")
        .json(&json!({ "url": "https://example.com", "validity": 5 }))
        .await;
    created.assert_status(StatusCode::CREATED);

    let body: Value = created.json();
    let short_link = body["shortLink"].as_str().unwrap();
    assert!(short_link.starts_with("http://short.test/"));
    let code = short_link.rsplit('/').next().unwrap().to_string();

    let redirect = server.get(&format!("/{code}")).await;
    redirect.assert_status(StatusCode::FOUND);
    assert_eq!(redirect.header("location"), "https://example.com");

    let stats: Value = server.get(&format!("/shorturls/{code}")).await.json();
    assert_eq!(stats["totalClicks"], 1);
    assert_eq!(stats["clicks"][0]["referrer"], "direct");

    let expiry: DateTime<Utc> = body["expiry"].as_str().unwrap().parse().unwrap();
    let stats_expiry: DateTime<Utc> = stats["expiryTime"].as_str().unwrap().parse().unwrap();
    assert_eq!(expiry, stats_expiry);

    let created_at: DateTime<Utc> = stats["createdAt"].as_str().unwrap().parse().unwrap();
    assert_eq!((expiry - created_at).num_minutes(), 5);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = common::create_test_state();
    let server = common::test_server(app.state);

    let response = server.get("/a/b/c").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_unsupported_method_is_route_not_found() {
    let app = common::create_test_state();
    let server = common::test_server(app.state);

    let response = server.delete("/shorturls").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_trailing_slash_is_normalized() {
    let app = common::create_test_state();
    let service = NormalizePathLayer::trim_trailing_slash()
        .layer(shorturl_service::routes::app_router(app.state).layer(common::MockConnectInfoLayer));

    let response = service
        .oneshot(
            Request::builder()
                .uri("/_health/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
