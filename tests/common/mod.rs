// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use gameup::config::Config;
use gameup::db::Db;
use gameup::routes::create_router;
use gameup::services::{GeminiClient, IgdbService, RecommendationService};
use gameup::AppState;
use std::sync::Arc;

/// Create a fresh in-memory test database.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// IGDB client pointed at an unroutable endpoint.
///
/// Any attempted upstream call fails immediately, so tests can prove that
/// a code path performs no network I/O.
#[allow(dead_code)]
pub fn offline_igdb() -> IgdbService {
    IgdbService::with_endpoints(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        "http://127.0.0.1:1/oauth2/token".to_string(),
        "http://127.0.0.1:1/v4/games".to_string(),
    )
}

/// Gemini client pointed at an unroutable endpoint.
#[allow(dead_code)]
pub fn offline_gemini() -> GeminiClient {
    GeminiClient::with_endpoint(
        "test_gemini_key".to_string(),
        "http://127.0.0.1:1/generate".to_string(),
    )
}

/// Create a test app with an in-memory database and offline upstreams.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;
    let igdb = offline_igdb();
    let recommender = RecommendationService::new(igdb.clone(), offline_gemini());

    let state = Arc::new(AppState {
        config,
        db,
        igdb,
        recommender,
    });

    (create_router(state.clone()), state)
}

/// Send a request and return (status, parsed JSON body).
#[allow(dead_code)]
pub async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    use tower::ServiceExt;

    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Register an account and log in, returning the session token.
#[allow(dead_code)]
pub async fn register_and_login(
    app: &axum::Router,
    username: &str,
    email: &str,
    password: &str,
) -> String {
    let (status, _) = request(
        app,
        "POST",
        "/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({
            "identifier": username,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().expect("login token").to_string()
}
