// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Protected routes accept requests with valid tokens
//! 3. Tokens for accounts that no longer exist are rejected
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = common::request(&app, "GET", "/api/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // Middleware failures carry the same JSON error body as handler errors.
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = common::create_test_app().await;

    let (status, body) =
        common::request(&app, "GET", "/api/me", Some("invalid.token.here"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_token_for_missing_account_is_rejected() {
    let (app, state) = common::create_test_app().await;

    // Valid signature, but no such account row exists.
    let token = gameup::middleware::auth::create_jwt(999, &state.config.jwt_signing_key).unwrap();

    let (status, body) = common::request(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let (app, _) = common::create_test_app().await;

    let token = common::register_and_login(&app, "sam", "sam@example.com", "Passw0rd!").await;

    let (status, body) = common::request(&app, "GET", "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "sam");
}

#[tokio::test]
async fn test_profile_reports_completed_count() {
    let (app, _) = common::create_test_app().await;

    let token = common::register_and_login(&app, "sam", "sam@example.com", "Passw0rd!").await;

    let add = serde_json::json!({ "igdb_game_id": 7346, "status": "Completed" });
    let (status, _) = common::request(&app, "POST", "/api/library", Some(&token), Some(add)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = common::request(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "sam");
    assert_eq!(body["email"], "sam@example.com");
    assert_eq!(body["completed_games_count"], 1);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/me")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_route_no_auth_required() {
    let (app, _) = common::create_test_app().await;

    let (status, body) = common::request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
