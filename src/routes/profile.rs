// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile and recommendation routes for authenticated users.

use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::GameStatus;
use crate::services::Recommendation;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/me", get(get_me))
        .route("/api/recommendations", get(get_recommendations))
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub completed_games_count: i64,
}

/// Current user profile with completed-game count.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProfileResponse>> {
    let completed_games_count = state
        .db
        .count_entries_with_status(user.id, GameStatus::Completed)
        .await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        completed_games_count,
    }))
}

#[derive(Serialize)]
pub struct MeResponse {
    pub username: String,
}

/// Lightweight identity check for the navbar.
async fn get_me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
    })
}

// ─── Recommendations ─────────────────────────────────────────

/// AI-generated recommendations based on completed games.
async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Recommendation>>> {
    let recommendations = state.recommender.recommend(&state.db, user.id).await?;
    Ok(Json(recommendations))
}
