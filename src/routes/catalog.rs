// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalog routes (search and game details).

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Game, GameDetails};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/search", post(search_games))
        .route("/api/game/{id}", get(get_game_details))
}

#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchText")]
    search_text: Option<String>,
}

/// Free-text catalog search.
async fn search_games(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<Game>>> {
    let text = match payload.search_text {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            return Err(AppError::Validation("Search text is required".to_string()));
        }
    };

    let games = state.igdb.search(&text).await?;
    Ok(Json(games))
}

/// Extended details for a single game.
async fn get_game_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<GameDetails>> {
    let details = state.igdb.get_details(id).await?;
    Ok(Json(details))
}
