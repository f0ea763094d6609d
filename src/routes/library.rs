// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Library management routes (all require authentication).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::{Game, GameStatus, LibraryEntry};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/library", get(list_library).post(add_game))
        .route("/api/library/{entry_id}", put(update_status).delete(remove_game))
        .route("/api/library/status/{igdb_id}", get(get_library_status))
}

/// Parse a client-supplied status string or fail with 400.
fn parse_status(status: Option<String>) -> Result<GameStatus> {
    let Some(raw) = status else {
        return Err(AppError::Validation("Status is required".to_string()));
    };
    GameStatus::parse(&raw).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status. Must be one of: {}",
            GameStatus::VALID.join(", ")
        ))
    })
}

// ─── Add ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AddGameRequest {
    igdb_game_id: Option<i64>,
    status: Option<String>,
}

#[derive(Serialize)]
pub struct AddGameResponse {
    pub message: String,
    pub game: LibraryEntry,
}

/// Add a game to the caller's library.
async fn add_game(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<AddGameRequest>,
) -> Result<(StatusCode, Json<AddGameResponse>)> {
    let igdb_game_id = payload
        .igdb_game_id
        .ok_or_else(|| AppError::Validation("Game ID is required".to_string()))?;
    let status = parse_status(payload.status)?;

    let entry = state.db.add_entry(user.id, igdb_game_id, status).await?;

    tracing::info!(
        account_id = user.id,
        igdb_game_id,
        status = %status,
        "Game added to library"
    );

    Ok((
        StatusCode::CREATED,
        Json(AddGameResponse {
            message: "Game added successfully".to_string(),
            game: entry,
        }),
    ))
}

// ─── List ────────────────────────────────────────────────────

/// A library entry enriched with catalog details.
#[derive(Serialize)]
pub struct LibraryItem {
    pub id: i64,
    pub igdb_game_id: i64,
    pub status: GameStatus,
    pub details: Game,
}

/// List the caller's library, enriched with catalog details.
///
/// Entries whose catalog item cannot be resolved are dropped, mirroring
/// the batched-lookup semantics. An empty library short-circuits before
/// any upstream call.
async fn list_library(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<LibraryItem>>> {
    let entries = state.db.list_entries(user.id).await?;
    if entries.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let ids: Vec<i64> = entries.iter().map(|e| e.igdb_game_id).collect();
    let games = state.igdb.get_many(&ids).await?;
    let mut by_id: HashMap<i64, Game> = games.into_iter().map(|g| (g.id, g)).collect();

    let library = entries
        .into_iter()
        .filter_map(|entry| {
            by_id.remove(&entry.igdb_game_id).map(|details| LibraryItem {
                id: entry.id,
                igdb_game_id: entry.igdb_game_id,
                status: entry.status,
                details,
            })
        })
        .collect();

    Ok(Json(library))
}

// ─── Status Lookup ───────────────────────────────────────────

#[derive(Serialize)]
pub struct LibraryStatusResponse {
    #[serde(rename = "inLibrary")]
    pub in_library: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<GameStatus>,
}

/// Check whether a single game is in the caller's library.
///
/// Absence is a valid result, never an error.
async fn get_library_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(igdb_id): Path<i64>,
) -> Result<Json<LibraryStatusResponse>> {
    let entry = state.db.find_entry_by_game(user.id, igdb_id).await?;

    let response = match entry {
        Some(entry) => LibraryStatusResponse {
            in_library: true,
            id: Some(entry.id),
            status: Some(entry.status),
        },
        None => LibraryStatusResponse {
            in_library: false,
            id: None,
            status: None,
        },
    };

    Ok(Json(response))
}

// ─── Update / Remove ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    status: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub status: GameStatus,
}

/// Update the status of an entry owned by the caller.
async fn update_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(entry_id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let status = parse_status(payload.status)?;

    let entry = state
        .db
        .update_entry_status(user.id, entry_id, status)
        .await?;

    Ok(Json(UpdateStatusResponse {
        message: "Game status updated successfully".to_string(),
        status: entry.status,
    }))
}

#[derive(Serialize)]
pub struct RemoveGameResponse {
    pub message: String,
}

/// Remove an entry owned by the caller.
async fn remove_game(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(entry_id): Path<i64>,
) -> Result<Json<RemoveGameResponse>> {
    state.db.remove_entry(user.id, entry_id).await?;

    Ok(Json(RemoveGameResponse {
        message: "Game removed from library successfully".to_string(),
    }))
}
