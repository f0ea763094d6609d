// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GameUp: personal game library tracker
//!
//! This crate provides the backend API for tracking a personal game library
//! against the IGDB catalog and generating play recommendations.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::{GeminiClient, IgdbService, RecommendationService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub igdb: IgdbService,
    pub recommender: RecommendationService,
}

impl AppState {
    /// Wire up services from a loaded config and connected database.
    pub fn new(config: Config, db: Db) -> Self {
        let igdb = IgdbService::new(
            config.igdb_client_id.clone(),
            config.igdb_client_secret.clone(),
        );
        let gemini = GeminiClient::new(config.gemini_api_key.clone());
        let recommender = RecommendationService::new(igdb.clone(), gemini);

        Self {
            config,
            db,
            igdb,
            recommender,
        }
    }
}
