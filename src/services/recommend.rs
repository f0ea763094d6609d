// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recommendation composer.
//!
//! Combines the user's completed games, a Gemini text-generation call, and
//! catalog lookups into a list of suggestions with attached details.
//! Per-suggestion lookup failures are logged and dropped rather than
//! failing the whole request.

use crate::db::Db;
use crate::error::AppError;
use crate::models::{Game, GameStatus};
use crate::services::{GeminiClient, IgdbService};
use serde::{Deserialize, Serialize};

/// Number of suggestions requested from the model.
const SUGGESTION_COUNT: usize = 3;

/// A recommendation returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub reason: String,
    pub details: Game,
}

/// A suggestion as produced by the model.
#[derive(Debug, Clone, Deserialize)]
struct Suggestion {
    title: String,
    reason: String,
}

/// Recommendation service composing catalog and AI clients.
#[derive(Clone)]
pub struct RecommendationService {
    igdb: IgdbService,
    gemini: GeminiClient,
}

impl RecommendationService {
    pub fn new(igdb: IgdbService, gemini: GeminiClient) -> Self {
        Self { igdb, gemini }
    }

    /// Generate recommendations for a user based on their completed games.
    ///
    /// Fails with a validation error before any network call when the user
    /// has no completed entries.
    pub async fn recommend(&self, db: &Db, user_id: i64) -> Result<Vec<Recommendation>, AppError> {
        let completed = db
            .list_entries_with_status(user_id, GameStatus::Completed)
            .await?;

        if completed.is_empty() {
            return Err(AppError::Validation(
                "Complete at least one game to get recommendations".to_string(),
            ));
        }

        let ids: Vec<i64> = completed.iter().map(|e| e.igdb_game_id).collect();
        let games = self.igdb.get_many(&ids).await?;
        let titles: Vec<String> = games.into_iter().map(|g| g.name).collect();

        if titles.is_empty() {
            return Err(AppError::Upstream(
                "Could not resolve any completed game titles".to_string(),
            ));
        }

        let prompt = build_prompt(&titles);
        let raw = self.gemini.generate_text(&prompt).await?;
        let suggestions = parse_suggestions(&raw)?;

        let mut recommendations = Vec::with_capacity(suggestions.len());
        for suggestion in suggestions {
            match self.igdb.search_one(&suggestion.title).await {
                Ok(Some(details)) => recommendations.push(Recommendation {
                    reason: suggestion.reason,
                    details,
                }),
                Ok(None) => {
                    tracing::warn!(title = %suggestion.title, "No catalog match for suggestion, dropping");
                }
                Err(e) => {
                    tracing::warn!(title = %suggestion.title, error = %e, "Suggestion lookup failed, dropping");
                }
            }
        }

        Ok(recommendations)
    }
}

/// Build the deterministic prompt for the model.
fn build_prompt(completed_titles: &[String]) -> String {
    let list = completed_titles.join(", ");
    format!(
        "You are a video game recommendation engine. A user has completed the \
         following games: {list}. Suggest exactly {SUGGESTION_COUNT} other games \
         they are likely to enjoy. Do not suggest any of the games listed above. \
         Respond with only a strict JSON array of objects with the keys \
         \"title\" and \"reason\", and no other text."
    )
}

/// Strip Markdown code-fence markers the model often wraps JSON in.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn parse_suggestions(raw: &str) -> Result<Vec<Suggestion>, AppError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| AppError::Upstream(format!("Failed to parse AI response: {}", e)))
}
