// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! IGDB API client with cached upstream access token.
//!
//! Handles:
//! - Client-credentials token exchange against the Twitch auth endpoint
//! - In-memory token caching with a serve margin and expiry buffer
//! - Catalog queries (search, details, batched lookup)

use crate::error::AppError;
use crate::models::game::{Cover, Game, GameDetails, RawGameDetails};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Remaining lifetime below which a cached token is not served (1 minute).
const TOKEN_SERVE_MARGIN_SECS: i64 = 60;

/// Buffer subtracted from the upstream-reported lifetime when caching
/// (5 minutes), so the cached expiry is always on the safe side.
const TOKEN_EXPIRY_BUFFER_SECS: i64 = 300;

/// Maximum number of search results requested from IGDB.
const SEARCH_LIMIT: usize = 20;

/// Cached upstream access token with expiry information.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Process-wide cache for the IGDB access token.
///
/// The mutex is held across the whole check-and-refresh, so a burst of
/// requests arriving with a cold cache performs exactly one exchange.
#[derive(Default)]
pub struct TokenCache {
    inner: Mutex<Option<CachedToken>>,
}

/// IGDB catalog client.
#[derive(Clone)]
pub struct IgdbService {
    http: reqwest::Client,
    auth_url: String,
    games_url: String,
    client_id: String,
    client_secret: String,
    cache: Arc<TokenCache>,
}

impl IgdbService {
    /// Create a new IGDB client with Twitch OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_endpoints(
            client_id,
            client_secret,
            "https://id.twitch.tv/oauth2/token".to_string(),
            "https://api.igdb.com/v4/games".to_string(),
        )
    }

    /// Create a client against custom endpoints (used by tests).
    pub fn with_endpoints(
        client_id: String,
        client_secret: String,
        auth_url: String,
        games_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url,
            games_url,
            client_id,
            client_secret,
            cache: Arc::new(TokenCache::default()),
        }
    }

    // ─── Token Management ────────────────────────────────────────

    /// Get a valid upstream access token, refreshing if needed.
    ///
    /// A cached token with more than the serve margin of life left is
    /// returned without any network call. A failed exchange leaves any
    /// previously cached token in place; stale-but-valid tokens are not
    /// evicted by a failed refresh attempt.
    pub async fn get_token(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let margin = Duration::seconds(TOKEN_SERVE_MARGIN_SECS);

        let mut cached = self.cache.inner.lock().await;

        if let Some(token) = cached.as_ref() {
            if now + margin < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .http
            .post(&self.auth_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("IGDB token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::Upstream(format!(
                "IGDB token exchange failed with status {}",
                status
            )));
        }

        let token_response: TwitchTokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("IGDB token parse error: {}", e)))?;

        let expires_at =
            now + Duration::seconds(token_response.expires_in - TOKEN_EXPIRY_BUFFER_SECS);

        *cached = Some(CachedToken {
            access_token: token_response.access_token.clone(),
            expires_at,
        });

        tracing::info!(expires_at = %expires_at, "Obtained new IGDB token");
        Ok(token_response.access_token)
    }

    /// Seed the token cache directly (used by tests).
    pub async fn seed_token(&self, access_token: &str, expires_at: DateTime<Utc>) {
        let mut cached = self.cache.inner.lock().await;
        *cached = Some(CachedToken {
            access_token: access_token.to_string(),
            expires_at,
        });
    }

    /// The token currently held in the cache, if any (used by tests).
    pub async fn cached_token(&self) -> Option<String> {
        let cached = self.cache.inner.lock().await;
        cached.as_ref().map(|t| t.access_token.clone())
    }

    // ─── Catalog Queries ─────────────────────────────────────────

    /// Free-text title search, limited to primary releases.
    ///
    /// `where category = (0)` filters out DLC, expansions and the like.
    pub async fn search(&self, text: &str) -> Result<Vec<Game>, AppError> {
        // Embedded quotes would terminate the IGDB query string early.
        let sanitized = text.replace('"', " ");
        let body = format!(
            "fields name, cover.url, first_release_date, summary; \
             search \"{}\"; where category = (0); limit {};",
            sanitized, SEARCH_LIMIT
        );

        let mut games: Vec<Game> = self.query(body).await?;
        for game in &mut games {
            enlarge_cover(&mut game.cover);
        }
        Ok(games)
    }

    /// Best match for a single title, if any.
    pub async fn search_one(&self, title: &str) -> Result<Option<Game>, AppError> {
        let sanitized = title.replace('"', " ");
        let body = format!(
            "fields name, cover.url, first_release_date, summary; \
             search \"{}\"; where category = (0); limit 1;",
            sanitized
        );

        let mut games: Vec<Game> = self.query(body).await?;
        let mut game = match games.pop() {
            Some(g) => g,
            None => return Ok(None),
        };
        enlarge_cover(&mut game.cover);
        Ok(Some(game))
    }

    /// Extended fields for a single game.
    pub async fn get_details(&self, id: i64) -> Result<GameDetails, AppError> {
        let body = format!(
            "fields name, cover.url, first_release_date, summary, \
             genres.name, platforms.name, \
             involved_companies.company.name, \
             involved_companies.developer, involved_companies.publisher; \
             where id = {};",
            id
        );

        let mut results: Vec<RawGameDetails> = self.query(body).await?;
        if results.is_empty() {
            return Err(AppError::NotFound("Game not found".to_string()));
        }

        let mut details = GameDetails::from(results.remove(0));
        enlarge_cover(&mut details.cover);
        Ok(details)
    }

    /// Batched lookup by ID set.
    ///
    /// IDs with no matching upstream record are silently omitted.
    pub async fn get_many(&self, ids: &[i64]) -> Result<Vec<Game>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let body = format!(
            "fields name, cover.url, first_release_date; where id = ({}); limit {};",
            id_list,
            ids.len()
        );

        let mut games: Vec<Game> = self.query(body).await?;
        for game in &mut games {
            enlarge_cover(&mut game.cover);
        }
        Ok(games)
    }

    /// POST an IGDB query body to the games endpoint and parse the response.
    async fn query<T: DeserializeOwned>(&self, body: String) -> Result<Vec<T>, AppError> {
        let token = self.get_token().await?;

        let response = self
            .http
            .post(&self.games_url)
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("IGDB request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "IGDB returned HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("IGDB JSON parse error: {}", e)))
    }
}

/// Rewrite a thumbnail cover URL to request the larger variant.
fn enlarge_cover(cover: &mut Option<Cover>) {
    if let Some(cover) = cover {
        cover.url = cover.url.replace("t_thumb", "t_cover_big");
    }
}

/// Client-credentials response from the Twitch auth endpoint.
#[derive(Debug, Clone, Deserialize)]
struct TwitchTokenResponse {
    access_token: String,
    expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enlarge_cover_rewrites_size_qualifier() {
        let mut cover = Some(Cover {
            url: "//images.igdb.com/igdb/image/upload/t_thumb/co1r7f.jpg".to_string(),
        });
        enlarge_cover(&mut cover);
        assert_eq!(
            cover.unwrap().url,
            "//images.igdb.com/igdb/image/upload/t_cover_big/co1r7f.jpg"
        );
    }

    #[test]
    fn enlarge_cover_handles_missing_cover() {
        let mut cover = None;
        enlarge_cover(&mut cover);
        assert!(cover.is_none());
    }
}
