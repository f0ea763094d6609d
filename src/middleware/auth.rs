// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JWT authentication middleware.
//!
//! Every failure mode (missing header, malformed or expired token, bad
//! signature, account no longer present) yields the same 401 so callers
//! cannot probe which part failed.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session token lifetime (24 hours).
const TOKEN_LIFETIME_SECS: usize = 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated account resolved from the JWT, injected into request
/// extensions for handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

/// Middleware that requires valid JWT authentication.
///
/// Resolves the account row so handlers receive a live account, not just
/// a claim; a token for a deleted account is rejected like any other.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        _ => return Err(AppError::Auth),
    };

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|_| AppError::Auth)?;

    let account_id: i64 = token_data.claims.sub.parse().map_err(|_| AppError::Auth)?;

    let account = state
        .db
        .get_account(account_id)
        .await
        .map_err(|_| AppError::Auth)?
        .ok_or(AppError::Auth)?;

    let current_user = CurrentUser {
        id: account.id,
        username: account.username,
        email: account.email,
    };
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(account_id: i64, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: account_id.to_string(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
