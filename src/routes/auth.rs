// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and login routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::ValidateEmail;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Minimum password length.
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Register a new account.
///
/// Uniqueness of username and email is enforced by the insert itself;
/// a constraint violation surfaces as 409.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let username = required_field(payload.username, "Username")?;
    let email = required_field(payload.email, "Email")?;
    let password = required_field(payload.password, "Password")?;

    if !email.validate_email() {
        return Err(AppError::Validation(
            "Email address is not valid".to_string(),
        ));
    }
    validate_password(&password)?;

    let password_hash = hash_password(&password)?;
    let account = state
        .db
        .create_account(&username, &email, &password_hash)
        .await?;

    tracing::info!(account_id = account.id, username = %account.username, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: format!("User '{}' created successfully", account.username),
        }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    identifier: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Log in with username or email.
///
/// Failures are undifferentiated so callers cannot tell whether the
/// identifier or the password was wrong.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let identifier = required_field(payload.identifier, "Identifier")?;
    let password = required_field(payload.password, "Password")?;

    let account = state
        .db
        .find_by_identifier(&identifier)
        .await?
        .ok_or(AppError::Auth)?;

    if !verify_password(&password, &account.password_hash) {
        return Err(AppError::Auth);
    }

    let token = create_jwt(account.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(account_id = account.id, "Login successful");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Reject missing or empty request fields with a 400.
fn required_field(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{} is required", name))),
    }
}

/// Password policy: at least 8 chars, one upper, one lower, one digit.
fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }
    Ok(())
}

/// Hash a password with a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::{rand_core::OsRng, SaltString};
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC-format hash.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy_accepts_conforming_password() {
        assert!(validate_password("Abcdef12").is_ok());
    }

    #[test]
    fn password_policy_rejects_short() {
        assert!(matches!(
            validate_password("Ab1"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn password_policy_rejects_missing_classes() {
        assert!(validate_password("abcdefg1").is_err()); // no upper
        assert!(validate_password("ABCDEFG1").is_err()); // no lower
        assert!(validate_password("Abcdefgh").is_err()); // no digit
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("Sup3rSecret").unwrap();
        assert_ne!(hash, "Sup3rSecret");
        assert!(verify_password("Sup3rSecret", &hash));
        assert!(!verify_password("WrongPass1", &hash));
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify_password("Sup3rSecret", "not-a-phc-hash"));
    }

    #[test]
    fn required_field_rejects_missing_and_blank() {
        assert!(required_field(None, "Username").is_err());
        assert!(required_field(Some("   ".to_string()), "Username").is_err());
        assert_eq!(
            required_field(Some("sam".to_string()), "Username").unwrap(),
            "sam"
        );
    }
}
