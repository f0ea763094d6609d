//! Application configuration loaded from environment variables.
//!
//! All secrets (JWT signing key, IGDB credentials, Gemini API key) are read
//! once at startup and cached in memory for the life of the process.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// IGDB / Twitch OAuth client ID (public)
    pub igdb_client_id: String,
    /// IGDB / Twitch OAuth client secret
    pub igdb_client_secret: String,
    /// Gemini API key for recommendation generation
    pub gemini_api_key: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Database connection URL
    pub database_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// For local development, variables can be supplied via a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            igdb_client_id: env::var("IGDB_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("IGDB_CLIENT_ID"))?,
            igdb_client_secret: env::var("IGDB_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("IGDB_CLIENT_SECRET"))?,
            gemini_api_key: env::var("GEMINI_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GEMINI_API_KEY"))?,
            jwt_signing_key: env::var("SECRET_KEY")
                .map_err(|_| ConfigError::Missing("SECRET_KEY"))?
                .into_bytes(),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://gameup.db".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            igdb_client_id: "test_client_id".to_string(),
            igdb_client_secret: "test_secret".to_string(),
            gemini_api_key: "test_gemini_key".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            database_url: "sqlite::memory:".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
