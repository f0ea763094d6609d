// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Accounts (registration, lookup by id or identifier)
//! - Library entries (add/list/update/remove with ownership checks)
//!
//! Uniqueness (username, email, and the per-user game pair) is enforced by
//! database constraints; violations surface as `AppError::Conflict` from the
//! insert itself rather than a racy pre-check.

use crate::error::AppError;
use crate::models::{Account, GameStatus, LibraryEntry};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database handle shared across requests.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to the database and create the schema if needed.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true);

        // An in-memory database exists per connection, so the pool must be
        // pinned to a single long-lived connection to see consistent data.
        let mut pool_options = SqlitePoolOptions::new();
        if database_url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;

        let db = Self { pool };
        db.init_schema().await?;

        tracing::info!(url = database_url, "Connected to SQLite");
        Ok(db)
    }

    /// Create tables if they do not exist yet.
    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                igdb_game_id INTEGER NOT NULL,
                status TEXT NOT NULL,
                UNIQUE (user_id, igdb_game_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    // ─── Account Operations ──────────────────────────────────────

    /// Insert a new account.
    ///
    /// Returns `Conflict` when the username or email is already taken.
    pub async fn create_account(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, AppError> {
        let created_at = chrono::Utc::now().to_rfc3339();

        let id = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("This username or email is already taken".to_string())
            } else {
                db_err(e)
            }
        })?
        .last_insert_rowid();

        Ok(Account {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    /// Get an account by ID.
    pub async fn get_account(&self, id: i64) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    /// Find an account by username or email (login identifier).
    pub async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Account>, AppError> {
        sqlx::query_as::<_, Account>("SELECT * FROM users WHERE username = ? OR email = ?")
            .bind(identifier)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)
    }

    // ─── Library Operations ──────────────────────────────────────

    /// Add a game to a user's library.
    ///
    /// Returns `Conflict` when the game is already in the library.
    pub async fn add_entry(
        &self,
        user_id: i64,
        igdb_game_id: i64,
        status: GameStatus,
    ) -> Result<LibraryEntry, AppError> {
        let id = sqlx::query(
            r#"
            INSERT INTO user_games (user_id, igdb_game_id, status)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(igdb_game_id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("This game is already in your library".to_string())
            } else {
                db_err(e)
            }
        })?
        .last_insert_rowid();

        Ok(LibraryEntry {
            id,
            user_id,
            igdb_game_id,
            status,
        })
    }

    /// All library entries for a user.
    pub async fn list_entries(&self, user_id: i64) -> Result<Vec<LibraryEntry>, AppError> {
        sqlx::query_as::<_, LibraryEntry>("SELECT * FROM user_games WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)
    }

    /// Look up a single game in a user's library. Absence is not an error.
    pub async fn find_entry_by_game(
        &self,
        user_id: i64,
        igdb_game_id: i64,
    ) -> Result<Option<LibraryEntry>, AppError> {
        sqlx::query_as::<_, LibraryEntry>(
            "SELECT * FROM user_games WHERE user_id = ? AND igdb_game_id = ?",
        )
        .bind(user_id)
        .bind(igdb_game_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Library entries for a user with a given status.
    pub async fn list_entries_with_status(
        &self,
        user_id: i64,
        status: GameStatus,
    ) -> Result<Vec<LibraryEntry>, AppError> {
        sqlx::query_as::<_, LibraryEntry>(
            "SELECT * FROM user_games WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Count of a user's entries with a given status.
    pub async fn count_entries_with_status(
        &self,
        user_id: i64,
        status: GameStatus,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM user_games WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    /// Update the status of an entry owned by the user.
    ///
    /// Returns `NotFound` when no such entry belongs to the user.
    pub async fn update_entry_status(
        &self,
        user_id: i64,
        entry_id: i64,
        status: GameStatus,
    ) -> Result<LibraryEntry, AppError> {
        let result = sqlx::query("UPDATE user_games SET status = ? WHERE id = ? AND user_id = ?")
            .bind(status)
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Game not found in your library".to_string(),
            ));
        }

        let entry = sqlx::query_as::<_, LibraryEntry>("SELECT * FROM user_games WHERE id = ?")
            .bind(entry_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(entry)
    }

    /// Remove an entry owned by the user.
    ///
    /// Returns `NotFound` under the same ownership rule as update.
    pub async fn remove_entry(&self, user_id: i64, entry_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_games WHERE id = ? AND user_id = ?")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Game not found in your library".to_string(),
            ));
        }

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|d| d.kind() == sqlx::error::ErrorKind::UniqueViolation)
}
