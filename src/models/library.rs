// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Library entry model and play status.

use serde::{Deserialize, Serialize};

/// Play status of a game in a user's library.
///
/// Stored as the variant name in the `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum GameStatus {
    Playing,
    Completed,
    Dropped,
    Wishlist,
}

impl GameStatus {
    pub const VALID: [&'static str; 4] = ["Playing", "Completed", "Dropped", "Wishlist"];

    /// Parse a client-supplied status string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Playing" => Some(Self::Playing),
            "Completed" => Some(Self::Completed),
            "Dropped" => Some(Self::Dropped),
            "Wishlist" => Some(Self::Wishlist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Completed => "Completed",
            Self::Dropped => "Dropped",
            Self::Wishlist => "Wishlist",
        }
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's association between their account and a catalog game.
///
/// `(user_id, igdb_game_id)` pairs are unique per the table constraint.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LibraryEntry {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub igdb_game_id: i64,
    pub status: GameStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_all_valid_statuses() {
        for s in GameStatus::VALID {
            let status = GameStatus::parse(s).expect("valid status should parse");
            assert_eq!(status.as_str(), s);
        }
    }

    #[test]
    fn parse_rejects_unknown_and_wrong_case() {
        assert!(GameStatus::parse("Backlog").is_none());
        assert!(GameStatus::parse("playing").is_none());
        assert!(GameStatus::parse("").is_none());
    }
}
