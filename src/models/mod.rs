// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod game;
pub mod library;
pub mod user;

pub use game::{Game, GameDetails};
pub use library::{GameStatus, LibraryEntry};
pub use user::Account;
