// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod gemini;
pub mod igdb;
pub mod recommend;

pub use gemini::GeminiClient;
pub use igdb::IgdbService;
pub use recommend::{Recommendation, RecommendationService};
