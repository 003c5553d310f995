//! Foosball Rating - TrueSkill rating engine for foosball players and teams
//!
//! This crate provides the pure two-competitor rating update, derived
//! leaderboard metrics, per-scale defaults, and in-process store, recorder
//! and replay collaborators around the engine.

pub mod config;
pub mod error;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, RatingResult, Result};
pub use types::*;

// Re-export key components
pub use rating::{conservative_rating, initial_rating, MatchRecorder, RatingEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
