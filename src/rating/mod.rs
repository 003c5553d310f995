//! TrueSkill rating system for foosball players and teams
//!
//! This module provides the pure two-competitor rating engine, derived display
//! metrics, per-scale defaults, and the store/recorder/leaderboard
//! collaborators built on top of it.

pub mod derived;
pub mod engine;
pub mod history;
pub mod initial;
pub mod leaderboard;
pub mod recorder;
pub mod replay;
pub mod scale;
pub mod storage;

// Re-export commonly used types
pub use derived::{classify_confidence, conservative_rating, display_rating, Confidence, RatingSummary};
pub use engine::{MatchUpdate, RatingCalculationResult, RatingChange, RatingEngine};
pub use history::RatingHistoryEntry;
pub use initial::initial_rating;
pub use leaderboard::{Leaderboard, LeaderboardRow};
pub use recorder::MatchRecorder;
pub use replay::{replay, ReplayOutcome};
pub use scale::ScaleParams;
pub use storage::{CompetitorEntry, InMemoryRatingStore, RatingStore};
