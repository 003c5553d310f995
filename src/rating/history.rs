//! Immutable per-match rating history rows
//!
//! One entry is written per competitor per match at the moment the update is
//! applied. Entries are a cached convenience for progression charts; the
//! ordered list of match results stays the source of truth.

use crate::rating::engine::RatingChange;
use crate::types::{CompetitorId, MatchId, RatingState, Scale};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the rating system recorded on every history row
pub const RATING_SYSTEM: &str = "trueskill";

/// Before/after rating snapshot for one competitor in one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingHistoryEntry {
    pub competitor_id: CompetitorId,
    pub match_id: MatchId,
    pub scale: Scale,
    pub mu_before: f64,
    pub sigma_before: f64,
    pub mu_after: f64,
    pub sigma_after: f64,
    pub rating_system: String,
    pub recorded_at: DateTime<Utc>,
}

impl RatingHistoryEntry {
    /// Snapshot a rating change
    pub fn from_change(
        match_id: MatchId,
        scale: Scale,
        change: &RatingChange,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            competitor_id: change.competitor_id.clone(),
            match_id,
            scale,
            mu_before: change.old_rating.mu,
            sigma_before: change.old_rating.sigma,
            mu_after: change.new_rating.mu,
            sigma_after: change.new_rating.sigma,
            rating_system: RATING_SYSTEM.to_string(),
            recorded_at,
        }
    }

    pub fn before(&self) -> RatingState {
        RatingState {
            mu: self.mu_before,
            sigma: self.sigma_before,
        }
    }

    pub fn after(&self) -> RatingState {
        RatingState {
            mu: self.mu_after,
            sigma: self.sigma_after,
        }
    }

    pub fn mu_change(&self) -> f64 {
        self.mu_after - self.mu_before
    }

    pub fn sigma_change(&self) -> f64 {
        self.sigma_after - self.sigma_before
    }

    pub fn conservative_rating_before(&self) -> f64 {
        self.before().conservative_rating()
    }

    pub fn conservative_rating_after(&self) -> f64 {
        self.after().conservative_rating()
    }

    pub fn conservative_rating_change(&self) -> f64 {
        self.conservative_rating_after() - self.conservative_rating_before()
    }
}
