//! Leaderboard projection
//!
//! Ranks the competitors of one scale by conservative rating, highest first.
//! Ties are broken by competitor id so the order is stable between runs.

use crate::error::RatingResult;
use crate::rating::derived::{display_rating, Confidence, RatingSummary};
use crate::rating::engine::RatingEngine;
use crate::rating::storage::CompetitorEntry;
use crate::types::{CompetitorId, Scale};
use crate::utils::rating_difference;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One ranked line of a leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// 1-based position
    pub rank: usize,
    pub competitor_id: CompetitorId,
    pub summary: RatingSummary,
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_percentage: f64,
    /// Conservative rating points behind the leader
    pub gap_to_leader: f64,
}

impl LeaderboardRow {
    pub fn conservative_rating(&self) -> f64 {
        self.summary.conservative_rating
    }

    pub fn confidence(&self) -> Confidence {
        self.summary.confidence
    }

    /// Single display line
    pub fn display(&self) -> String {
        format!(
            "{:>3}. {:<20} {:>7}  mu {:>6}  sigma {:>5}  {:<6}  {}W-{}L ({}%)",
            self.rank,
            self.competitor_id,
            display_rating(self.summary.conservative_rating),
            display_rating(self.summary.mu),
            display_rating(self.summary.sigma),
            self.summary.confidence,
            self.wins,
            self.losses,
            display_rating(self.win_percentage)
        )
    }
}

/// Read-side ranking over one scale
pub struct Leaderboard<'a> {
    engine: &'a RatingEngine,
    scale: Scale,
}

impl<'a> Leaderboard<'a> {
    pub fn new(engine: &'a RatingEngine, scale: Scale) -> Self {
        Self { engine, scale }
    }

    /// Rank `entries`, ignoring those rated on another scale
    pub fn rank(&self, entries: &[CompetitorEntry]) -> RatingResult<Vec<LeaderboardRow>> {
        let mut scored = Vec::with_capacity(entries.len());
        for entry in entries.iter().filter(|entry| entry.scale == self.scale) {
            let summary = self.engine.summarize(self.scale, &entry.rating)?;
            scored.push((entry, summary));
        }

        scored.sort_by(|(entry_a, summary_a), (entry_b, summary_b)| {
            summary_b
                .conservative_rating
                .partial_cmp(&summary_a.conservative_rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| entry_a.competitor_id.cmp(&entry_b.competitor_id))
        });

        let leader_rating = scored
            .first()
            .map(|(_, summary)| summary.conservative_rating)
            .unwrap_or_default();

        Ok(scored
            .into_iter()
            .enumerate()
            .map(|(index, (entry, summary))| LeaderboardRow {
                rank: index + 1,
                competitor_id: entry.competitor_id.clone(),
                summary,
                games_played: entry.games_played,
                wins: entry.wins,
                losses: entry.losses,
                win_percentage: entry.win_percentage(),
                gap_to_leader: rating_difference(leader_rating, summary.conservative_rating),
            })
            .collect())
    }
}
