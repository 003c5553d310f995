//! Rebuild ratings from an ordered match log
//!
//! Replaying every match from the default initial states reproduces the
//! current rating of every competitor, since the engine has no hidden state
//! and no randomness.

use crate::error::{RatingError, RatingResult};
use crate::rating::engine::RatingEngine;
use crate::types::{CompetitorId, MatchResult, RatingState, Scale};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::info;

/// Final state of one competitor after a replay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayedCompetitor {
    pub scale: Scale,
    pub rating: RatingState,
    pub games_played: u64,
}

/// Result of replaying a match log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub competitors: BTreeMap<CompetitorId, ReplayedCompetitor>,
    pub matches_applied: usize,
}

impl ReplayOutcome {
    pub fn rating_of(&self, competitor_id: &str) -> Option<RatingState> {
        self.competitors.get(competitor_id).map(|c| c.rating)
    }
}

/// Replay `matches` in `played_at` order from the default states.
///
/// Matches with equal timestamps keep their order in the slice. The first
/// invalid or repeated match aborts the replay.
pub fn replay(engine: &RatingEngine, matches: &[MatchResult]) -> RatingResult<ReplayOutcome> {
    let mut ordered: Vec<&MatchResult> = matches.iter().collect();
    ordered.sort_by_key(|result| result.played_at);

    let mut outcome = ReplayOutcome::default();
    let mut seen = HashSet::with_capacity(ordered.len());
    for result in ordered {
        if !seen.insert(result.id) {
            return Err(RatingError::DuplicateMatch {
                match_id: result.id,
            });
        }

        let state_a = current_state(engine, &outcome, &result.competitor_a, result.scale)?;
        let state_b = current_state(engine, &outcome, &result.competitor_b, result.scale)?;

        let calculation = engine.rate_pairing(
            result.scale,
            (&result.competitor_a, &state_a),
            (&result.competitor_b, &state_b),
            result.winner.as_ref(),
        )?;

        for change in calculation.rating_changes {
            let competitor = outcome
                .competitors
                .entry(change.competitor_id)
                .or_insert(ReplayedCompetitor {
                    scale: result.scale,
                    rating: change.old_rating,
                    games_played: 0,
                });
            competitor.rating = change.new_rating;
            competitor.games_played += 1;
        }
        outcome.matches_applied += 1;
    }

    info!(
        "Replayed {} matches for {} competitors",
        outcome.matches_applied,
        outcome.competitors.len()
    );
    Ok(outcome)
}

fn current_state(
    engine: &RatingEngine,
    outcome: &ReplayOutcome,
    competitor_id: &CompetitorId,
    scale: Scale,
) -> RatingResult<RatingState> {
    match outcome.competitors.get(competitor_id) {
        Some(competitor) if competitor.scale != scale => Err(RatingError::ScaleMismatch {
            competitor_id: competitor_id.clone(),
            expected: scale,
            actual: competitor.scale,
        }),
        Some(competitor) => Ok(competitor.rating),
        None => Ok(engine.initial_rating(scale)),
    }
}
