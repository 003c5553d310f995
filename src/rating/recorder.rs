//! Match recording on top of the pure rating engine
//!
//! The recorder is the read-modify-write boundary around the engine: it loads
//! both competitors (creating defaults for newcomers), rates the match and
//! commits the new states together with their history rows in one store call.
//! Recording is serialized so two matches sharing a competitor never rate
//! against the same stale state.

use crate::error::RatingError;
use crate::rating::engine::{RatingCalculationResult, RatingEngine};
use crate::rating::history::RatingHistoryEntry;
use crate::rating::leaderboard::{Leaderboard, LeaderboardRow};
use crate::rating::storage::{CompetitorEntry, RatingStore};
use crate::types::{CompetitorId, MatchResult, Scale};
use crate::utils::current_timestamp;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Records match results into a rating store
pub struct MatchRecorder<S: RatingStore> {
    engine: RatingEngine,
    store: Arc<S>,
    update_lock: Mutex<()>,
}

impl<S: RatingStore> MatchRecorder<S> {
    pub fn new(engine: RatingEngine, store: Arc<S>) -> Self {
        Self {
            engine,
            store,
            update_lock: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Rate one match and persist the outcome.
    ///
    /// On any error the store is left untouched.
    pub fn record_match(&self, result: &MatchResult) -> crate::error::Result<RatingCalculationResult> {
        let _guard = self
            .update_lock
            .lock()
            .map_err(|_| RatingError::StorageError {
                message: "Failed to acquire recorder lock".to_string(),
            })?;

        let entry_a = self.load_or_create(&result.competitor_a, result.scale)?;
        let entry_b = self.load_or_create(&result.competitor_b, result.scale)?;

        let calculation = self
            .engine
            .rate_pairing(
                result.scale,
                (&entry_a.competitor_id, &entry_a.rating),
                (&entry_b.competitor_id, &entry_b.rating),
                result.winner.as_ref(),
            )
            .map_err(|e| {
                warn!(match_id = %result.id, "Rejected match result: {}", e);
                e
            })?;

        let recorded_at = current_timestamp();
        let mut entries = Vec::with_capacity(2);
        let mut history = Vec::with_capacity(2);
        for (mut entry, change) in [entry_a, entry_b]
            .into_iter()
            .zip(calculation.rating_changes.iter())
        {
            entry.record_result(change.new_rating, change.won);
            history.push(RatingHistoryEntry::from_change(
                result.id,
                result.scale,
                change,
                recorded_at,
            ));
            entries.push(entry);
        }

        self.store.commit_match(entries, history).map_err(|e| {
            warn!(match_id = %result.id, "Failed to commit match result: {:#}", e);
            e
        })?;

        debug!(
            match_id = %result.id,
            scale = %result.scale,
            surprise = calculation.surprise,
            "Recorded match between {} and {}",
            result.competitor_a,
            result.competitor_b
        );

        Ok(calculation)
    }

    /// Record several matches in `played_at` order.
    ///
    /// Stops at the first rejected match; matches before it stay recorded.
    pub fn record_matches(&self, results: &[MatchResult]) -> crate::error::Result<usize> {
        let mut ordered: Vec<&MatchResult> = results.iter().collect();
        ordered.sort_by_key(|result| result.played_at);

        for result in &ordered {
            self.record_match(result)?;
        }

        info!("Recorded {} matches", ordered.len());
        Ok(ordered.len())
    }

    /// Leaderboard of every competitor on `scale`
    pub fn leaderboard(&self, scale: Scale) -> crate::error::Result<Vec<LeaderboardRow>> {
        let entries = self.store.competitors_by_scale(scale)?;
        Ok(Leaderboard::new(&self.engine, scale).rank(&entries)?)
    }

    /// Recorded rating progression of one competitor
    pub fn rating_progression(
        &self,
        competitor_id: &CompetitorId,
    ) -> crate::error::Result<Vec<RatingHistoryEntry>> {
        if self.store.get_competitor(competitor_id)?.is_none() {
            return Err(RatingError::CompetitorNotFound {
                competitor_id: competitor_id.clone(),
            }
            .into());
        }
        self.store.history_for(competitor_id)
    }

    fn load_or_create(
        &self,
        competitor_id: &CompetitorId,
        scale: Scale,
    ) -> crate::error::Result<CompetitorEntry> {
        match self.store.get_competitor(competitor_id)? {
            Some(entry) if entry.scale != scale => Err(RatingError::ScaleMismatch {
                competitor_id: competitor_id.clone(),
                expected: scale,
                actual: entry.scale,
            }
            .into()),
            Some(entry) => Ok(entry),
            None => Ok(CompetitorEntry::new(
                competitor_id.clone(),
                scale,
                self.engine.initial_rating(scale),
            )),
        }
    }
}
