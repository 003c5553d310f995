//! Competitor storage interface and implementations
//!
//! This module defines the interface for persisting and retrieving competitor
//! ratings and their history, with an in-memory implementation. A match's
//! competitor rows and history rows are committed together or not at all.

use crate::error::RatingError;
use crate::rating::history::RatingHistoryEntry;
use crate::types::{CompetitorId, MatchId, RatingState, Scale};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// Storage entry for a competitor's rating with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub competitor_id: CompetitorId,
    pub scale: Scale,
    pub rating: RatingState,
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl CompetitorEntry {
    /// Create a new entry for a competitor that has not played yet
    pub fn new(competitor_id: CompetitorId, scale: Scale, initial_rating: RatingState) -> Self {
        let now = Utc::now();
        Self {
            competitor_id,
            scale,
            rating: initial_rating,
            games_played: 0,
            wins: 0,
            losses: 0,
            created_at: now,
            last_updated: now,
        }
    }

    /// Apply a match outcome to the rating and the win/loss counters
    pub fn record_result(&mut self, new_rating: RatingState, won: bool) {
        self.rating = new_rating;
        self.games_played += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.last_updated = Utc::now();
    }

    /// Percentage of games won, 0.0 before the first game
    pub fn win_percentage(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins as f64 / self.games_played as f64 * 100.0
    }

    pub fn conservative_rating(&self) -> f64 {
        self.rating.conservative_rating()
    }
}

/// Trait for competitor storage operations
#[cfg_attr(test, mockall::automock)]
pub trait RatingStore: Send + Sync {
    /// Get a competitor's entry
    fn get_competitor(&self, competitor_id: &CompetitorId)
        -> crate::error::Result<Option<CompetitorEntry>>;

    /// Get entries for multiple competitors; unknown ids are omitted
    fn get_competitors(
        &self,
        competitor_ids: &[CompetitorId],
    ) -> crate::error::Result<HashMap<CompetitorId, CompetitorEntry>>;

    /// Store updated competitor entries and their history rows atomically.
    ///
    /// Fails with [`RatingError::DuplicateMatch`] and writes nothing if a
    /// history row names a match that is already recorded.
    fn commit_match(
        &self,
        entries: Vec<CompetitorEntry>,
        history: Vec<RatingHistoryEntry>,
    ) -> crate::error::Result<()>;

    /// All competitors rated on `scale`
    fn competitors_by_scale(&self, scale: Scale) -> crate::error::Result<Vec<CompetitorEntry>>;

    /// History rows for one competitor in the order they were recorded
    fn history_for(
        &self,
        competitor_id: &CompetitorId,
    ) -> crate::error::Result<Vec<RatingHistoryEntry>>;

    /// Total number of rated competitors
    fn competitor_count(&self) -> crate::error::Result<usize>;
}

/// History rows plus the ids of the matches they came from
#[derive(Debug, Default)]
struct HistoryLog {
    rows: Vec<RatingHistoryEntry>,
    match_ids: HashSet<MatchId>,
}

/// In-memory competitor storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    competitors: RwLock<HashMap<CompetitorId, CompetitorEntry>>,
    history: RwLock<HistoryLog>,
}

impl InMemoryRatingStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of history rows across all competitors
    pub fn history_len(&self) -> crate::error::Result<usize> {
        let history = self.history.read().map_err(|_| lock_error("history read"))?;
        Ok(history.rows.len())
    }
}

fn lock_error(kind: &str) -> RatingError {
    RatingError::StorageError {
        message: format!("Failed to acquire {} lock", kind),
    }
}

impl RatingStore for InMemoryRatingStore {
    fn get_competitor(
        &self,
        competitor_id: &CompetitorId,
    ) -> crate::error::Result<Option<CompetitorEntry>> {
        let competitors = self
            .competitors
            .read()
            .map_err(|_| lock_error("competitors read"))?;

        Ok(competitors.get(competitor_id).cloned())
    }

    fn get_competitors(
        &self,
        competitor_ids: &[CompetitorId],
    ) -> crate::error::Result<HashMap<CompetitorId, CompetitorEntry>> {
        let competitors = self
            .competitors
            .read()
            .map_err(|_| lock_error("competitors read"))?;

        let mut result = HashMap::new();
        for competitor_id in competitor_ids {
            if let Some(entry) = competitors.get(competitor_id) {
                result.insert(competitor_id.clone(), entry.clone());
            }
        }

        Ok(result)
    }

    fn commit_match(
        &self,
        entries: Vec<CompetitorEntry>,
        history: Vec<RatingHistoryEntry>,
    ) -> crate::error::Result<()> {
        // Both locks are held for the whole commit; always competitors first.
        let mut competitors = self
            .competitors
            .write()
            .map_err(|_| lock_error("competitors write"))?;
        let mut stored_history = self
            .history
            .write()
            .map_err(|_| lock_error("history write"))?;

        if let Some(row) = history
            .iter()
            .find(|row| stored_history.match_ids.contains(&row.match_id))
        {
            return Err(RatingError::DuplicateMatch {
                match_id: row.match_id,
            }
            .into());
        }

        for entry in entries {
            competitors.insert(entry.competitor_id.clone(), entry);
        }
        for row in history {
            stored_history.match_ids.insert(row.match_id);
            stored_history.rows.push(row);
        }

        Ok(())
    }

    fn competitors_by_scale(&self, scale: Scale) -> crate::error::Result<Vec<CompetitorEntry>> {
        let competitors = self
            .competitors
            .read()
            .map_err(|_| lock_error("competitors read"))?;

        Ok(competitors
            .values()
            .filter(|entry| entry.scale == scale)
            .cloned()
            .collect())
    }

    fn history_for(
        &self,
        competitor_id: &CompetitorId,
    ) -> crate::error::Result<Vec<RatingHistoryEntry>> {
        let history = self.history.read().map_err(|_| lock_error("history read"))?;

        Ok(history
            .rows
            .iter()
            .filter(|entry| &entry.competitor_id == competitor_id)
            .cloned()
            .collect())
    }

    fn competitor_count(&self) -> crate::error::Result<usize> {
        let competitors = self
            .competitors
            .read()
            .map_err(|_| lock_error("competitors read"))?;

        Ok(competitors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::initial::initial_rating;
    use crate::utils::{current_timestamp, generate_match_id};

    fn create_test_entry(competitor_id: &str, mu: f64) -> CompetitorEntry {
        CompetitorEntry::new(
            competitor_id.to_string(),
            Scale::Player,
            RatingState::new(mu, 8.0).unwrap(),
        )
    }

    fn create_history_row(competitor_id: &str) -> RatingHistoryEntry {
        RatingHistoryEntry {
            competitor_id: competitor_id.to_string(),
            match_id: generate_match_id(),
            scale: Scale::Player,
            mu_before: 25.0,
            sigma_before: 8.0,
            mu_after: 27.0,
            sigma_after: 7.5,
            rating_system: "trueskill".to_string(),
            recorded_at: current_timestamp(),
        }
    }

    #[test]
    fn test_competitor_entry_creation() {
        let entry = CompetitorEntry::new(
            "red-team".to_string(),
            Scale::Team,
            initial_rating(Scale::Team),
        );
        assert_eq!(entry.competitor_id, "red-team");
        assert_eq!(entry.rating.mu, 50.0);
        assert_eq!(entry.games_played, 0);
        assert_eq!(entry.win_percentage(), 0.0);
    }

    #[test]
    fn test_record_result_updates_counters() {
        let mut entry = create_test_entry("alice", 25.0);
        let original_updated_time = entry.last_updated;

        entry.record_result(RatingState::new(27.0, 7.0).unwrap(), true);
        entry.record_result(RatingState::new(26.0, 6.5).unwrap(), false);
        entry.record_result(RatingState::new(28.0, 6.0).unwrap(), true);

        assert_eq!(entry.games_played, 3);
        assert_eq!(entry.wins, 2);
        assert_eq!(entry.losses, 1);
        assert_eq!(entry.rating.mu, 28.0);
        assert!((entry.win_percentage() - 66.666).abs() < 0.01);
        assert_eq!(entry.conservative_rating(), 10.0);
        assert!(entry.last_updated >= original_updated_time);
    }

    #[test]
    fn test_in_memory_store_basic_operations() {
        let store = InMemoryRatingStore::new();

        assert!(store.get_competitor(&"alice".to_string()).unwrap().is_none());

        store
            .commit_match(vec![create_test_entry("alice", 25.0)], vec![])
            .unwrap();

        let retrieved = store.get_competitor(&"alice".to_string()).unwrap().unwrap();
        assert_eq!(retrieved.competitor_id, "alice");
        assert_eq!(retrieved.rating.mu, 25.0);
        assert_eq!(store.competitor_count().unwrap(), 1);
    }

    #[test]
    fn test_bulk_lookup_omits_unknown() {
        let store = InMemoryRatingStore::new();
        store
            .commit_match(
                vec![
                    create_test_entry("alice", 25.0),
                    create_test_entry("bob", 27.0),
                ],
                vec![],
            )
            .unwrap();

        let ids = vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ];
        let retrieved = store.get_competitors(&ids).unwrap();

        assert_eq!(retrieved.len(), 2);
        assert!(retrieved.contains_key("alice"));
        assert!(retrieved.contains_key("bob"));
    }

    #[test]
    fn test_commit_writes_history() {
        let store = InMemoryRatingStore::new();
        store
            .commit_match(
                vec![create_test_entry("alice", 27.0), create_test_entry("bob", 23.0)],
                vec![create_history_row("alice"), create_history_row("bob")],
            )
            .unwrap();
        store
            .commit_match(
                vec![create_test_entry("alice", 29.0)],
                vec![create_history_row("alice")],
            )
            .unwrap();

        assert_eq!(store.history_len().unwrap(), 3);
        assert_eq!(store.history_for(&"alice".to_string()).unwrap().len(), 2);
        assert_eq!(store.history_for(&"bob".to_string()).unwrap().len(), 1);
        assert!(store.history_for(&"carol".to_string()).unwrap().is_empty());
    }

    #[test]
    fn test_commit_rejects_recorded_match() {
        let store = InMemoryRatingStore::new();
        let first = create_history_row("alice");
        let mut second = create_history_row("bob");
        second.match_id = first.match_id;

        store
            .commit_match(
                vec![create_test_entry("alice", 27.0), create_test_entry("bob", 23.0)],
                vec![first.clone(), second],
            )
            .unwrap();

        let err = store
            .commit_match(vec![create_test_entry("alice", 40.0)], vec![first.clone()])
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<RatingError>(),
            Some(&RatingError::DuplicateMatch {
                match_id: first.match_id
            })
        );

        // Nothing from the rejected commit is visible.
        let alice = store.get_competitor(&"alice".to_string()).unwrap().unwrap();
        assert_eq!(alice.rating.mu, 27.0);
        assert_eq!(store.history_len().unwrap(), 2);
    }

    #[test]
    fn test_competitors_by_scale() {
        let store = InMemoryRatingStore::new();
        store
            .commit_match(
                vec![
                    create_test_entry("alice", 25.0),
                    CompetitorEntry::new(
                        "red-team".to_string(),
                        Scale::Team,
                        initial_rating(Scale::Team),
                    ),
                ],
                vec![],
            )
            .unwrap();

        let players = store.competitors_by_scale(Scale::Player).unwrap();
        let teams = store.competitors_by_scale(Scale::Team).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].competitor_id, "alice");
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].competitor_id, "red-team");
    }
}
