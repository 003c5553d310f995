//! Shared fixtures for integration testing

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use foosball_rating::rating::{InMemoryRatingStore, MatchRecorder, RatingEngine};
use foosball_rating::types::{MatchResult, Scale};
use std::path::PathBuf;
use std::sync::Arc;

/// Fixed league start so match logs are reproducible
pub fn league_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
}

/// A decisive match played `minute` minutes after the league start
pub fn match_at(scale: Scale, a: &str, b: &str, winner: &str, minute: i64) -> MatchResult {
    let mut result = MatchResult::new(scale, a, b, winner);
    result.played_at = league_start() + Duration::minutes(minute);
    result
}

pub fn player_match(a: &str, b: &str, winner: &str, minute: i64) -> MatchResult {
    match_at(Scale::Player, a, b, winner, minute)
}

pub fn team_match(a: &str, b: &str, winner: &str, minute: i64) -> MatchResult {
    match_at(Scale::Team, a, b, winner, minute)
}

/// Recorder over a fresh in-memory store with default configuration
pub fn create_test_recorder() -> MatchRecorder<InMemoryRatingStore> {
    MatchRecorder::new(RatingEngine::default(), Arc::new(InMemoryRatingStore::new()))
}

/// Small mixed league: `dana` beats everyone, `eli` loses to everyone
pub fn sample_league() -> Vec<MatchResult> {
    vec![
        player_match("dana", "eli", "dana", 0),
        player_match("finn", "gus", "finn", 5),
        player_match("dana", "finn", "dana", 10),
        player_match("gus", "eli", "gus", 15),
        player_match("finn", "eli", "finn", 20),
        player_match("dana", "gus", "dana", 25),
        team_match("dana+finn", "eli+gus", "dana+finn", 30),
        team_match("eli+gus", "dana+finn", "dana+finn", 35),
    ]
}

/// Path of a file under `tests/fixtures`
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
