//! Common types used throughout the rating engine

use crate::error::{RatingError, RatingResult};
use crate::rating::derived::CONSERVATIVE_Z;
use crate::rating::scale::{ScaleParams, PLAYER_SCALE, TEAM_SCALE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillRating;
use uuid::Uuid;

/// Unique identifier for players and teams
pub type CompetitorId = String;

/// Unique identifier for recorded matches
pub type MatchId = Uuid;

/// Rating namespace a competitor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Player,
    Team,
}

impl Scale {
    pub const ALL: [Scale; 2] = [Scale::Player, Scale::Team];

    /// Built-in constants for this scale
    pub fn params(&self) -> &'static ScaleParams {
        match self {
            Scale::Player => &PLAYER_SCALE,
            Scale::Team => &TEAM_SCALE,
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Player => write!(f, "player"),
            Scale::Team => write!(f, "team"),
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "player" | "players" => Ok(Scale::Player),
            "team" | "teams" => Ok(Scale::Team),
            other => Err(RatingError::ConfigurationError {
                message: format!("Unknown rating scale: {}", other),
            }),
        }
    }
}

/// Skill belief for one competitor at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingState {
    /// Mean skill estimate
    pub mu: f64,
    /// Standard deviation of the estimate, always positive
    pub sigma: f64,
}

impl RatingState {
    /// Create a rating state, rejecting non-positive or non-finite values
    pub fn new(mu: f64, sigma: f64) -> RatingResult<Self> {
        let state = Self { mu, sigma };
        state.validate()?;
        Ok(state)
    }

    /// Check the `sigma > 0` invariant
    pub fn validate(&self) -> RatingResult<()> {
        if !self.mu.is_finite() {
            return Err(RatingError::invalid(format!(
                "mu must be finite, got {}",
                self.mu
            )));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(RatingError::invalid(format!(
                "sigma must be positive, got {}",
                self.sigma
            )));
        }
        Ok(())
    }

    /// Pessimistic skill estimate used for ranking
    pub fn conservative_rating(&self) -> f64 {
        self.mu - CONSERVATIVE_Z * self.sigma
    }
}

impl From<TrueSkillRating> for RatingState {
    fn from(rating: TrueSkillRating) -> Self {
        Self {
            mu: rating.rating,
            sigma: rating.uncertainty,
        }
    }
}

impl From<RatingState> for TrueSkillRating {
    fn from(state: RatingState) -> Self {
        Self {
            rating: state.mu,
            uncertainty: state.sigma,
        }
    }
}

/// Which side of a pairing won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
}

impl Winner {
    /// Resolve the winning side from a competitor id
    pub fn resolve(
        competitor_a: &CompetitorId,
        competitor_b: &CompetitorId,
        winner_id: Option<&CompetitorId>,
    ) -> RatingResult<Self> {
        match winner_id {
            None => Err(RatingError::invalid("no winner designated")),
            Some(id) if id == competitor_a => Ok(Winner::A),
            Some(id) if id == competitor_b => Ok(Winner::B),
            Some(id) => Err(RatingError::invalid(format!(
                "winner {} must be either {} or {}",
                id, competitor_a, competitor_b
            ))),
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Winner::A => Winner::B,
            Winner::B => Winner::A,
        }
    }
}

/// One completed, decisive contest between two competitors of the same scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default = "crate::utils::generate_match_id")]
    pub id: MatchId,
    pub scale: Scale,
    pub competitor_a: CompetitorId,
    pub competitor_b: CompetitorId,
    /// Winning competitor id; absent means the match cannot be rated
    pub winner: Option<CompetitorId>,
    /// Orders replay; required in match logs
    pub played_at: DateTime<Utc>,
}

impl MatchResult {
    /// Create a match result stamped with a fresh id and the current time
    pub fn new(
        scale: Scale,
        competitor_a: impl Into<CompetitorId>,
        competitor_b: impl Into<CompetitorId>,
        winner: impl Into<CompetitorId>,
    ) -> Self {
        Self {
            id: crate::utils::generate_match_id(),
            scale,
            competitor_a: competitor_a.into(),
            competitor_b: competitor_b.into(),
            winner: Some(winner.into()),
            played_at: crate::utils::current_timestamp(),
        }
    }

    /// Side that won, validated against both competitor ids
    pub fn winner_side(&self) -> RatingResult<Winner> {
        Winner::resolve(&self.competitor_a, &self.competitor_b, self.winner.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_state_validation() {
        assert!(RatingState::new(25.0, 8.3333).is_ok());
        assert!(RatingState::new(-40.0, 0.001).is_ok());

        assert!(RatingState::new(25.0, 0.0).unwrap_err().is_invalid_input());
        assert!(RatingState::new(25.0, -1.0).unwrap_err().is_invalid_input());
        assert!(RatingState::new(f64::NAN, 8.0).is_err());
        assert!(RatingState::new(25.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_conservative_rating_is_derived() {
        let state = RatingState::new(30.0, 2.0).unwrap();
        assert_eq!(state.conservative_rating(), 24.0);
    }

    #[test]
    fn test_trueskill_conversion() {
        let state = RatingState::new(27.5, 6.25).unwrap();
        let trueskill: TrueSkillRating = state.into();
        assert_eq!(trueskill.rating, 27.5);
        assert_eq!(trueskill.uncertainty, 6.25);

        let back: RatingState = trueskill.into();
        assert_eq!(back, state);
    }

    #[test]
    fn test_winner_resolution() {
        let a = "alice".to_string();
        let b = "bob".to_string();

        assert_eq!(Winner::resolve(&a, &b, Some(&a)).unwrap(), Winner::A);
        assert_eq!(Winner::resolve(&a, &b, Some(&b)).unwrap(), Winner::B);

        let missing = Winner::resolve(&a, &b, None).unwrap_err();
        assert!(missing.is_invalid_input());

        let stranger = Winner::resolve(&a, &b, Some(&"carol".to_string())).unwrap_err();
        assert_eq!(
            stranger.to_string(),
            "Invalid input: winner carol must be either alice or bob"
        );
    }

    #[test]
    fn test_scale_parsing_and_display() {
        assert_eq!("player".parse::<Scale>().unwrap(), Scale::Player);
        assert_eq!("Teams".parse::<Scale>().unwrap(), Scale::Team);
        assert!("league".parse::<Scale>().is_err());
        assert_eq!(Scale::Team.to_string(), "team");
    }

    #[test]
    fn test_match_result_deserializes_without_optional_fields() {
        let json = r#"{
            "scale": "player",
            "competitor_a": "alice",
            "competitor_b": "bob",
            "winner": "bob",
            "played_at": "2024-03-01T18:00:00Z"
        }"#;
        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.scale, Scale::Player);
        assert_eq!(result.winner_side().unwrap(), Winner::B);
        assert_eq!(result.played_at.to_rfc3339(), "2024-03-01T18:00:00+00:00");

        let no_winner = r#"{
            "scale": "team",
            "competitor_a": "red",
            "competitor_b": "blue",
            "winner": null,
            "played_at": "2024-03-01T18:05:00Z"
        }"#;
        let result: MatchResult = serde_json::from_str(no_winner).unwrap();
        assert!(result.winner_side().is_err());
    }

    #[test]
    fn test_match_result_requires_timestamp() {
        let json = r#"{
            "scale": "player",
            "competitor_a": "alice",
            "competitor_b": "bob",
            "winner": "bob"
        }"#;
        let err = serde_json::from_str::<MatchResult>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `played_at`"));
    }
}
