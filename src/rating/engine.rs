//! TrueSkill rating engine for decisive two-competitor matches
//!
//! This module wraps the two-player TrueSkill update from the skillratings
//! crate. Given the pre-match states of two competitors on the same scale and
//! the winning side, it produces both post-match states together with the
//! predicted outcome probability and how surprising the result was.
//!
//! The engine holds only immutable configuration. Every call is a pure
//! function of its arguments, so one engine can be shared across threads
//! without locking. Ordering of updates per competitor is the caller's job.

use crate::config::RatingConfig;
use crate::error::{RatingError, RatingResult};
use crate::rating::derived::RatingSummary;
use crate::rating::scale::ScaleParams;
use crate::types::{CompetitorId, RatingState, Scale, Winner};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::{expected_score, match_quality, trueskill, TrueSkillRating};
use skillratings::Outcomes;
use tracing::debug;

/// Post-match states for both sides of a pairing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchUpdate {
    pub new_a: RatingState,
    pub new_b: RatingState,
    pub winner: Winner,
    /// Probability that A would beat B, computed from the pre-match states
    pub predicted_probability_a: f64,
    /// `1 - P(observed outcome)`; near 0 when the favourite wins
    pub surprise: f64,
}

impl MatchUpdate {
    /// Predicted probability of the outcome that actually happened
    pub fn predicted_probability_of_outcome(&self) -> f64 {
        1.0 - self.surprise
    }
}

/// Rating change for one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub competitor_id: CompetitorId,
    pub old_rating: RatingState,
    pub new_rating: RatingState,
    pub won: bool,
}

impl RatingChange {
    pub fn mu_change(&self) -> f64 {
        self.new_rating.mu - self.old_rating.mu
    }

    pub fn sigma_change(&self) -> f64 {
        self.new_rating.sigma - self.old_rating.sigma
    }

    pub fn conservative_rating_change(&self) -> f64 {
        self.new_rating.conservative_rating() - self.old_rating.conservative_rating()
    }
}

/// Result of rating an identified pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingCalculationResult {
    /// Changes for competitor A then competitor B
    pub rating_changes: Vec<RatingChange>,
    /// Pre-match probability of the observed outcome
    pub predicted_probability: f64,
    pub surprise: f64,
    /// Pre-match quality of the pairing (0.0 to 1.0, higher is more even)
    pub match_quality: f64,
}

/// Two-competitor TrueSkill rating engine
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    config: RatingConfig,
}

impl RatingEngine {
    /// Create a new engine from validated configuration
    pub fn new(config: RatingConfig) -> RatingResult<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn params(&self, scale: Scale) -> &ScaleParams {
        self.config.for_scale(scale)
    }

    /// Default rating for a new competitor on `scale`
    pub fn initial_rating(&self, scale: Scale) -> RatingState {
        self.params(scale).initial_rating()
    }

    /// Display summary for a state on `scale`
    pub fn summarize(&self, scale: Scale, state: &RatingState) -> RatingResult<RatingSummary> {
        RatingSummary::with_params(self.params(scale), state)
    }

    /// Update both states after A and B played and `winner` won.
    ///
    /// Winner's mu rises and loser's mu falls by `sigma^2 / c * v`, where `v`
    /// grows with the surprise of the outcome. Each sigma shrinks and is then
    /// clamped into `[floor, previous sigma]`.
    pub fn apply_match_result(
        &self,
        scale: Scale,
        state_a: &RatingState,
        state_b: &RatingState,
        winner: Winner,
    ) -> RatingResult<MatchUpdate> {
        state_a.validate()?;
        state_b.validate()?;

        let params = self.params(scale);
        let trueskill_config = params.trueskill_config();
        let rating_a: TrueSkillRating = (*state_a).into();
        let rating_b: TrueSkillRating = (*state_b).into();

        let (predicted_probability_a, _) = expected_score(&rating_a, &rating_b, &trueskill_config);

        let outcome = match winner {
            Winner::A => Outcomes::WIN,
            Winner::B => Outcomes::LOSS,
        };
        let (raw_a, raw_b) = trueskill(&rating_a, &rating_b, &outcome, &trueskill_config);

        let new_a = RatingState {
            mu: raw_a.rating,
            sigma: clamp_sigma(raw_a.uncertainty, state_a.sigma, params.sigma_floor),
        };
        let new_b = RatingState {
            mu: raw_b.rating,
            sigma: clamp_sigma(raw_b.uncertainty, state_b.sigma, params.sigma_floor),
        };

        let surprise = match winner {
            Winner::A => 1.0 - predicted_probability_a,
            Winner::B => predicted_probability_a,
        };

        debug!(
            %scale,
            ?winner,
            predicted_probability_a,
            surprise,
            mu_a = new_a.mu,
            sigma_a = new_a.sigma,
            mu_b = new_b.mu,
            sigma_b = new_b.sigma,
            "Applied match result"
        );

        Ok(MatchUpdate {
            new_a,
            new_b,
            winner,
            predicted_probability_a,
            surprise,
        })
    }

    /// Rate a pairing of identified competitors.
    ///
    /// Rejects self-play and a winner id that is absent or names neither side.
    pub fn rate_pairing(
        &self,
        scale: Scale,
        competitor_a: (&CompetitorId, &RatingState),
        competitor_b: (&CompetitorId, &RatingState),
        winner_id: Option<&CompetitorId>,
    ) -> RatingResult<RatingCalculationResult> {
        let (id_a, state_a) = competitor_a;
        let (id_b, state_b) = competitor_b;

        if id_a == id_b {
            return Err(RatingError::invalid(format!(
                "competitor {} cannot play itself",
                id_a
            )));
        }

        let winner = Winner::resolve(id_a, id_b, winner_id)?;
        let quality = self.match_quality(scale, state_a, state_b)?;
        let update = self.apply_match_result(scale, state_a, state_b, winner)?;

        let rating_changes = vec![
            RatingChange {
                competitor_id: id_a.clone(),
                old_rating: *state_a,
                new_rating: update.new_a,
                won: winner == Winner::A,
            },
            RatingChange {
                competitor_id: id_b.clone(),
                old_rating: *state_b,
                new_rating: update.new_b,
                won: winner == Winner::B,
            },
        ];

        Ok(RatingCalculationResult {
            rating_changes,
            predicted_probability: update.predicted_probability_of_outcome(),
            surprise: update.surprise,
            match_quality: quality,
        })
    }

    /// Probability that A beats B
    pub fn predict_win_probability(
        &self,
        scale: Scale,
        state_a: &RatingState,
        state_b: &RatingState,
    ) -> RatingResult<f64> {
        state_a.validate()?;
        state_b.validate()?;

        let (probability_a, _) = expected_score(
            &TrueSkillRating::from(*state_a),
            &TrueSkillRating::from(*state_b),
            &self.params(scale).trueskill_config(),
        );
        Ok(probability_a)
    }

    /// How evenly matched A and B are (0.0 to 1.0, higher is better)
    pub fn match_quality(
        &self,
        scale: Scale,
        state_a: &RatingState,
        state_b: &RatingState,
    ) -> RatingResult<f64> {
        state_a.validate()?;
        state_b.validate()?;

        Ok(match_quality(
            &TrueSkillRating::from(*state_a),
            &TrueSkillRating::from(*state_b),
            &self.params(scale).trueskill_config(),
        ))
    }
}

/// Keep sigma within `[floor, previous]`. A previous sigma already below the
/// floor is left unchanged.
fn clamp_sigma(updated: f64, previous: f64, floor: f64) -> f64 {
    updated.max(floor).min(previous)
}
