//! Per-scale rating constants
//!
//! Players and teams are rated on separate scales. Each scale is one row of
//! constants; adding a scale means adding a row and a [`Scale`] variant.

use crate::error::{RatingError, RatingResult};
use crate::types::{RatingState, Scale};
use serde::{Deserialize, Serialize};
use skillratings::trueskill::TrueSkillConfig;

/// Fraction of the initial sigma that sigma may never shrink below
pub const DEFAULT_SIGMA_FLOOR_FRACTION: f64 = 0.05;

/// Constants that parameterize one rating scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleParams {
    /// Mean assigned to a brand-new competitor
    pub initial_mu: f64,
    /// Uncertainty assigned to a brand-new competitor
    pub initial_sigma: f64,
    /// Per-match performance spread
    pub beta: f64,
    /// Smallest sigma an update can produce
    pub sigma_floor: f64,
    /// Sigma strictly below this is classified as high confidence
    pub high_confidence_below: f64,
    /// Sigma strictly below this (and not high) is medium confidence
    pub medium_confidence_below: f64,
}

pub const PLAYER_SCALE: ScaleParams = ScaleParams {
    initial_mu: 25.0,
    initial_sigma: 25.0 / 3.0,
    beta: 25.0 / 6.0,
    sigma_floor: 25.0 / 3.0 * DEFAULT_SIGMA_FLOOR_FRACTION,
    high_confidence_below: 3.0,
    medium_confidence_below: 6.0,
};

pub const TEAM_SCALE: ScaleParams = ScaleParams {
    initial_mu: 50.0,
    initial_sigma: 50.0 / 3.0,
    beta: 50.0 / 6.0,
    sigma_floor: 50.0 / 3.0 * DEFAULT_SIGMA_FLOOR_FRACTION,
    high_confidence_below: 6.0,
    medium_confidence_below: 12.0,
};

impl ScaleParams {
    /// Default state for a new competitor on this scale
    pub fn initial_rating(&self) -> RatingState {
        RatingState {
            mu: self.initial_mu,
            sigma: self.initial_sigma,
        }
    }

    /// Recompute the floor from a fraction of the initial sigma
    pub fn with_floor_fraction(mut self, fraction: f64) -> Self {
        self.sigma_floor = self.initial_sigma * fraction;
        self
    }

    /// TrueSkill constants for a decisive two-competitor update.
    ///
    /// Draws never happen and ratings do not drift between matches, so both
    /// the draw probability and the dynamics factor are zero.
    pub fn trueskill_config(&self) -> TrueSkillConfig {
        TrueSkillConfig {
            draw_probability: 0.0,
            beta: self.beta,
            default_dynamics: 0.0,
        }
    }

    /// Validate scale parameters
    pub fn validate(&self, scale: Scale) -> RatingResult<()> {
        let fail = |message: String| {
            Err(RatingError::ConfigurationError {
                message: format!("{} scale: {}", scale, message),
            })
        };

        if !self.initial_mu.is_finite() {
            return fail("Initial mu must be finite".to_string());
        }
        if !(self.initial_sigma.is_finite() && self.initial_sigma > 0.0) {
            return fail("Initial sigma must be positive".to_string());
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return fail("Beta must be positive".to_string());
        }
        if !(self.sigma_floor > 0.0 && self.sigma_floor < self.initial_sigma) {
            return fail(format!(
                "Sigma floor must be in (0, {}), got {}",
                self.initial_sigma, self.sigma_floor
            ));
        }
        if !(self.high_confidence_below > 0.0
            && self.high_confidence_below < self.medium_confidence_below)
        {
            return fail(
                "Confidence thresholds must be positive and strictly increasing".to_string(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scales_are_valid() {
        assert!(PLAYER_SCALE.validate(Scale::Player).is_ok());
        assert!(TEAM_SCALE.validate(Scale::Team).is_ok());
    }

    #[test]
    fn test_team_scale_doubles_player_scale() {
        assert_eq!(TEAM_SCALE.initial_mu, 2.0 * PLAYER_SCALE.initial_mu);
        assert!((TEAM_SCALE.initial_sigma - 2.0 * PLAYER_SCALE.initial_sigma).abs() < 1e-12);
        assert!((TEAM_SCALE.beta - 2.0 * PLAYER_SCALE.beta).abs() < 1e-12);
    }

    #[test]
    fn test_floor_fraction() {
        let params = PLAYER_SCALE.with_floor_fraction(0.1);
        assert!((params.sigma_floor - 25.0 / 30.0).abs() < 1e-12);
        assert!(params.validate(Scale::Player).is_ok());

        let too_high = PLAYER_SCALE.with_floor_fraction(1.5);
        assert!(too_high.validate(Scale::Player).is_err());
    }

    #[test]
    fn test_invalid_params() {
        let mut params = TEAM_SCALE;
        params.beta = 0.0;
        assert!(params.validate(Scale::Team).is_err());

        let mut params = TEAM_SCALE;
        params.initial_sigma = -1.0;
        assert!(params.validate(Scale::Team).is_err());

        let mut params = TEAM_SCALE;
        params.high_confidence_below = params.medium_confidence_below;
        let err = params.validate(Scale::Team).unwrap_err();
        assert!(err.to_string().contains("team scale"));
    }

    #[test]
    fn test_trueskill_config_is_decisive_and_static() {
        let config = PLAYER_SCALE.trueskill_config();
        assert_eq!(config.draw_probability, 0.0);
        assert_eq!(config.default_dynamics, 0.0);
        assert_eq!(config.beta, PLAYER_SCALE.beta);
    }
}
