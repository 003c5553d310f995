//! Rating system configuration

use crate::error::RatingResult;
use crate::rating::scale::{ScaleParams, PLAYER_SCALE, TEAM_SCALE};
use crate::types::Scale;
use serde::{Deserialize, Serialize};

/// Parameters for every rating scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub player: ScaleParams,
    pub team: ScaleParams,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            player: PLAYER_SCALE,
            team: TEAM_SCALE,
        }
    }
}

impl RatingConfig {
    pub fn for_scale(&self, scale: Scale) -> &ScaleParams {
        match scale {
            Scale::Player => &self.player,
            Scale::Team => &self.team,
        }
    }

    pub fn for_scale_mut(&mut self, scale: Scale) -> &mut ScaleParams {
        match scale {
            Scale::Player => &mut self.player,
            Scale::Team => &mut self.team,
        }
    }

    /// Validate every scale
    pub fn validate(&self) -> RatingResult<()> {
        for scale in Scale::ALL {
            self.for_scale(scale).validate(scale)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_builtin_table() {
        let config = RatingConfig::default();
        assert_eq!(config.for_scale(Scale::Player), Scale::Player.params());
        assert_eq!(config.for_scale(Scale::Team), Scale::Team.params());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_scale_fails_validation() {
        let mut config = RatingConfig::default();
        config.for_scale_mut(Scale::Team).beta = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("team scale"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RatingConfig = toml::from_str(
            r#"
            [player]
            initial_mu = 25.0
            initial_sigma = 8.333333333333334
            beta = 5.0
            sigma_floor = 0.5
            high_confidence_below = 3.0
            medium_confidence_below = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(config.player.beta, 5.0);
        assert_eq!(config.team, TEAM_SCALE);
    }
}
