//! Derived display metrics
//!
//! Every consumer that ranks or displays a rating goes through these helpers,
//! so conservative ratings, confidence bins and rounding are computed in one
//! place only.

use crate::error::RatingResult;
use crate::rating::scale::ScaleParams;
use crate::types::{RatingState, Scale};
use serde::{Deserialize, Serialize};

/// Number of standard deviations subtracted from mu for ranking
pub const CONSERVATIVE_Z: f64 = 3.0;

/// Ordinal confidence bin for a rating's uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        };
        f.pad(label)
    }
}

/// Conservative rating `mu - 3*sigma`
pub fn conservative_rating(mu: f64, sigma: f64) -> RatingResult<f64> {
    Ok(RatingState::new(mu, sigma)?.conservative_rating())
}

/// Classify uncertainty using the built-in thresholds for `scale`
pub fn classify_confidence(scale: Scale, sigma: f64) -> RatingResult<Confidence> {
    classify_confidence_with(scale.params(), sigma)
}

/// Classify uncertainty using explicit scale parameters
pub fn classify_confidence_with(params: &ScaleParams, sigma: f64) -> RatingResult<Confidence> {
    // Validates sigma; mu is irrelevant here.
    RatingState::new(0.0, sigma)?;

    Ok(if sigma < params.high_confidence_below {
        Confidence::High
    } else if sigma < params.medium_confidence_below {
        Confidence::Medium
    } else {
        Confidence::Low
    })
}

/// Format a rating value for display with one decimal place
pub fn display_rating(value: f64) -> String {
    format!("{:.1}", value)
}

/// Everything a view needs to render one competitor's rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub mu: f64,
    pub sigma: f64,
    pub conservative_rating: f64,
    pub confidence: Confidence,
}

impl RatingSummary {
    /// Summarize a state on the built-in thresholds of `scale`
    pub fn new(scale: Scale, state: &RatingState) -> RatingResult<Self> {
        Self::with_params(scale.params(), state)
    }

    /// Summarize a state with explicit scale parameters
    pub fn with_params(params: &ScaleParams, state: &RatingState) -> RatingResult<Self> {
        Ok(Self {
            mu: state.mu,
            sigma: state.sigma,
            conservative_rating: conservative_rating(state.mu, state.sigma)?,
            confidence: classify_confidence_with(params, state.sigma)?,
        })
    }

    pub fn display(&self) -> String {
        format!(
            "{} (mu {}, sigma {}, {} confidence)",
            display_rating(self.conservative_rating),
            display_rating(self.mu),
            display_rating(self.sigma),
            self.confidence
        )
    }
}
