//! Error types for the rating engine
//!
//! The pure engine reports failures through [`RatingError`]. Application layers
//! (configuration, storage, the CLI) use anyhow for consistent error handling and
//! convert engine errors with `?`.

use crate::types::{CompetitorId, MatchId, Scale};

/// Result type alias for application-level plumbing
pub type Result<T> = anyhow::Result<T>;

/// Result type alias for the pure rating computations
pub type RatingResult<T> = std::result::Result<T, RatingError>;

/// Custom error types for rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    /// Malformed input handed to the engine. Never retryable.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Competitor not found: {competitor_id}")]
    CompetitorNotFound { competitor_id: CompetitorId },

    #[error("Competitor {competitor_id} is rated on the {actual} scale, not {expected}")]
    ScaleMismatch {
        competitor_id: CompetitorId,
        expected: Scale,
        actual: Scale,
    },

    #[error("Match {match_id} has already been recorded")]
    DuplicateMatch { match_id: MatchId },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },
}

impl RatingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether this error is a caller bug rather than an environmental failure
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
