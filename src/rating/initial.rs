//! Default ratings for brand-new competitors

use crate::types::{RatingState, Scale};

/// Fixed default state for a new competitor on `scale`
pub fn initial_rating(scale: Scale) -> RatingState {
    scale.params().initial_rating()
}
