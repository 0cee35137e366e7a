//! Critic feedback for a section draft.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Raw critic feedback together with the score read out of it.
///
/// A score of `0` means no score could be found; it ranks below every real
/// score so it always takes the retry path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Critique {
    /// Feedback text as returned by the critic
    text: String,
    /// Score in `0..=10`
    score: u8,
}

impl Critique {
    /// Creates a critique, capping the score at 10.
    pub fn new(text: impl Into<String>, score: u8) -> Self {
        Self {
            text: text.into(),
            score: score.min(10),
        }
    }

    /// Returns true when the score is strictly below `threshold`.
    pub fn below(&self, threshold: u8) -> bool {
        self.score < threshold
    }
}
