//! Rolling memory digest.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Periodically recomputed digest of the sections written so far.
///
/// Only ever used as prompt context; the section sequence stays the
/// canonical record. `covers` is the number of sections the digest was
/// computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct MemorySummary {
    /// Digest text
    text: String,
    /// Number of sections reflected in the digest
    covers: usize,
}

impl MemorySummary {
    /// Creates a digest covering the first `covers` sections.
    pub fn new(text: impl Into<String>, covers: usize) -> Self {
        Self {
            text: text.into(),
            covers,
        }
    }

    /// Returns true before the first recomputation.
    pub fn is_unset(&self) -> bool {
        self.covers == 0
    }
}
