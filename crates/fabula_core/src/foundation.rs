//! One-time story foundation.

use crate::Topic;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// World, cast, theme, style and outline generated once per story.
///
/// Read-only after construction. A run builds exactly one foundation and
/// never regenerates it.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct StoryFoundation {
    /// Topic the foundation was grown from
    topic: Topic,
    /// Setting description
    world: String,
    /// Main characters
    characters: String,
    /// Central theme statement
    theme: String,
    /// Tone, voice and sentence-style directives
    style: String,
    /// Part-by-part outline
    outline: String,
}

impl StoryFoundation {
    /// Returns a builder for constructing a foundation.
    pub fn builder() -> StoryFoundationBuilder {
        StoryFoundationBuilder::default()
    }
}
