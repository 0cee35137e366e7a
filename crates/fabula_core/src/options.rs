//! Sampling options for a single completion request.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Sampling options sent with a completion request.
///
/// Unset fields fall back to the backend's own defaults.
///
/// # Examples
///
/// ```
/// use fabula_core::GenerationOptions;
///
/// let options = GenerationOptions::new(Some(800), Some(0.7));
/// assert_eq!(*options.max_tokens(), Some(800));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(default, setter(strip_option))]
pub struct GenerationOptions {
    /// Maximum tokens to generate
    #[serde(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[serde(default)]
    temperature: Option<f32>,
}

impl GenerationOptions {
    /// Creates options from explicit values.
    pub fn new(max_tokens: Option<u32>, temperature: Option<f32>) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }

    /// Returns a builder for constructing options.
    pub fn builder() -> GenerationOptionsBuilder {
        GenerationOptionsBuilder::default()
    }
}
