//! Data transfer objects for the Ollama generate API.

use derive_getters::Getters;
use fabula_core::GenerationOptions;
use serde::{Deserialize, Serialize};

/// Sampling options in Ollama's wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OllamaOptions {
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl From<&GenerationOptions> for OllamaOptions {
    fn from(options: &GenerationOptions) -> Self {
        Self {
            num_predict: *options.max_tokens(),
            temperature: *options.temperature(),
        }
    }
}

/// Non-streaming generate request.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct GenerateRequest {
    /// Model identifier
    model: String,
    /// Prompt text
    prompt: String,
    /// Always false; the pipeline waits for whole completions
    stream: bool,
    /// Sampling options
    options: OllamaOptions,
}

impl GenerateRequest {
    /// Creates a non-streaming request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, options: &GenerationOptions) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            options: options.into(),
        }
    }
}

/// Non-streaming generate response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    #[serde(default)]
    pub response: String,
    /// Whether generation finished
    #[serde(default)]
    pub done: bool,
    /// Tokens generated
    #[serde(default)]
    pub eval_count: Option<u64>,
}
