//! Backend connection configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Ollama base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemma:2b";
/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the inference backend connection.
///
/// # Examples
///
/// ```
/// use fabula_models::BackendConfig;
///
/// let config = BackendConfig::builder()
///     .model("llama3.2")
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url(), "http://localhost:11434");
/// assert_eq!(config.generate_url(), "http://localhost:11434/api/generate");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct BackendConfig {
    /// Base URL of the server
    #[serde(default = "default_base_url")]
    #[builder(default = "default_base_url()")]
    base_url: String,
    /// Model identifier to use for inference
    #[serde(default = "default_model")]
    #[builder(default = "default_model()")]
    model: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    #[builder(default = "default_timeout_secs()")]
    timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Returns a builder for constructing a backend configuration.
    pub fn builder() -> BackendConfigBuilder {
        BackendConfigBuilder::default()
    }

    /// Replaces the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Per-call timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the non-streaming generate endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    /// URL probed by health checks.
    pub fn health_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}
