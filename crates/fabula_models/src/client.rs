//! HTTP client for Ollama's generate endpoint.

use crate::{BackendConfig, GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use fabula_core::{Completion, GenerationOptions};
use fabula_error::{BackendError, FabulaResult, HttpError};
use fabula_interface::InferenceDriver;
use reqwest::Client;
use tracing::{debug, instrument, warn};

/// Client for a local Ollama server.
///
/// Every generation call fails soft: connection errors, timeouts, non-success
/// statuses and unparseable bodies are logged and returned as
/// [`Completion::Empty`].
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    config: BackendConfig,
}

impl OllamaClient {
    /// Creates a client with the configured per-call timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(fields(model = %config.model(), url = %config.base_url()))]
    pub fn new(config: BackendConfig) -> FabulaResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        debug!(timeout_secs = config.timeout_secs(), "Created Ollama client");

        Ok(Self { client, config })
    }

    /// Gets the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Checks that the server answers its health endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or answers with a
    /// non-success status.
    #[instrument(skip(self), fields(url = %self.config.health_url()))]
    pub async fn ping(&self) -> FabulaResult<()> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(|e| HttpError::new(format!("Health check failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(format!("Health check returned {}", status)).into());
        }

        debug!(%status, "Backend reachable");
        Ok(())
    }

    async fn try_generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, String> {
        let request = GenerateRequest::new(self.config.model(), prompt, options);

        let response = self
            .client
            .post(self.config.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("Request timed out: {}", e)
                } else {
                    format!("Request failed: {}", e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("API error (status {}): {}", status.as_u16(), body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        debug!(
            done = body.done,
            eval_count = ?body.eval_count,
            chars = body.response.len(),
            "Received completion"
        );

        Ok(body.response)
    }
}

#[async_trait]
impl InferenceDriver for OllamaClient {
    #[instrument(skip(self, prompt, options), fields(model = %self.config.model(), prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Completion {
        match self.try_generate(prompt, options).await {
            Ok(text) => Completion::from_response(text),
            Err(message) => {
                warn!(error = %message, "Inference call failed, returning empty completion");
                Completion::Empty
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}
