//! Inference backend seam.

use async_trait::async_trait;
use fabula_core::{Completion, GenerationOptions};

/// A text-completion backend.
///
/// Implementations must never fail: transport errors, timeouts and
/// non-success responses are reported as [`Completion::Empty`]. The driver is
/// stateless across calls.
///
/// # Example
///
/// ```rust,ignore
/// use fabula_interface::InferenceDriver;
/// use fabula_core::{Completion, GenerationOptions};
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl InferenceDriver for Echo {
///     async fn complete(&self, prompt: &str, _options: &GenerationOptions) -> Completion {
///         Completion::from_response(prompt)
///     }
///
///     fn provider_name(&self) -> &'static str {
///         "echo"
///     }
///
///     fn model_name(&self) -> &str {
///         "echo-v1"
///     }
/// }
/// ```
#[async_trait]
pub trait InferenceDriver: Send + Sync {
    /// Sends a prompt with sampling options and waits for the completion.
    async fn complete(&self, prompt: &str, options: &GenerationOptions) -> Completion;

    /// Provider name for logging.
    fn provider_name(&self) -> &'static str;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}
