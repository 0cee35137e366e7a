//! Inference backend clients for Fabula.
//!
//! [`OllamaClient`] implements [`fabula_interface::InferenceDriver`] against
//! Ollama's non-streaming `/api/generate` endpoint.

mod client;
mod config;
mod dto;

pub use client::OllamaClient;
pub use config::{
    BackendConfig, BackendConfigBuilder, BackendConfigBuilderError, DEFAULT_BASE_URL,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
pub use dto::{GenerateRequest, GenerateResponse, OllamaOptions};
