//! LLM Backend Module
//!
//! Provides a unified interface for the generative text endpoint used by the
//! sentiment and summary stages.
//!
//! ## Backends
//!
//! - **HttpLlmBackend**: OpenAI-compatible `/chat/completions` endpoint
//! - **DisabledBackend**: no endpoint configured; every call fails with
//!   `Unavailable` so callers go straight to their deterministic fallbacks
//!
//! ## Retries
//!
//! Callers never invoke `generate` directly in a loop. `retry::call_with_retry`
//! races each attempt against a hard timeout and applies backoff between
//! attempts.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;

mod http;
pub mod retry;

#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpLlmBackend;
pub use retry::{call_with_retry, Backoff, RetryOutcome, RetryPolicy};

/// Errors from a single generation request
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Empty response")]
    EmptyResponse,
    #[error("LLM unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Rate-limit failures stretch the backoff delay
    pub fn is_rate_limit(&self) -> bool {
        match self {
            LlmError::RateLimited(_) => true,
            LlmError::Status { status, .. } => *status == 429,
            _ => false,
        }
    }

    /// `Unavailable` means no endpoint exists, so retrying cannot help
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Unavailable(_))
    }
}

/// Unified trait for LLM backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a free-text response for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Backend used when no endpoint is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledBackend;

#[async_trait]
impl LlmBackend for DisabledBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unavailable("no endpoint configured".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "disabled"
    }
}

/// Build the backend described by `[llm]`.
///
/// Falls back to `DisabledBackend` when no endpoint is set or the HTTP client
/// cannot be constructed.
pub fn build_backend(config: &LlmConfig, request_timeout_secs: u64) -> Arc<dyn LlmBackend> {
    let Some(endpoint) = config.endpoint.as_deref() else {
        tracing::info!("No LLM endpoint configured, analysis will use rule-based fallbacks");
        return Arc::new(DisabledBackend);
    };

    let api_key = std::env::var(&config.api_key_env).ok();
    if api_key.is_none() {
        tracing::warn!(
            env = %config.api_key_env,
            "API key environment variable not set, sending unauthenticated requests"
        );
    }

    match HttpLlmBackend::new(endpoint, api_key, config, request_timeout_secs) {
        Ok(backend) => {
            tracing::info!(
                endpoint = %endpoint,
                model = %config.model,
                "HTTP LLM backend ready"
            );
            Arc::new(backend)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client, using disabled backend");
            Arc::new(DisabledBackend)
        }
    }
}
