/*!
 * Provider implementations for text-generation services.
 *
 * This module contains client implementations for various LLM providers:
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Mock: deterministic provider for tests
 *
 * Providers are reached through the `Capability` handle, which decides once
 * whether a provider can be used and lets callers skip it cheaply otherwise.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{ProviderConfig, ProviderKind};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod capability;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use capability::{Capability, CapabilityState};

/// A provider-agnostic completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt to guide the model
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature, 0.0 means greedy decoding
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a new request with greedy decoding and a short output bound
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 50,
            temperature: 0.0,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the maximum number of generated tokens
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the glosser and the explainer.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name used in log lines
    fn name(&self) -> &str;

    /// Complete a request and return the generated text
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Build a provider client from its configuration
///
/// Fails with `ProviderError::Unavailable` when a hosted provider has no API key.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let kind: ProviderKind = config.provider_type.parse()
        .map_err(|e: anyhow::Error| ProviderError::Unavailable(e.to_string()))?;
    let timeout = Duration::from_secs(config.timeout_secs);

    match kind {
        ProviderKind::Ollama => Ok(Arc::new(
            ollama::Ollama::new(&config.endpoint, &config.model, timeout),
        )),
        ProviderKind::LMStudio => Ok(Arc::new(
            openai::OpenAI::new("", &config.endpoint, &config.model, timeout),
        )),
        ProviderKind::OpenAI => {
            let api_key = config.resolved_api_key();
            if api_key.is_empty() {
                return Err(ProviderError::Unavailable("no OpenAI API key configured".to_string()));
            }
            Ok(Arc::new(openai::OpenAI::new(api_key, &config.endpoint, &config.model, timeout)))
        }
        ProviderKind::Anthropic => {
            let api_key = config.resolved_api_key();
            if api_key.is_empty() {
                return Err(ProviderError::Unavailable("no Anthropic API key configured".to_string()));
            }
            Ok(Arc::new(anthropic::Anthropic::new(api_key, &config.endpoint, &config.model, timeout)))
        }
    }
}

/// Keep the first `max_chars` characters of a response body for log lines
pub(crate) fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}
