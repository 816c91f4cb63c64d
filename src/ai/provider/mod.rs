//! Generative-Model Provider Abstraction
//!
//! Defines the `LlmProvider` collaborator trait: one round-trip completion
//! call with bounded sampling parameters. Every call site treats provider
//! failure (unavailable service, malformed or empty reply) as a fallback
//! trigger, never as fatal — the deterministic paths in `synthesis` and
//! `content` take over.
//!
//! A missing credential is detectable at startup: `create_provider` returns
//! `Ok(None)` and the whole pipeline runs on its deterministic fallbacks.

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::constants::sampling;
use crate::types::{Result, SmithError};

// =============================================================================
// Sampling Configuration
// =============================================================================

/// Bounded sampling parameters for one completion call.
#[derive(Debug, Clone)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: sampling::TEMPERATURE,
            top_k: sampling::TOP_K,
            top_p: sampling::TOP_P,
            max_output_tokens: sampling::MAX_OUTPUT_TOKENS,
        }
    }
}

// =============================================================================
// LLM Provider Trait
// =============================================================================

/// Shared provider handle for concurrent access across pipeline stages.
pub type SharedProvider = Arc<dyn LlmProvider>;

/// Single round-trip call to a generative language model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt, returning raw reply text.
    async fn complete(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration.
///
/// Returns `Ok(None)` when no API credential is configured — the sentinel the
/// rest of the pipeline checks before attempting any model call.
pub fn create_provider(config: &LlmConfig) -> Result<Option<SharedProvider>> {
    if !config.has_credential() {
        tracing::info!("No generative-model credential configured, using deterministic fallbacks");
        return Ok(None);
    }
    match config.provider.as_str() {
        "gemini" => Ok(Some(Arc::new(GeminiProvider::new(config)?))),
        other => Err(SmithError::Config(format!(
            "Unknown provider: {}. Supported: gemini",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sampling_bounds() {
        let sampling = SamplingConfig::default();
        assert!((sampling.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(sampling.top_k, 40);
        assert_eq!(sampling.max_output_tokens, 4000);
    }

    #[test]
    fn test_missing_credential_yields_none() {
        let config = LlmConfig {
            api_key: None,
            ..Default::default()
        };
        assert!(create_provider(&config).unwrap().is_none());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = LlmConfig {
            provider: "mystery".into(),
            api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(SmithError::Config(_))
        ));
    }
}
