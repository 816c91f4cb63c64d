//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/rfpsmith/) and project (.rfpsmith/) level
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{jobs, network};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// File storage settings
    pub storage: StorageConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Job lifecycle settings
    pub jobs: JobsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            jobs: JobsConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `SmithError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::types::SmithError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(crate::types::SmithError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.jobs.max_active == 0 {
            return Err(crate::types::SmithError::Config(
                "jobs.max_active must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for produced output artifacts
    pub output_dir: PathBuf,

    /// Directory for caller-supplied source files awaiting processing
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// Generative-model provider settings.
///
/// Note: API keys are never serialized to output and are redacted in debug
/// output. A missing key is not an error — the pipeline runs on deterministic
/// fallbacks without one.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type: "gemini"
    pub provider: String,

    /// Model name (provider-specific)
    pub model: Option<String>,

    /// API key; read from `GEMINI_API_KEY` when absent here.
    /// Never serialized to output for security.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: None,
            api_key: None,
            api_base: None,
            timeout_secs: network::LLM_TIMEOUT_SECS,
            temperature: crate::constants::sampling::TEMPERATURE,
        }
    }
}

impl LlmConfig {
    /// Whether a model credential is available. Checked once at startup; the
    /// answer decides between the model path and the deterministic fallbacks.
    pub fn has_credential(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Fill the API key from the environment when the config left it unset.
    pub fn with_env_credential(mut self) -> Self {
        if self.api_key.is_none()
            && let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }
        self
    }
}

// =============================================================================
// Jobs Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Admission ceiling on concurrently active jobs
    pub max_active: usize,

    /// Delay before terminal jobs are cleaned up (seconds)
    pub cleanup_delay_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            max_active: jobs::MAX_ACTIVE_JOBS,
            cleanup_delay_secs: jobs::CLEANUP_DELAY_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_admission_ceiling_rejected() {
        let mut config = Config::default();
        config.jobs.max_active = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credential_detection() {
        let mut llm = LlmConfig::default();
        assert!(!llm.has_credential());
        llm.api_key = Some(String::new());
        assert!(!llm.has_credential());
        llm.api_key = Some("key".into());
        assert!(llm.has_credential());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let llm = LlmConfig {
            api_key: Some("secret".into()),
            ..Default::default()
        };
        let rendered = format!("{:?}", llm);
        assert!(!rendered.contains("secret"));
    }
}
