//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Categories
//!
//! - **Input**: bad submissions (unsupported format, invalid selection) — surfaced
//!   synchronously where detectable
//! - **Collaborator degradation**: generative model unavailable or replying with
//!   garbage — never fatal, every call site has a deterministic fallback
//! - **Render**: one output format failed — a warning unless no artifact survives
//! - **Admission**: active-job ceiling exceeded — synchronous "retry later" rejection
//!
//! All errors are recoverable at the job level; no panic/unwrap in library code.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmithError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Unsupported file type: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to read {path}: {message}")]
    Extract { path: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    /// Generative-model call failed or produced an unusable reply.
    /// Call sites treat this as a fallback trigger, never as fatal.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Pipeline Errors
    // -------------------------------------------------------------------------
    #[error("{format} rendering failed: {message}")]
    Render { format: String, message: String },

    #[error("Proposal generation failed: {0}")]
    Generation(String),

    // -------------------------------------------------------------------------
    // Job Errors
    // -------------------------------------------------------------------------
    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Too many active jobs ({active}/{limit}), retry later")]
    TooManyJobs { active: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, SmithError>;

impl SmithError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an LLM collaborator error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a renderer error for one output format
    pub fn render(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a fallback trigger for generative-model call
    /// sites (degrade to the deterministic path instead of propagating).
    pub fn is_model_degradation(&self) -> bool {
        matches!(
            self,
            Self::Llm(_) | Self::Timeout { .. } | Self::Http(_) | Self::Json(_)
        )
    }

    /// Whether the caller should retry the same request later (admission
    /// rejection, as opposed to a permanently bad request).
    pub fn is_retry_later(&self) -> bool {
        matches!(self, Self::TooManyJobs { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_degradation_classification() {
        assert!(SmithError::llm("boom").is_model_degradation());
        assert!(
            SmithError::timeout("structure synthesis", Duration::from_secs(1))
                .is_model_degradation()
        );
        assert!(
            !SmithError::UnsupportedFormat {
                extension: "xyz".into()
            }
            .is_model_degradation()
        );
    }

    #[test]
    fn test_retry_later_classification() {
        assert!(
            SmithError::TooManyJobs {
                active: 10,
                limit: 10
            }
            .is_retry_later()
        );
        assert!(!SmithError::JobNotFound("abc".into()).is_retry_later());
    }

    #[test]
    fn test_display_includes_context() {
        let err = SmithError::render("docx", "missing font");
        assert_eq!(err.to_string(), "docx rendering failed: missing font");
    }
}
