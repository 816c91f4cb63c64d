//! rfpsmith - AI-Driven RFP Response Generator
//!
//! Ingests RFP documents, extracts their structural outline, asks a
//! generative model to propose and fill a tailored proposal structure, and
//! renders the result into word-processor, spreadsheet and HTML-visualization
//! artifacts. Every model-dependent step has a deterministic fallback, so the
//! pipeline completes with or without a configured credential.
//!
//! ## Core Pipeline
//!
//! extract → synthesize structure → generate content (concurrent per-section
//! fan-out) → render selected formats → deferred cleanup
//!
//! ## Quick Start
//!
//! ```ignore
//! use rfpsmith::{ConfigLoader, Orchestrator, Submission};
//! use std::sync::Arc;
//!
//! let config = ConfigLoader::load()?;
//! let orchestrator = Arc::new(Orchestrator::new(config)?);
//! let job_id = orchestrator.submit(Submission {
//!     source_files: vec!["rfp.docx".into()],
//!     company_name: "Acme".into(),
//!     ..Default::default()
//! })?;
//! let status = orchestrator.status(&job_id)?;
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: source-document extraction and outline analysis
//! - [`synthesis`]: structure synthesis with fixed fallback template
//! - [`content`]: concurrent per-section content generation + insights
//! - [`render`]: word-processor, spreadsheet and visualization renderers
//! - [`job`]: orchestrator, job store, admission control, cleanup
//! - [`ai`]: generative-model provider abstraction
//! - [`config`]: figment-based configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod content;
pub mod extract;
pub mod job;
pub mod render;
pub mod synthesis;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, LlmConfig};

// Error Types
pub use types::error::{Result, SmithError};

// Data Model
pub use types::{
    DocumentKind, DocumentOutline, FormatSelection, ImageSource, JobState, JobStatus, Language,
    OutputFormat, ProposalRequest, Section,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use content::{ContentGenerator, ContentMap, InsightDistiller};
pub use extract::{DocumentProcessor, TextExtractor, derive_key};
pub use job::{AnalyzeReport, Health, JobStore, Orchestrator, Submission};
pub use render::{LogicalOrderShaper, TextShaper};
pub use synthesis::{StructureSynthesizer, fallback_structure};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{GeminiProvider, LlmProvider, SamplingConfig, SharedProvider, create_provider};
