//! Shared Data Model
//!
//! The section tree, extracted outlines, request descriptors, job records and
//! the unified error type used across the crate.

pub mod error;
pub mod job;
pub mod outline;
pub mod request;
pub mod section;

pub use error::{Result, SmithError};
pub use job::{JobRecord, JobState, JobStatus, StructureSummary};
pub use outline::{DocumentOutline, HeadingCandidate};
pub use request::{
    DocumentKind, FormatSelection, ImageSource, Labels, Language, OutputFormat, ProposalRequest,
};
pub use section::{Section, count, dedupe_keys, flatten, number_sections, visit};
