//! Job Records
//!
//! Ephemeral per-job state: status, human-readable message, coarse progress,
//! produced artifact names and a structure summary. Created at submission,
//! mutated by the orchestrator as phases complete, deleted by deferred cleanup
//! a fixed delay after reaching a terminal state.

use serde::{Deserialize, Serialize};

/// Job lifecycle state: `processing → completed` or `processing → error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Processing,
    Completed,
    Error,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Processing => write!(f, "processing"),
            JobState::Completed => write!(f, "completed"),
            JobState::Error => write!(f, "error"),
        }
    }
}

/// Short description of a synthesized structure, surfaced in status polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureSummary {
    pub total_sections: usize,
    pub main_sections: usize,
    /// Titles of the first few top-level sections.
    pub section_titles: Vec<String>,
    pub dynamic_generation: bool,
}

/// Mutable per-job record held in the job store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub status: JobState,
    pub message: String,
    /// Coarse monotonic percentage, advisory for client polling.
    pub progress: u8,
    /// Produced artifact filenames under the output directory.
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_summary: Option<StructureSummary>,
}

impl JobRecord {
    pub fn processing(message: impl Into<String>, progress: u8) -> Self {
        Self {
            status: JobState::Processing,
            message: message.into(),
            progress,
            files: Vec::new(),
            structure_summary: None,
        }
    }
}

/// Status view returned to callers polling a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub job_id: String,
    pub status: JobState,
    pub message: String,
    pub progress: u8,
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_summary: Option<StructureSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Processing.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Error.is_terminal());
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&JobState::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(serde_json::to_string(&JobState::Error).unwrap(), "\"error\"");
    }
}
