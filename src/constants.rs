//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Job lifecycle constants
pub mod jobs {
    /// Maximum number of concurrently active jobs (admission ceiling)
    pub const MAX_ACTIVE_JOBS: usize = 10;

    /// Delay before a terminal job's record and artifacts are removed (seconds)
    pub const CLEANUP_DELAY_SECS: u64 = 300;
}

/// Coarse progress checkpoints reported while a job advances.
///
/// Advisory only: clients poll these, nothing is derived from them.
pub mod progress {
    pub const SUBMITTED: u8 = 10;
    pub const EXTRACTING: u8 = 20;
    pub const STRUCTURING: u8 = 40;
    pub const GENERATING: u8 = 60;
    pub const VISUALIZING: u8 = 85;
    pub const FINALIZING: u8 = 90;
    pub const DONE: u8 = 100;
}

/// Prompt construction bounds
pub mod prompt {
    /// Source-text prefix included in the structure prompt (characters)
    pub const STRUCTURE_SOURCE_CHARS: usize = 3000;

    /// Source-text prefix included in each per-section content prompt (characters)
    pub const CONTENT_SOURCE_CHARS: usize = 4000;

    /// Source-text prefix included in insight distillation prompts (characters)
    pub const INSIGHT_SOURCE_CHARS: usize = 4000;

    /// Supporting-document insight excerpt folded into content prompts (characters)
    pub const INSIGHT_EXCERPT_CHARS: usize = 1000;

    /// Extracted headings included in the structure prompt
    pub const MAX_HEADINGS: usize = 10;

    /// Extracted requirement sentences included in the structure prompt
    pub const MAX_REQUIREMENTS: usize = 5;
}

/// Generative-model sampling bounds
pub mod sampling {
    pub const TEMPERATURE: f32 = 0.7;
    pub const TOP_K: u32 = 40;
    pub const TOP_P: f32 = 0.95;
    pub const MAX_OUTPUT_TOKENS: u32 = 4000;
}

/// Outline extraction constants
pub mod extract {
    /// Minimum length (exclusive) for an ALL-CAPS standalone heading line
    pub const CAPS_HEADING_MIN_LEN: usize = 5;

    /// Maximum length (exclusive) for an ALL-CAPS standalone heading line
    pub const CAPS_HEADING_MAX_LEN: usize = 100;

    /// Deepest nesting level inferred from a dotted numeral prefix
    pub const MAX_NUMERAL_LEVEL: u8 = 3;

    /// Scope sentences kept before the scope buffer is capped
    pub const SCOPE_SENTENCE_CAP: usize = 5;

    /// Maximum length of a derived section key (characters)
    pub const KEY_MAX_LEN: usize = 50;
}

/// HTTP/Network constants
pub mod network {
    /// Timeout for a single generative-model call (seconds)
    pub const LLM_TIMEOUT_SECS: u64 = 120;

    /// Timeout for a remote image fetch (seconds)
    pub const IMAGE_FETCH_TIMEOUT_SECS: u64 = 10;
}
