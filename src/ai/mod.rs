//! Generative-Model Integration
//!
//! Provider abstraction, reply parsing and external-call timeouts.
//!
//! ## Modules
//!
//! - [`provider`]: `LlmProvider` trait + Gemini REST implementation
//! - [`response`]: code-fence stripping and JSON extraction from replies
//! - [`timeout`]: explicit per-call timeouts

pub mod provider;
pub mod response;
pub mod timeout;

pub use provider::{GeminiProvider, LlmProvider, SamplingConfig, SharedProvider, create_provider};
pub use response::{parse_json_reply, strip_code_fences};
pub use timeout::with_timeout;

/// Character-bounded prefix of a text for prompt construction.
///
/// Counts characters (not bytes) so multi-byte scripts are never split
/// mid-codepoint.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::excerpt;

    #[test]
    fn test_excerpt_shorter_than_cap() {
        assert_eq!(excerpt("short", 100), "short");
    }

    #[test]
    fn test_excerpt_caps_by_chars() {
        assert_eq!(excerpt("abcdef", 3), "abc");
        // Multi-byte characters count as one
        assert_eq!(excerpt("ممتاز جدا", 5), "ممتاز");
    }
}
