//! Text Shaping Collaborator
//!
//! Right-to-left scripts need reshaping and bidirectional reordering before
//! they can be painted onto a fixed canvas. The formats this crate ships
//! (docx, SpreadsheetML, HTML) all store text in logical order and leave
//! display-time bidi to the consuming application, so the default shaper is
//! the identity transform. A paint-based sink must supply a real shaper; when
//! none supports the requested language the renderer fails that one output
//! format instead of degrading silently.
//!
//! Contract: `shape` must be idempotent — shaping already-shaped text must
//! not double-transform it.

use crate::types::{Language, Result};

pub trait TextShaper: Send + Sync {
    /// Whether this shaper can handle the given language's script.
    fn supports(&self, language: Language) -> bool;

    /// Transform one literal text run into its paint-ready form.
    fn shape(&self, text: &str) -> Result<String>;
}

/// Identity shaper for logical-order targets.
pub struct LogicalOrderShaper;

impl TextShaper for LogicalOrderShaper {
    fn supports(&self, _language: Language) -> bool {
        true
    }

    fn shape(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_order_shaper_is_identity() {
        let shaper = LogicalOrderShaper;
        assert_eq!(shaper.shape("مرحبا world").unwrap(), "مرحبا world");
    }

    #[test]
    fn test_shaping_is_idempotent() {
        let shaper = LogicalOrderShaper;
        let once = shaper.shape("النص العربي").unwrap();
        let twice = shaper.shape(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_supports_all_logical_targets() {
        let shaper = LogicalOrderShaper;
        assert!(shaper.supports(Language::En));
        assert!(shaper.supports(Language::Ar));
    }
}
