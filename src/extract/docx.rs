//! Word-Processor Extraction
//!
//! Reads .docx sources with `docx-rs` and drives outline extraction off the
//! paragraph style stream: an explicit "Heading N" style is used verbatim as
//! the nesting level and skips pattern matching for that paragraph.

use std::path::Path;

use crate::constants::extract::SCOPE_SENTENCE_CAP;
use crate::extract::outline::{derive_key, identify_heading};
use crate::extract::{TextExtractor, read_failure};
use crate::types::{DocumentOutline, HeadingCandidate, Result};

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn handles(&self, extension: &str) -> bool {
        matches!(extension, "docx" | "doc")
    }

    fn extract(&self, path: &Path) -> Result<(String, DocumentOutline)> {
        let bytes = std::fs::read(path).map_err(|e| read_failure(path, e))?;
        let docx = docx_rs::read_docx(&bytes).map_err(|e| read_failure(path, e))?;

        let mut text = String::new();
        let mut outline = DocumentOutline::default();
        let mut scope_parts: Vec<String> = Vec::new();

        for child in &docx.document.children {
            let docx_rs::DocumentChild::Paragraph(paragraph) = child else {
                continue;
            };

            let line = paragraph.raw_text();
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            text.push_str(line);
            text.push('\n');

            let style = paragraph.property.style.as_ref().map(|s| s.val.as_str());
            if let Some(heading) = classify_paragraph(line, style) {
                outline.headings.push(heading);
            }

            let lower = line.to_lowercase();
            if ["must", "shall", "requirement", "mandatory", "essential", "required"]
                .iter()
                .any(|w| lower.contains(w))
            {
                outline.requirements.push(line.to_string());
            }
            if ["scope", "objective", "purpose", "goal", "deliverable"]
                .iter()
                .any(|w| lower.contains(w))
                && scope_parts.len() < SCOPE_SENTENCE_CAP
            {
                scope_parts.push(line.to_string());
            }
        }

        outline.scope = scope_parts.join(" ");
        Ok((text, outline))
    }
}

/// A "Heading N" style wins over pattern matching; anything else falls back to
/// the line-based pattern families.
fn classify_paragraph(line: &str, style: Option<&str>) -> Option<HeadingCandidate> {
    if let Some(style) = style
        && let Some(level) = heading_style_level(style)
    {
        return Some(HeadingCandidate {
            key: derive_key(line),
            level,
            title: line.to_string(),
            numeral: String::new(),
        });
    }
    identify_heading(line)
}

/// Parse the N out of a "Heading N" (or "HeadingN") style identifier.
fn heading_style_level(style: &str) -> Option<u8> {
    let rest = style.strip_prefix("Heading")?;
    rest.trim().parse::<u8>().ok().filter(|n| *n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_style_level_parsing() {
        assert_eq!(heading_style_level("Heading 1"), Some(1));
        assert_eq!(heading_style_level("Heading2"), Some(2));
        assert_eq!(heading_style_level("Heading 0"), None);
        assert_eq!(heading_style_level("Normal"), None);
        assert_eq!(heading_style_level("Title"), None);
    }

    #[test]
    fn test_style_wins_over_pattern() {
        // The dotted numeral alone would infer level 2; the explicit style
        // level is used verbatim instead.
        let heading = classify_paragraph("2.1 Scope of Work", Some("Heading 3")).unwrap();
        assert_eq!(heading.level, 3);
        assert_eq!(heading.key, "21_scope_of_work");
    }

    #[test]
    fn test_unstyled_paragraph_uses_patterns() {
        let heading = classify_paragraph("2.1 Scope of Work", Some("Normal")).unwrap();
        assert_eq!(heading.level, 2);
        assert_eq!(heading.title, "Scope of Work");
    }

    #[test]
    fn test_plain_paragraph_is_not_heading() {
        assert!(classify_paragraph("We will deliver on time.", None).is_none());
    }
}
