//! Outline Analysis
//!
//! Turns flattened document text into a normalized outline: heading candidates
//! with an inferred nesting level, obligation sentences, and a capped scope
//! summary. Word-processor input instead drives off paragraph style metadata
//! (see `extract::docx`), which is strictly more reliable than pattern
//! matching; this line-based analyzer is the common path for everything else.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::extract::{
    CAPS_HEADING_MAX_LEN, CAPS_HEADING_MIN_LEN, KEY_MAX_LEN, MAX_NUMERAL_LEVEL, SCOPE_SENTENCE_CAP,
};
use crate::types::{DocumentOutline, HeadingCandidate};

/// Words marking a sentence as a requirement statement.
const REQUIREMENT_VOCAB: &[&str] = &[
    "must",
    "shall",
    "requirement",
    "mandatory",
    "essential",
    "required",
];

/// Words marking a sentence as scope/objective material.
const SCOPE_VOCAB: &[&str] = &["scope", "objective", "purpose", "goal", "deliverable"];

// Heading pattern families, tried in priority order; first match wins.
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*\.?)\s+(\S.*)$").expect("numbered heading pattern")
});
static LETTERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]\.\d+)\s+(\S.*)$").expect("lettered heading pattern"));
static NAMED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:Chapter|Section)\s+\d+|Part\s+[IVXLC]+|Appendix\s+[A-Z])[\s\-:]+(\S.*)$")
        .expect("named heading pattern")
});

/// Analyze flattened document text line by line.
pub fn analyze(text: &str) -> DocumentOutline {
    let mut outline = DocumentOutline::default();
    let mut scope_parts: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(heading) = identify_heading(line) {
            outline.headings.push(heading);
        }

        let lower = line.to_lowercase();
        if REQUIREMENT_VOCAB.iter().any(|w| lower.contains(w)) {
            outline.requirements.push(line.to_string());
        }
        if SCOPE_VOCAB.iter().any(|w| lower.contains(w)) && scope_parts.len() < SCOPE_SENTENCE_CAP {
            scope_parts.push(line);
        }
    }

    outline.scope = scope_parts.join(" ");
    outline
}

/// Try to recognize one line as a heading.
///
/// Pattern families in fixed priority order: dotted numeral, ALL-CAPS
/// standalone line, letter-dot-digit, Chapter/Section/Part/Appendix.
pub fn identify_heading(line: &str) -> Option<HeadingCandidate> {
    if let Some(caps) = NUMBERED.captures(line) {
        let numeral = caps[1].to_string();
        let title = caps[2].trim().to_string();
        return Some(HeadingCandidate {
            key: derive_key(&title),
            level: level_from_numeral(&numeral),
            title,
            numeral,
        });
    }

    if is_caps_heading(line) {
        return Some(HeadingCandidate {
            key: derive_key(line),
            level: 1,
            title: line.to_string(),
            numeral: String::new(),
        });
    }

    if let Some(caps) = LETTERED.captures(line) {
        let numeral = caps[1].to_string();
        let title = caps[2].trim().to_string();
        return Some(HeadingCandidate {
            key: derive_key(&title),
            level: 1,
            title,
            numeral,
        });
    }

    if let Some(caps) = NAMED.captures(line) {
        let numeral = caps[1].to_string();
        let title = caps[2].trim().to_string();
        return Some(HeadingCandidate {
            key: derive_key(&title),
            level: 1,
            title,
            numeral,
        });
    }

    None
}

/// Nesting level implied by a dotted numeral: 1 + internal dots, capped.
/// A trailing dot ("1.") is decoration, not nesting.
fn level_from_numeral(numeral: &str) -> u8 {
    let trimmed = numeral.trim_end_matches('.');
    let dots = trimmed.matches('.').count() as u8;
    (dots + 1).min(MAX_NUMERAL_LEVEL)
}

/// ALL-CAPS short standalone line: no lowercase letters, at least one letter,
/// bounded length, and not led by a run of digits.
fn is_caps_heading(line: &str) -> bool {
    line.len() > CAPS_HEADING_MIN_LEN
        && line.len() < CAPS_HEADING_MAX_LEN
        && line.chars().any(|c| c.is_alphabetic())
        && !line.chars().any(|c| c.is_lowercase())
        && !line.chars().take(10).any(|c| c.is_ascii_digit())
}

/// Derive the stable identifier slug for a title.
///
/// Pure and deterministic — this becomes the cross-system join key correlating
/// generated content, selection filters and render-time cross-references.
pub fn derive_key(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let truncated: String = joined.chars().take(KEY_MAX_LEN).collect();
    truncated.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_scenario() {
        let text = "1. Introduction\n1.1 Background\nREQUIREMENTS\nThe vendor must provide 24/7 support.\n";
        let outline = analyze(text);

        let headings: Vec<(&str, u8)> = outline
            .headings
            .iter()
            .map(|h| (h.title.as_str(), h.level))
            .collect();
        assert_eq!(
            headings,
            vec![
                ("Introduction", 1),
                ("Background", 2),
                ("REQUIREMENTS", 1),
            ]
        );

        assert_eq!(outline.requirements.len(), 2);
        assert!(outline.requirements[1].contains("must provide"));
        // REQUIREMENTS itself carries obligation vocabulary
        assert_eq!(outline.requirements[0], "REQUIREMENTS");

        assert!(outline.scope.is_empty());
    }

    #[test]
    fn test_numbered_levels() {
        assert_eq!(identify_heading("2 Overview").unwrap().level, 1);
        assert_eq!(identify_heading("2. Overview").unwrap().level, 1);
        assert_eq!(identify_heading("2.1 Scope of Work").unwrap().level, 2);
        assert_eq!(identify_heading("2.1.3 Detail").unwrap().level, 3);
        assert_eq!(identify_heading("2.1.3.4 Too Deep").unwrap().level, 3);
    }

    #[test]
    fn test_numbered_heading_records_numeral() {
        let heading = identify_heading("3.2 Evaluation Criteria").unwrap();
        assert_eq!(heading.numeral, "3.2");
        assert_eq!(heading.title, "Evaluation Criteria");
        assert_eq!(heading.key, "evaluation_criteria");
    }

    #[test]
    fn test_caps_heading_bounds() {
        assert!(identify_heading("TECHNICAL EVALUATION").is_some());
        // Too short
        assert!(identify_heading("SCOPE").is_none());
        // Lowercase present
        assert!(identify_heading("Technical EVALUATION criteria here").is_none());
        // Digits inside the leading run disqualify the caps family
        assert!(identify_heading("BUDGET 2024 REVIEW PLAN").is_none());
    }

    #[test]
    fn test_digit_led_line_is_numbered_heading() {
        let heading = identify_heading("2024 ANNUAL BUDGET REVIEW").unwrap();
        assert_eq!(heading.numeral, "2024");
        assert_eq!(heading.level, 1);
    }

    #[test]
    fn test_lettered_heading() {
        let heading = identify_heading("A.1 Compliance Matrix").unwrap();
        assert_eq!(heading.level, 1);
        assert_eq!(heading.numeral, "A.1");
    }

    #[test]
    fn test_named_heading_families() {
        assert_eq!(
            identify_heading("Chapter 3: Evaluation Process")
                .unwrap()
                .title,
            "Evaluation Process"
        );
        assert_eq!(
            identify_heading("Section 2 - Submission Rules").unwrap().title,
            "Submission Rules"
        );
        assert_eq!(
            identify_heading("Part IV: Terms").unwrap().numeral,
            "Part IV"
        );
        assert_eq!(
            identify_heading("Appendix B: Glossary").unwrap().numeral,
            "Appendix B"
        );
    }

    #[test]
    fn test_plain_prose_is_not_heading() {
        assert!(identify_heading("The project starts next quarter.").is_none());
    }

    #[test]
    fn test_scope_buffer_capped() {
        let text = (0..10)
            .map(|i| format!("The scope item {} is described here.", i))
            .collect::<Vec<_>>()
            .join("\n");
        let outline = analyze(&text);
        assert_eq!(outline.scope.matches("scope item").count(), 5);
    }

    #[test]
    fn test_derive_key_examples() {
        assert_eq!(
            derive_key("AI Governance & Ethics!!"),
            "ai_governance_ethics"
        );
        assert_eq!(derive_key("Executive Summary"), "executive_summary");
        assert_eq!(derive_key("  Pricing:  Model (2024) "), "pricing_model_2024");
    }

    #[test]
    fn test_derive_key_is_deterministic() {
        let title = "Quality Assurance & Success Metrics";
        assert_eq!(derive_key(title), derive_key(title));
    }

    #[test]
    fn test_derive_key_truncates() {
        let long = "word ".repeat(30);
        let key = derive_key(&long);
        assert!(key.chars().count() <= 50);
        assert!(!key.ends_with('_'));
    }
}
