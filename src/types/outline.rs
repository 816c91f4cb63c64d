//! Extracted Document Outline
//!
//! Normalized result of source-document analysis: heading candidates with an
//! inferred nesting level, obligation sentences, and a capped scope summary.
//! Consumed once by structure synthesis, then discarded with the job.

use serde::{Deserialize, Serialize};

/// A heading candidate recognized in the source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingCandidate {
    pub title: String,
    /// Inferred nesting level, 1..=3.
    pub level: u8,
    /// Normalized slug derived from the title (see `extract::outline::derive_key`).
    pub key: String,
    /// Raw numeral prefix as it appeared in the source ("2.1", "A.3"), if any.
    #[serde(default)]
    pub numeral: String,
}

/// Structural outline extracted from one or more source documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentOutline {
    pub headings: Vec<HeadingCandidate>,
    /// Sentences carrying obligation vocabulary (must, shall, ...).
    pub requirements: Vec<String>,
    /// Concatenated scope/objective sentences, capped at extraction time.
    pub scope: String,
}

impl DocumentOutline {
    /// Fold another document's outline into this one, preserving order.
    /// Used when a submission carries several source files.
    pub fn merge(&mut self, other: DocumentOutline) {
        self.headings.extend(other.headings);
        self.requirements.extend(other.requirements);
        if !other.scope.is_empty() {
            if !self.scope.is_empty() {
                self.scope.push(' ');
            }
            self.scope.push_str(&other.scope);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty() && self.requirements.is_empty() && self.scope.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_preserves_order_and_scope() {
        let mut a = DocumentOutline {
            headings: vec![HeadingCandidate {
                title: "Introduction".into(),
                level: 1,
                key: "introduction".into(),
                numeral: "1".into(),
            }],
            requirements: vec!["The vendor must respond.".into()],
            scope: "Project scope covers delivery.".into(),
        };
        let b = DocumentOutline {
            headings: vec![HeadingCandidate {
                title: "Background".into(),
                level: 2,
                key: "background".into(),
                numeral: "1.1".into(),
            }],
            requirements: vec!["Support shall be continuous.".into()],
            scope: "Objectives include training.".into(),
        };

        a.merge(b);
        assert_eq!(a.headings.len(), 2);
        assert_eq!(a.headings[1].key, "background");
        assert_eq!(a.requirements.len(), 2);
        assert_eq!(
            a.scope,
            "Project scope covers delivery. Objectives include training."
        );
    }

    #[test]
    fn test_merge_into_empty_does_not_prepend_space() {
        let mut a = DocumentOutline::default();
        a.merge(DocumentOutline {
            scope: "Scope only.".into(),
            ..Default::default()
        });
        assert_eq!(a.scope, "Scope only.");
    }
}
