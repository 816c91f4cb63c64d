//! Proposal Section Tree
//!
//! The hierarchical table-of-contents model shared by structure synthesis,
//! content generation and every renderer. A node owns its children; the tree
//! is the single source of truth for ordering and numbering.
//!
//! Numbering is always recomputed by one depth-first pass after any structural
//! mutation (`number_sections`) — a tree's numbers are stale between an edit
//! and the next renumber, and nothing downstream may consume it in that state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node of the proposal outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier-safe slug, unique within the tree. Joins generated
    /// content, user selection filters and render-time cross-references.
    pub key: String,

    /// Human-readable title in the requested output language.
    pub title: String,

    /// Nesting depth, 1 = top level.
    pub level: u8,

    /// Hierarchical dotted numeral ("3", "3.2", "3.2.1"). Assigned by
    /// `number_sections`, empty until then.
    #[serde(default)]
    pub number: String,

    /// Short natural-language hints steering content generation.
    #[serde(default)]
    pub content_requirements: Vec<String>,

    /// True when the node came from a generative-model reply rather than the
    /// fixed fallback template. Informational only.
    #[serde(default)]
    pub is_dynamic: bool,

    /// Ordered child nodes, exclusively owned.
    #[serde(default)]
    pub subsections: Vec<Section>,
}

impl Section {
    pub fn new(key: impl Into<String>, title: impl Into<String>, level: u8) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            level,
            number: String::new(),
            content_requirements: Vec::new(),
            is_dynamic: false,
            subsections: Vec::new(),
        }
    }

    /// Builder-style attachment of generation hints.
    pub fn with_requirements(mut self, requirements: &[&str]) -> Self {
        self.content_requirements = requirements.iter().map(|r| (*r).to_string()).collect();
        self
    }

    pub fn add_subsection(&mut self, section: Section) {
        self.subsections.push(section);
    }
}

// =============================================================================
// Tree Walks
// =============================================================================

/// Depth-first pre-order traversal, the one walk every consumer shares.
///
/// The visitor receives each node together with its depth (0 = root rank).
/// TOC, body, flattening and counting all drive off this so they cannot
/// disagree on order.
pub fn visit<'a, F>(sections: &'a [Section], f: &mut F)
where
    F: FnMut(&'a Section, usize),
{
    fn walk<'a, F>(sections: &'a [Section], depth: usize, f: &mut F)
    where
        F: FnMut(&'a Section, usize),
    {
        for section in sections {
            f(section, depth);
            walk(&section.subsections, depth + 1, f);
        }
    }
    walk(sections, 0, f);
}

/// Flatten the tree into depth-first pre-order.
pub fn flatten(sections: &[Section]) -> Vec<&Section> {
    let mut flat = Vec::new();
    visit(sections, &mut |section, _| flat.push(section));
    flat
}

/// Total node count.
pub fn count(sections: &[Section]) -> usize {
    let mut n = 0;
    visit(sections, &mut |_, _| n += 1);
    n
}

// =============================================================================
// Numbering
// =============================================================================

/// Assign hierarchical dotted numbers top-down, depth-first.
///
/// A node's number is its parent's number + "." + its 1-based sibling index,
/// or just the sibling index at the root. Idempotent: renumbering an already
/// numbered tree yields identical numbers.
pub fn number_sections(sections: &mut [Section]) {
    number_with_parent(sections, "");
}

fn number_with_parent(sections: &mut [Section], parent: &str) {
    for (i, section) in sections.iter_mut().enumerate() {
        section.number = if parent.is_empty() {
            (i + 1).to_string()
        } else {
            format!("{}.{}", parent, i + 1)
        };
        let number = section.number.clone();
        number_with_parent(&mut section.subsections, &number);
    }
}

// =============================================================================
// Key Deduplication
// =============================================================================

/// Disambiguate duplicate keys by appending a numeric suffix.
///
/// A generative reply may repeat a key; left as-is the later section would
/// silently overwrite the earlier one in the content map. Runs before
/// numbering at tree-build time.
pub fn dedupe_keys(sections: &mut [Section]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    dedupe_walk(sections, &mut seen);
}

fn dedupe_walk(sections: &mut [Section], seen: &mut HashMap<String, usize>) {
    for section in sections {
        let count = seen.entry(section.key.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            section.key = format!("{}_{}", section.key, count);
        }
        dedupe_walk(&mut section.subsections, seen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_tree() -> Vec<Section> {
        let mut deliverables = Section::new("deliverables", "Deliverables", 1);
        deliverables.add_subsection(Section::new("primary", "Primary Deliverables", 2));
        deliverables.add_subsection(Section::new("outcomes", "Expected Outcomes", 2));

        let mut plan = Section::new("plan", "Implementation Plan", 1);
        let mut phases = Section::new("phases", "Project Phases", 2);
        phases.add_subsection(Section::new("phase_detail", "Phase Detail", 3));
        plan.add_subsection(phases);

        vec![
            Section::new("executive_summary", "Executive Summary", 1),
            deliverables,
            plan,
        ]
    }

    #[test]
    fn test_numbering_follows_sibling_index() {
        let mut tree = sample_tree();
        number_sections(&mut tree);

        assert_eq!(tree[0].number, "1");
        assert_eq!(tree[1].number, "2");
        assert_eq!(tree[1].subsections[0].number, "2.1");
        assert_eq!(tree[1].subsections[1].number, "2.2");
        assert_eq!(tree[2].subsections[0].subsections[0].number, "3.1.1");
    }

    #[test]
    fn test_numbering_recomputed_after_mutation() {
        let mut tree = sample_tree();
        number_sections(&mut tree);

        tree.insert(0, Section::new("cover", "Cover Letter", 1));
        number_sections(&mut tree);

        assert_eq!(tree[0].number, "1");
        assert_eq!(tree[1].number, "2");
        assert_eq!(tree[2].subsections[0].number, "3.1");
    }

    #[test]
    fn test_flatten_preserves_depth_first_order() {
        let mut tree = sample_tree();
        number_sections(&mut tree);

        let keys: Vec<&str> = flatten(&tree).iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "executive_summary",
                "deliverables",
                "primary",
                "outcomes",
                "plan",
                "phases",
                "phase_detail",
            ]
        );
    }

    #[test]
    fn test_count_matches_flatten() {
        let tree = sample_tree();
        assert_eq!(count(&tree), flatten(&tree).len());
    }

    #[test]
    fn test_dedupe_keys_appends_suffix() {
        let mut tree = vec![
            Section::new("pricing", "Pricing", 1),
            Section::new("pricing", "Pricing Again", 1),
            Section::new("pricing", "Pricing Once More", 1),
        ];
        dedupe_keys(&mut tree);

        assert_eq!(tree[0].key, "pricing");
        assert_eq!(tree[1].key, "pricing_2");
        assert_eq!(tree[2].key, "pricing_3");
    }

    #[test]
    fn test_dedupe_keys_spans_nesting_levels() {
        let mut parent = Section::new("scope", "Scope", 1);
        parent.add_subsection(Section::new("scope", "Scope Detail", 2));
        let mut tree = vec![parent];
        dedupe_keys(&mut tree);

        assert_eq!(tree[0].key, "scope");
        assert_eq!(tree[0].subsections[0].key, "scope_2");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut tree = sample_tree();
        number_sections(&mut tree);

        let json = serde_json::to_string(&tree).unwrap();
        let back: Vec<Section> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[1].subsections[1].number, "2.2");
        assert_eq!(back[1].subsections[1].key, "outcomes");
    }

    // Arbitrary small trees for the numbering properties.
    fn arb_tree(depth: u32) -> impl Strategy<Value = Vec<Section>> {
        let leaf = "[a-z]{1,8}".prop_map(|k| Section::new(k.clone(), k, 1));
        leaf.prop_recursive(depth, 24, 4, |inner| {
            (prop::collection::vec(inner, 0..4), "[a-z]{1,8}").prop_map(|(children, k)| {
                let mut section = Section::new(k.clone(), k, 1);
                section.subsections = children;
                section
            })
        })
        .prop_map(|root| vec![root])
    }

    proptest! {
        #[test]
        fn prop_renumbering_is_idempotent(mut tree in arb_tree(3)) {
            number_sections(&mut tree);
            let first: Vec<String> = flatten(&tree).iter().map(|s| s.number.clone()).collect();
            number_sections(&mut tree);
            let second: Vec<String> = flatten(&tree).iter().map(|s| s.number.clone()).collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_every_number_extends_parent(mut tree in arb_tree(3)) {
            number_sections(&mut tree);
            fn check(sections: &[Section], parent: &str) -> bool {
                sections.iter().enumerate().all(|(i, s)| {
                    let expected = if parent.is_empty() {
                        (i + 1).to_string()
                    } else {
                        format!("{}.{}", parent, i + 1)
                    };
                    s.number == expected && check(&s.subsections, &s.number)
                })
            }
            prop_assert!(check(&tree, ""));
        }
    }
}
