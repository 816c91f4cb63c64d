//! Structure Synthesis
//!
//! Turns a source outline plus caller intent into a numbered Section Tree:
//! the generative model proposes a JSON structure tailored to the source, and
//! any failure along that path (missing credential, call error, unparseable
//! reply) degrades to the fixed fallback template. Both paths end with key
//! deduplication and depth-first numbering.

pub mod fallback;

pub use fallback::fallback_structure;

use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use crate::ai::{SamplingConfig, SharedProvider, excerpt, parse_json_reply, with_timeout};
use crate::constants::prompt;
use crate::extract::derive_key;
use crate::types::{DocumentOutline, ProposalRequest, Result, Section, SmithError};
use crate::types::{dedupe_keys, number_sections};

pub struct StructureSynthesizer {
    provider: Option<SharedProvider>,
    timeout: Duration,
}

impl StructureSynthesizer {
    pub fn new(provider: Option<SharedProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Synthesize a numbered proposal structure. Never fails: every model
    /// failure degrades to the fixed template.
    pub async fn synthesize(
        &self,
        source_text: &str,
        outline: &DocumentOutline,
        request: &ProposalRequest,
    ) -> Vec<Section> {
        let mut sections = match &self.provider {
            Some(provider) => {
                match self
                    .synthesize_with_model(provider, source_text, outline, request)
                    .await
                {
                    Ok(sections) if !sections.is_empty() => {
                        info!("Model proposed {} top-level sections", sections.len());
                        sections
                    }
                    Ok(_) => {
                        warn!("Model returned an empty structure, using fallback template");
                        fallback_structure()
                    }
                    Err(e) => {
                        warn!("Structure synthesis degraded to fallback: {}", e);
                        fallback_structure()
                    }
                }
            }
            None => fallback_structure(),
        };

        dedupe_keys(&mut sections);
        number_sections(&mut sections);
        sections
    }

    async fn synthesize_with_model(
        &self,
        provider: &SharedProvider,
        source_text: &str,
        outline: &DocumentOutline,
        request: &ProposalRequest,
    ) -> Result<Vec<Section>> {
        let prompt = build_structure_prompt(source_text, outline, request)?;
        let reply = with_timeout(
            self.timeout,
            provider.complete(&prompt, &SamplingConfig::default()),
            "structure synthesis",
        )
        .await?;

        let value = parse_json_reply(&reply)?;
        let entries = value
            .as_array()
            .ok_or_else(|| SmithError::llm("Structure reply is not a JSON array"))?;

        Ok(entries.iter().filter_map(convert_entry).collect())
    }
}

/// Map one JSON object from the model reply into a Section, recursing one
/// level into subsections. Entries without a usable title are dropped.
fn convert_entry(value: &Value) -> Option<Section> {
    let title = value.get("title")?.as_str()?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    let key = value
        .get("key")
        .and_then(|k| k.as_str())
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| derive_key(&title));

    let level = value
        .get("level")
        .and_then(|l| l.as_u64())
        .map(|l| l.clamp(1, 4) as u8)
        .unwrap_or(1);

    let mut section = Section::new(key, title, level);
    section.is_dynamic = true;
    section.content_requirements = value
        .get("content_requirements")
        .and_then(|r| r.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    if let Some(subsections) = value.get("subsections").and_then(|s| s.as_array()) {
        for sub in subsections {
            if let Some(mut child) = convert_entry(sub) {
                // Reply nesting is honored one level deep; anything deeper in
                // a child entry is flattened away by this recursion bound.
                child.subsections.clear();
                if child.level <= section.level {
                    child.level = section.level + 1;
                }
                section.add_subsection(child);
            }
        }
    }

    Some(section)
}

/// Bounded prompt for the structure call: capped source prefix, the first
/// extracted headings and requirements, scope, language instruction and a
/// worked example of the expected JSON shape.
fn build_structure_prompt(
    source_text: &str,
    outline: &DocumentOutline,
    request: &ProposalRequest,
) -> Result<String> {
    let headings: Vec<&crate::types::HeadingCandidate> =
        outline.headings.iter().take(prompt::MAX_HEADINGS).collect();
    let requirements: Vec<&String> = outline
        .requirements
        .iter()
        .take(prompt::MAX_REQUIREMENTS)
        .collect();

    Ok(format!(
        r#"Analyze this RFP document and generate an appropriate proposal structure.

RFP CONTENT:
{source}

EXTRACTED SECTIONS FROM RFP:
{headings}

EXTRACTED REQUIREMENTS:
{requirements}

SCOPE:
{scope}

Generate a comprehensive proposal structure that addresses all RFP requirements.
Create sections and subsections that logically respond to the RFP's needs.
The titles for the sections and subsections MUST be in {language}. The keys should remain in English.

Respond with ONLY a valid JSON array of sections with this structure:
[
  {{
    "key": "executive_summary",
    "title": "Executive Summary",
    "level": 1,
    "content_requirements": ["Brief overview", "Key benefits", "Recommendations"]
  }},
  {{
    "key": "understanding_requirements",
    "title": "Understanding of Requirements",
    "level": 1,
    "content_requirements": ["RFP analysis", "Key challenges identified"],
    "subsections": [
      {{
        "key": "technical_requirements",
        "title": "Technical Requirements Analysis",
        "level": 2,
        "content_requirements": ["Technical specifications", "Compliance requirements"]
      }}
    ]
  }}
]

Include 8-12 main sections with relevant subsections. Focus on BUSINESS VALUE FIRST, then technical details:
1. Executive Summary
2. Understanding of Requirements
3. Deliverables and Expected Outcomes
4. Pricing and Investment Structure
5. Proposed Solution/Approach
6. Technical Specifications
7. Implementation Plan and Timeline
8. Team and Qualifications
9. Risk Management and Mitigation
10. Quality Assurance and Success Metrics
11. Support and Maintenance
12. Conclusion and Next Steps

CRITICAL: Prioritize deliverables and pricing (sections 3-4) BEFORE technical approach. Clients need to understand WHAT they get and HOW MUCH it costs before diving into HOW it will be built.

Ensure each section has appropriate content_requirements that guide content generation.
"#,
        source = excerpt(source_text, prompt::STRUCTURE_SOURCE_CHARS),
        headings = serde_json::to_string_pretty(&headings)?,
        requirements = serde_json::to_string_pretty(&requirements)?,
        scope = outline.scope,
        language = request.language,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::LlmProvider;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Provider returning a canned reply, or failing when given `None`.
    struct ScriptedProvider {
        reply: Option<String>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, _prompt: &str, _sampling: &SamplingConfig) -> Result<String> {
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(SmithError::llm("scripted failure")),
            }
        }
        fn name(&self) -> &str {
            "scripted"
        }
        fn model(&self) -> &str {
            "scripted"
        }
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    fn synthesizer(reply: Option<&str>) -> StructureSynthesizer {
        StructureSynthesizer::new(
            Some(Arc::new(ScriptedProvider {
                reply: reply.map(String::from),
            })),
            Duration::from_secs(5),
        )
    }

    const REPLY: &str = r#"```json
[
  {"key": "executive_summary", "title": "Executive Summary", "level": 1,
   "content_requirements": ["Overview"]},
  {"key": "approach", "title": "Approach", "level": 1,
   "content_requirements": ["Method"],
   "subsections": [
     {"key": "phases", "title": "Phases", "level": 2, "content_requirements": ["Breakdown"]}
   ]}
]
```"#;

    #[tokio::test]
    async fn test_model_reply_becomes_numbered_tree() {
        let synth = synthesizer(Some(REPLY));
        let tree = synth
            .synthesize("RFP text", &DocumentOutline::default(), &ProposalRequest::default())
            .await;

        assert_eq!(tree.len(), 2);
        assert!(tree[0].is_dynamic);
        assert_eq!(tree[0].number, "1");
        assert_eq!(tree[1].subsections[0].number, "2.1");
        assert_eq!(tree[1].subsections[0].key, "phases");
    }

    #[tokio::test]
    async fn test_call_failure_degrades_to_fallback() {
        let synth = synthesizer(None);
        let tree = synth
            .synthesize("RFP text", &DocumentOutline::default(), &ProposalRequest::default())
            .await;

        assert_eq!(tree.len(), 12);
        assert_eq!(tree[0].key, "executive_summary");
        assert_eq!(tree[11].key, "conclusion");
        assert!(!tree[0].is_dynamic);
        // Fallback trees are numbered too
        assert_eq!(tree[2].subsections[0].number, "3.1");
    }

    #[tokio::test]
    async fn test_unparseable_reply_degrades_to_fallback() {
        let synth = synthesizer(Some("I would be happy to help with that."));
        let tree = synth
            .synthesize("RFP text", &DocumentOutline::default(), &ProposalRequest::default())
            .await;
        assert_eq!(tree.len(), 12);
    }

    #[tokio::test]
    async fn test_missing_provider_uses_fallback() {
        let synth = StructureSynthesizer::new(None, Duration::from_secs(5));
        let tree = synth
            .synthesize("RFP text", &DocumentOutline::default(), &ProposalRequest::default())
            .await;
        assert_eq!(tree.len(), 12);
    }

    #[tokio::test]
    async fn test_duplicate_keys_disambiguated() {
        let reply = r#"[
            {"key": "approach", "title": "Approach", "level": 1},
            {"key": "approach", "title": "Approach Again", "level": 1}
        ]"#;
        let synth = synthesizer(Some(reply));
        let tree = synth
            .synthesize("RFP", &DocumentOutline::default(), &ProposalRequest::default())
            .await;
        assert_eq!(tree[0].key, "approach");
        assert_eq!(tree[1].key, "approach_2");
    }

    #[test]
    fn test_convert_entry_derives_missing_key() {
        let value = serde_json::json!({"title": "Risk & Mitigation", "level": 1});
        let section = convert_entry(&value).unwrap();
        assert_eq!(section.key, "risk_mitigation");
    }

    #[test]
    fn test_convert_entry_rejects_untitled() {
        assert!(convert_entry(&serde_json::json!({"key": "x"})).is_none());
        assert!(convert_entry(&serde_json::json!({"title": "  "})).is_none());
    }

    #[test]
    fn test_convert_entry_corrects_child_level() {
        let value = serde_json::json!({
            "title": "Parent", "level": 1,
            "subsections": [{"title": "Child", "level": 1}]
        });
        let section = convert_entry(&value).unwrap();
        assert_eq!(section.subsections[0].level, 2);
    }

    #[test]
    fn test_prompt_caps_source_prefix() {
        let long_source = "x".repeat(10_000);
        let prompt_text = build_structure_prompt(
            &long_source,
            &DocumentOutline::default(),
            &ProposalRequest::default(),
        )
        .unwrap();
        // 3000-char prefix plus the instruction scaffolding
        assert!(prompt_text.matches('x').count() <= 3000 + 100);
        assert!(prompt_text.contains("valid JSON array"));
    }
}
