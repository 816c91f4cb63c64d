//! Per-Section Content Generation
//!
//! For a synthesized tree (optionally filtered to a caller-selected subset of
//! keys), produces the prose for each section. With a model available, every
//! retained section gets one independent completion call and all calls are
//! dispatched together — the phase resolves when the slowest one does, and a
//! single section's failure degrades to a placeholder without touching its
//! siblings. Without a model, a deterministic filler honors each section's
//! generation hints.

pub mod insights;
pub mod prompt;

pub use insights::InsightDistiller;

use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

use crate::ai::{SamplingConfig, SharedProvider, with_timeout};
use crate::types::{ProposalRequest, Result, Section, SmithError, flatten};

/// Section key → generated prose. A key absent from the map means "not
/// generated"; renderers show the heading and skip the body.
pub type ContentMap = HashMap<String, String>;

pub struct ContentGenerator {
    provider: Option<SharedProvider>,
    timeout: Duration,
}

impl ContentGenerator {
    pub fn new(provider: Option<SharedProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Generate content for every retained section of the tree.
    pub async fn generate(
        &self,
        source_text: &str,
        tree: &[Section],
        request: &ProposalRequest,
    ) -> ContentMap {
        let retained: Vec<&Section> = flatten(tree)
            .into_iter()
            .filter(|s| request.includes_section(&s.key))
            .collect();

        match &self.provider {
            Some(provider) => {
                self.generate_with_model(provider, source_text, &retained, request)
                    .await
            }
            None => filler_content(&retained, request),
        }
    }

    /// Fan out one completion call per retained section and join them all.
    ///
    /// `join_all` pairs results positionally with the input sections, so a
    /// failed call degrades to a placeholder for exactly that section.
    async fn generate_with_model(
        &self,
        provider: &SharedProvider,
        source_text: &str,
        sections: &[&Section],
        request: &ProposalRequest,
    ) -> ContentMap {
        let calls = sections
            .iter()
            .map(|section| self.generate_section(provider, source_text, section, request));

        let results = futures::future::join_all(calls).await;

        let mut content = ContentMap::new();
        for (section, result) in sections.iter().zip(results) {
            match result {
                Ok(body) => {
                    content.insert(section.key.clone(), body);
                }
                Err(e) => {
                    warn!("Content generation for section '{}' failed: {}", section.key, e);
                    content.insert(
                        section.key.clone(),
                        format!("Content generation for '{}' failed. Error: {}", section.title, e),
                    );
                }
            }
        }
        content
    }

    async fn generate_section(
        &self,
        provider: &SharedProvider,
        source_text: &str,
        section: &Section,
        request: &ProposalRequest,
    ) -> Result<String> {
        let prompt = prompt::section_prompt(source_text, section, request);
        let reply = with_timeout(
            self.timeout,
            provider.complete(&prompt, &SamplingConfig::default()),
            &format!("content generation for '{}'", section.key),
        )
        .await?;

        let body = reply.trim().to_string();
        if body.is_empty() {
            return Err(SmithError::llm("Empty content reply"));
        }
        Ok(body)
    }
}

/// Deterministic filler used when no model is configured. Echoes the
/// section's generation hints and always produces 150+ words so renderers
/// never receive an empty body.
fn filler_content(sections: &[&Section], request: &ProposalRequest) -> ContentMap {
    let mut content = ContentMap::new();

    for section in sections {
        let requirements_line = if section.content_requirements.is_empty() {
            String::new()
        } else {
            format!(
                "Content requirements: {}",
                section.content_requirements.join(", ")
            )
        };

        content.insert(
            section.key.clone(),
            format!(
                r#"This section addresses {topic} for {company}.

Our comprehensive approach ensures that all requirements are met through industry-leading practices and proven methodologies. We understand the critical importance of {topic} in delivering successful project outcomes.

Key aspects include:
- Thorough analysis and planning
- Best practice implementation
- Quality assurance measures
- Continuous monitoring and improvement
- Detailed strategies for execution and delivery
- In-depth risk analysis and mitigation plans
- Advanced technical solutions and architectural designs
- Comprehensive timelines and resource allocation
- Clear communication and reporting protocols

This section is designed to be exceptionally detailed, providing in-depth analysis and planning to fully address the requirements of the RFP. Our commitment to excellence is reflected in the depth of information provided, ensuring you have complete confidence in our ability to deliver.

{requirements}

We are committed to delivering exceptional results that exceed expectations and provide lasting value to your organization."#,
                topic = section.title.to_lowercase(),
                company = request.company_name,
                requirements = requirements_line,
            ),
        );
    }

    content
}
