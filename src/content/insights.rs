//! Supporting-Document Insight Distillation
//!
//! Summarizes a "special" supporting document (standards/compliance/
//! methodology framing) or the concatenation of additional documents (broader
//! supporting-evidence framing) into short advisory text folded into later
//! generation prompts. Purely advisory: insights never affect structure.
//!
//! Without a model, keyword-frequency heuristics assemble a bullet list of
//! qualitative observations instead.

use std::time::Duration;
use tracing::warn;

use crate::ai::{SamplingConfig, SharedProvider, excerpt, with_timeout};
use crate::constants::prompt;
use crate::types::{DocumentOutline, ProposalRequest, Result};

pub struct InsightDistiller {
    provider: Option<SharedProvider>,
    timeout: Duration,
}

impl InsightDistiller {
    pub fn new(provider: Option<SharedProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Distill the single "special" supporting document. Never fails; any
    /// model problem degrades to the keyword heuristics.
    pub async fn distill_special(
        &self,
        text: &str,
        outline: &DocumentOutline,
        request: &ProposalRequest,
    ) -> String {
        if let Some(provider) = &self.provider {
            match self
                .complete(provider, &special_prompt(text, outline, request), "special document insights")
                .await
            {
                Ok(insights) => return insights,
                Err(e) => warn!("Special document distillation degraded: {}", e),
            }
        }
        special_fallback(text, request)
    }

    /// Distill the concatenated additional supporting documents.
    pub async fn distill_additional(&self, combined: &str, request: &ProposalRequest) -> String {
        if let Some(provider) = &self.provider {
            match self
                .complete(provider, &additional_prompt(combined, request), "additional document insights")
                .await
            {
                Ok(insights) => return insights,
                Err(e) => warn!("Additional documents distillation degraded: {}", e),
            }
        }
        additional_fallback(combined)
    }

    async fn complete(
        &self,
        provider: &SharedProvider,
        prompt_text: &str,
        operation: &str,
    ) -> Result<String> {
        let reply = with_timeout(
            self.timeout,
            provider.complete(prompt_text, &SamplingConfig::default()),
            operation,
        )
        .await?;
        Ok(reply.trim().to_string())
    }
}

fn special_prompt(text: &str, outline: &DocumentOutline, request: &ProposalRequest) -> String {
    let headings: Vec<&str> = outline
        .headings
        .iter()
        .take(prompt::MAX_HEADINGS)
        .map(|h| h.title.as_str())
        .collect();

    format!(
        r#"Analyze this special supporting document to extract key insights that will enhance a {kind} proposal for the {sector} sector.

SPECIAL DOCUMENT CONTENT:
{content}

EXTRACTED SECTIONS:
{headings}

SCOPE:
{scope}

Please provide key insights, best practices, methodologies, standards, or specific requirements from this document that should be incorporated into the main proposal. Focus on:

1. Technical standards and methodologies
2. Industry best practices
3. Compliance requirements
4. Quality standards
5. Implementation approaches
6. Risk mitigation strategies
7. Success metrics and KPIs

Respond with a concise but comprehensive analysis (maximum 1500 words) that can be used to enhance the main proposal content.
"#,
        kind = request.kind,
        sector = request.sector,
        content = excerpt(text, prompt::INSIGHT_SOURCE_CHARS),
        headings = headings.join("\n"),
        scope = outline.scope,
    )
}

fn additional_prompt(combined: &str, request: &ProposalRequest) -> String {
    format!(
        r#"Analyze these additional supporting documents to extract valuable insights for a {kind} proposal in the {sector} sector.

ADDITIONAL DOCUMENTS CONTENT:
{content}

Please extract and synthesize key information that will enhance the main proposal, including:

1. Supporting evidence and case studies
2. Technical specifications and requirements
3. Industry standards and regulations
4. Best practices and methodologies
5. Historical data and benchmarks
6. Stakeholder requirements and preferences
7. Implementation examples and lessons learned
8. Success metrics and evaluation criteria

Provide a well-organized analysis (maximum 2000 words) that identifies the most valuable insights to incorporate into the main proposal.
"#,
        kind = request.kind,
        sector = request.sector,
        content = excerpt(combined, prompt::INSIGHT_SOURCE_CHARS),
    )
}

/// Keyword heuristics for the special document: fixed vocabulary checks
/// mapped to qualitative observations.
fn special_fallback(text: &str, request: &ProposalRequest) -> String {
    let lower = text.to_lowercase();
    let mut insights: Vec<&str> = Vec::new();

    if lower.contains("standard") || lower.contains("specification") {
        insights.push("• Document contains technical standards and specifications that should be referenced in the technical approach section.");
    }
    if lower.contains("requirement") || lower.contains("must") || lower.contains("shall") {
        insights.push("• Document outlines specific requirements that must be addressed in the proposal solution.");
    }
    if lower.contains("quality") || lower.contains("compliance") {
        insights.push("• Quality assurance and compliance considerations are highlighted that should be incorporated into the quality management section.");
    }
    if lower.contains("risk") || lower.contains("mitigation") {
        insights.push("• Risk management strategies and mitigation approaches are identified that can strengthen the risk management section.");
    }
    if lower.contains("timeline") || lower.contains("schedule") {
        insights.push("• Timeline and scheduling information is provided that should inform the project timeline and implementation plan.");
    }

    match request.sector.to_lowercase().as_str() {
        "health" if lower.contains("patient") || lower.contains("clinical") => {
            insights.push("• Healthcare-specific considerations and patient-centered approaches are outlined.");
        }
        "technology" if lower.contains("security") || lower.contains("data") => {
            insights.push("• Technology security and data management requirements are specified.");
        }
        _ => {}
    }

    if insights.is_empty() {
        "Special document provides supplementary context that enhances understanding of project requirements and industry standards.".to_string()
    } else {
        insights.join("\n")
    }
}

/// Keyword-frequency heuristics for the additional documents: substring
/// counts of fixed vocabularies decide which observations apply.
fn additional_fallback(combined: &str) -> String {
    let lower = combined.to_lowercase();
    let count_all =
        |terms: &[&str]| -> usize { terms.iter().map(|t| lower.matches(t).count()).sum() };

    let technical = count_all(&[
        "technical",
        "specification",
        "system",
        "solution",
        "implementation",
    ]);
    let financial = count_all(&["budget", "cost", "price", "financial", "funding"]);
    let management = count_all(&[
        "project",
        "management",
        "team",
        "coordination",
        "leadership",
    ]);

    let mut insights: Vec<&str> = Vec::new();

    if technical > 5 {
        insights.push("• Documents contain significant technical content that should inform the technical approach and solution architecture.");
    }
    if financial > 3 {
        insights.push("• Financial information and cost considerations are provided that should be reflected in the budget and pricing sections.");
    }
    if management > 3 {
        insights.push("• Project management methodologies and team structure information are available to enhance the management approach.");
    }
    if lower.contains("success") || lower.contains("metric") || lower.contains("kpi") {
        insights.push("• Success metrics and key performance indicators are defined that should be incorporated into the evaluation criteria.");
    }
    if lower.contains("experience") || lower.contains("case study") {
        insights.push("• Relevant experience and case studies are documented that can support the team qualifications and past performance sections.");
    }

    if insights.is_empty() {
        "Additional documents provide valuable supporting information and context that enhances the overall proposal quality and comprehensiveness.".to_string()
    } else {
        insights.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProposalRequest;

    #[tokio::test]
    async fn test_special_fallback_matches_vocabulary() {
        let distiller = InsightDistiller::new(None, Duration::from_secs(5));
        let text = "All vendors shall follow the ISO 9001 standard. Risk mitigation is required.";
        let insights = distiller
            .distill_special(text, &DocumentOutline::default(), &ProposalRequest::default())
            .await;

        assert!(insights.contains("standards and specifications"));
        assert!(insights.contains("Risk management"));
        assert!(insights.contains("specific requirements"));
    }

    #[tokio::test]
    async fn test_special_fallback_default_when_nothing_matches() {
        let distiller = InsightDistiller::new(None, Duration::from_secs(5));
        let insights = distiller
            .distill_special(
                "Lorem ipsum dolor sit amet.",
                &DocumentOutline::default(),
                &ProposalRequest::default(),
            )
            .await;
        assert!(insights.contains("supplementary context"));
    }

    #[tokio::test]
    async fn test_sector_specific_observation() {
        let distiller = InsightDistiller::new(None, Duration::from_secs(5));
        let request = ProposalRequest {
            sector: "health".into(),
            ..Default::default()
        };
        let insights = distiller
            .distill_special(
                "Patient outcomes and clinical workflows.",
                &DocumentOutline::default(),
                &request,
            )
            .await;
        assert!(insights.contains("patient-centered"));
    }

    #[tokio::test]
    async fn test_additional_fallback_counts_term_frequency() {
        let distiller = InsightDistiller::new(None, Duration::from_secs(5));
        let combined =
            "technical system solution implementation specification technical system metric";
        let insights = distiller
            .distill_additional(combined, &ProposalRequest::default())
            .await;

        assert!(insights.contains("technical content"));
        assert!(insights.contains("Success metrics"));
        // Below the financial threshold
        assert!(!insights.contains("budget and pricing"));
    }

    #[tokio::test]
    async fn test_additional_fallback_default() {
        let distiller = InsightDistiller::new(None, Duration::from_secs(5));
        let insights = distiller
            .distill_additional("Nothing of note here.", &ProposalRequest::default())
            .await;
        assert!(insights.contains("supporting information"));
    }
}
