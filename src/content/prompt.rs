//! Per-Section Content Prompts
//!
//! Builds the prompt for one section's generation call: capped source prefix,
//! company/sector context, distilled supporting-document insights, the
//! section's own identity and hints, and tone guidance keyed off the section
//! vocabulary (client-value framing for deliverables, investment framing for
//! pricing, business-before-jargon framing for technical sections).

use crate::ai::excerpt;
use crate::constants::prompt;
use crate::types::{ProposalRequest, Section};

/// Tone guidance for deliverables/outcomes sections.
const DELIVERABLES_GUIDANCE: &str = r#"
SPECIFIC GUIDANCE FOR DELIVERABLES/OUTCOMES SECTION:
- Focus on CONCRETE, MEASURABLE deliverables that the client will receive
- Clearly define success criteria and acceptance criteria for each deliverable
- Quantify expected outcomes where possible (performance improvements, cost savings, efficiency gains)
- Emphasize business value and ROI rather than technical features
- Use client-focused language ("You will receive...", "This will enable you to...")
- Include timelines for when each deliverable will be completed
- Address how deliverables align with the client's strategic objectives
"#;

/// Tone guidance for pricing/investment sections.
const PRICING_GUIDANCE: &str = r#"
SPECIFIC GUIDANCE FOR PRICING/INVESTMENT SECTION:
- Present pricing as an investment in business outcomes, not just costs
- Break down pricing into clear, logical components
- Justify pricing with value proposition and ROI analysis
- Compare investment to potential business benefits and cost savings
- Provide flexible pricing options if appropriate (phases, modules, tiers)
- Address total cost of ownership, not just initial investment
- Include what is and isn't included in the pricing
- Use confident, value-focused language about the investment
"#;

/// Tone guidance for technical sections.
const TECHNICAL_GUIDANCE: &str = r#"
SPECIFIC GUIDANCE FOR TECHNICAL SECTIONS:
- Only include technical details AFTER business value has been established
- Focus on how technical choices support business outcomes
- Avoid overwhelming technical jargon - keep it accessible to business stakeholders
- Emphasize proven technologies and industry standards
- Connect technical features to business benefits
"#;

/// Select the fixed guidance block for a section key, if any matches.
pub fn guidance_for(key: &str) -> Option<&'static str> {
    let key = key.to_lowercase();
    if key.contains("deliverables") || key.contains("outcomes") {
        Some(DELIVERABLES_GUIDANCE)
    } else if key.contains("pricing") || key.contains("investment") {
        Some(PRICING_GUIDANCE)
    } else if key.contains("technical") {
        Some(TECHNICAL_GUIDANCE)
    } else {
        None
    }
}

/// Build the full prompt for one section's generation call.
pub fn section_prompt(source_text: &str, section: &Section, request: &ProposalRequest) -> String {
    let mut section_info = format!(
        "{}. {} (Level {})",
        section.number, section.title, section.level
    );
    if !section.content_requirements.is_empty() {
        section_info.push_str(&format!(
            " - Requirements: {}",
            section.content_requirements.join(", ")
        ));
    }

    let mut insights_context = String::new();
    if let Some(insights) = &request.special_insights {
        insights_context.push_str(&format!(
            "\n\nSPECIAL DOCUMENT INSIGHTS:\n{}\n",
            excerpt(insights, prompt::INSIGHT_EXCERPT_CHARS)
        ));
    }
    if let Some(insights) = &request.additional_insights {
        insights_context.push_str(&format!(
            "\n\nADDITIONAL DOCUMENTS INSIGHTS:\n{}\n",
            excerpt(insights, prompt::INSIGHT_EXCERPT_CHARS)
        ));
    }

    let guidance = guidance_for(&section.key).unwrap_or("");

    format!(
        r#"You are an expert proposal writer. Generate comprehensive content for a single section of a professional proposal responding to an RFP. The response must be in {language}.

RFP CONTENT (for context):
{source}

COMPANY DETAILS:
- Company: {company}
- Sector: {sector}

{insights}

Generate detailed content for this specific section, in {language}:
{section_info}

{guidance}

GENERAL REQUIREMENTS:
1. The content for this section should be 500-800 words.
2. Address the specific RFP requirements and challenges related to this section.
3. Include specific examples, data, and case studies where relevant.
4. Ensure content directly responds to the RFP's needs for this topic.
5. Make the content engaging, persuasive, and highly detailed.
6. Use industry-specific terminology appropriately for the {language} language.
7. Structure the content with paragraphs, bullet points, and subheadings for readability.
8. IMPORTANT: Incorporate relevant insights from the special and additional documents where applicable to this section.
9. Reference standards, best practices, and methodologies from the supporting documents when relevant.
10. CRITICAL: For deliverables and pricing sections, focus on BUSINESS VALUE and CLIENT OUTCOMES first.

Respond with ONLY the detailed content for the section as a single string, in {language}. Do not wrap it in JSON or markdown.
"#,
        language = request.language,
        source = excerpt(source_text, prompt::CONTENT_SOURCE_CHARS),
        company = request.company_name,
        sector = request.sector,
        insights = insights_context,
        section_info = section_info,
        guidance = guidance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guidance_selection() {
        assert!(guidance_for("deliverables_outcomes").is_some());
        assert!(guidance_for("expected_outcomes").is_some());
        assert!(guidance_for("pricing_investment").is_some());
        assert!(guidance_for("technical_specifications").is_some());
        assert!(guidance_for("executive_summary").is_none());
    }

    #[test]
    fn test_guidance_blocks_differ_by_topic() {
        assert!(guidance_for("deliverables").unwrap().contains("MEASURABLE"));
        assert!(guidance_for("pricing_model").unwrap().contains("investment"));
        assert!(guidance_for("technical_approach").unwrap().contains("jargon"));
    }

    #[test]
    fn test_prompt_carries_section_identity_and_insights() {
        let mut section = Section::new("pricing_investment", "Pricing", 1);
        section.number = "4".into();
        section.content_requirements = vec!["Payment terms".into()];

        let request = ProposalRequest {
            company_name: "Acme".into(),
            sector: "health".into(),
            special_insights: Some("Follow ISO 13485.".into()),
            ..Default::default()
        };

        let prompt = section_prompt("RFP body", &section, &request);
        assert!(prompt.contains("4. Pricing (Level 1)"));
        assert!(prompt.contains("Requirements: Payment terms"));
        assert!(prompt.contains("SPECIAL DOCUMENT INSIGHTS"));
        assert!(prompt.contains("ISO 13485"));
        assert!(prompt.contains("PRICING/INVESTMENT"));
        assert!(prompt.contains("Company: Acme"));
    }

    #[test]
    fn test_prompt_caps_insight_excerpts() {
        let section = Section::new("team", "Team", 1);
        let request = ProposalRequest {
            additional_insights: Some("y".repeat(5000)),
            ..Default::default()
        };
        let prompt = section_prompt("src", &section, &request);
        // 1000-char excerpt plus the handful of y's in the scaffolding text
        assert!(prompt.matches('y').count() <= 1050);
    }
}
