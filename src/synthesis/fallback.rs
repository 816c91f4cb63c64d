//! Fixed Fallback Structure
//!
//! The deterministic proposal outline used whenever the generative model is
//! unavailable or replies with something unusable. Twelve top-level sections
//! in a fixed business-priority order: deliverables and pricing precede
//! technical depth so a reader understands value before mechanism. The same
//! ordering is instructed to the model on the primary path, so both paths
//! agree on priority.

use crate::types::Section;

/// Build the twelve-section fallback outline. Numbering is not assigned here;
/// the synthesizer always renumbers after tree construction.
pub fn fallback_structure() -> Vec<Section> {
    let mut sections = Vec::with_capacity(12);

    sections.push(
        Section::new("executive_summary", "Executive Summary", 1).with_requirements(&[
            "Project overview",
            "Key benefits",
            "Value proposition",
            "Investment summary",
        ]),
    );

    sections.push(
        Section::new(
            "understanding_requirements",
            "Understanding of Requirements",
            1,
        )
        .with_requirements(&[
            "RFP analysis",
            "Key challenges",
            "Scope clarification",
            "Success criteria",
        ]),
    );

    let mut deliverables = Section::new(
        "deliverables_outcomes",
        "Deliverables and Expected Outcomes",
        1,
    )
    .with_requirements(&[
        "Key deliverables",
        "Expected outcomes",
        "Success metrics",
        "Value to client",
    ]);
    deliverables.add_subsection(
        Section::new("primary_deliverables", "Primary Deliverables", 2).with_requirements(&[
            "Main outputs",
            "Quality standards",
            "Acceptance criteria",
        ]),
    );
    deliverables.add_subsection(
        Section::new("expected_outcomes", "Expected Business Outcomes", 2).with_requirements(&[
            "Business impact",
            "Performance improvements",
            "ROI expectations",
        ]),
    );
    sections.push(deliverables);

    let mut pricing = Section::new("pricing_investment", "Pricing and Investment Structure", 1)
        .with_requirements(&[
            "Investment overview",
            "Pricing model",
            "Value justification",
            "Payment terms",
        ]);
    pricing.add_subsection(
        Section::new("investment_summary", "Investment Summary", 2).with_requirements(&[
            "Total investment",
            "Cost breakdown",
            "Value proposition",
        ]),
    );
    pricing.add_subsection(
        Section::new("pricing_model", "Pricing Model", 2).with_requirements(&[
            "Pricing structure",
            "Payment schedule",
            "Terms and conditions",
        ]),
    );
    sections.push(pricing);

    let mut solution = Section::new("proposed_solution", "Proposed Solution and Approach", 1)
        .with_requirements(&[
            "Solution overview",
            "Approach methodology",
            "Innovation highlights",
        ]);
    solution.add_subsection(
        Section::new("solution_overview", "Solution Overview", 2).with_requirements(&[
            "High-level approach",
            "Key features",
            "Differentiators",
        ]),
    );
    solution.add_subsection(
        Section::new("methodology", "Implementation Methodology", 2).with_requirements(&[
            "Process framework",
            "Best practices",
            "Quality approach",
        ]),
    );
    sections.push(solution);

    let mut technical = Section::new("technical_specifications", "Technical Specifications", 1)
        .with_requirements(&[
            "Technical requirements",
            "Architecture overview",
            "Technology stack",
        ]);
    technical.add_subsection(
        Section::new("technical_approach", "Technical Approach", 2).with_requirements(&[
            "Architecture",
            "Technologies",
            "Standards",
            "Integration",
        ]),
    );
    technical.add_subsection(
        Section::new("technical_requirements", "Technical Requirements", 2).with_requirements(&[
            "System requirements",
            "Performance specifications",
            "Compliance standards",
        ]),
    );
    sections.push(technical);

    let mut implementation = Section::new(
        "implementation_plan",
        "Implementation Plan and Timeline",
        1,
    )
    .with_requirements(&[
        "Project phases",
        "Timeline",
        "Milestones",
        "Resource allocation",
    ]);
    implementation.add_subsection(
        Section::new("project_phases", "Project Phases", 2).with_requirements(&[
            "Phase breakdown",
            "Phase deliverables",
            "Dependencies",
        ]),
    );
    implementation.add_subsection(
        Section::new("timeline_milestones", "Timeline and Milestones", 2).with_requirements(&[
            "Project schedule",
            "Key dates",
            "Critical path",
            "Visual timeline diagram",
        ]),
    );
    implementation.add_subsection(
        Section::new(
            "project_timeline_visual",
            "Project Timeline Visualization",
            2,
        )
        .with_requirements(&[
            "Gantt-style timeline",
            "Phase dependencies",
            "Milestone markers",
            "Resource allocation visual",
        ]),
    );
    sections.push(implementation);

    sections.push(
        Section::new("team_qualifications", "Team and Qualifications", 1).with_requirements(&[
            "Team structure",
            "Key personnel",
            "Relevant experience",
            "Certifications",
        ]),
    );

    sections.push(
        Section::new("risk_management", "Risk Management and Mitigation", 1).with_requirements(&[
            "Risk identification",
            "Mitigation strategies",
            "Contingency plans",
            "Risk monitoring",
        ]),
    );

    sections.push(
        Section::new(
            "quality_assurance",
            "Quality Assurance and Success Metrics",
            1,
        )
        .with_requirements(&[
            "QA processes",
            "Testing procedures",
            "Success metrics",
            "Performance monitoring",
        ]),
    );

    sections.push(
        Section::new("support_maintenance", "Support and Maintenance", 1).with_requirements(&[
            "Support model",
            "Maintenance approach",
            "SLA commitments",
            "Ongoing services",
        ]),
    );

    sections.push(
        Section::new("conclusion", "Conclusion and Next Steps", 1).with_requirements(&[
            "Summary",
            "Next steps",
            "Call to action",
            "Contact information",
        ]),
    );

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_twelve_top_level_sections() {
        assert_eq!(fallback_structure().len(), 12);
    }

    #[test]
    fn test_business_priority_order() {
        let keys: Vec<String> = fallback_structure().iter().map(|s| s.key.clone()).collect();

        assert_eq!(keys[0], "executive_summary");
        assert_eq!(keys[11], "conclusion");

        let position = |key: &str| keys.iter().position(|k| k == key).unwrap();
        assert!(position("deliverables_outcomes") < position("technical_specifications"));
        assert!(position("pricing_investment") < position("technical_specifications"));
    }

    #[test]
    fn test_fixed_subsections() {
        let sections = fallback_structure();
        let by_key = |key: &str| {
            sections
                .iter()
                .find(|s| s.key == key)
                .map(|s| s.subsections.len())
                .unwrap()
        };

        assert_eq!(by_key("deliverables_outcomes"), 2);
        assert_eq!(by_key("pricing_investment"), 2);
        assert_eq!(by_key("proposed_solution"), 2);
        assert_eq!(by_key("technical_specifications"), 2);
        assert_eq!(by_key("implementation_plan"), 3);
    }

    #[test]
    fn test_every_section_has_generation_hints() {
        let sections = fallback_structure();
        let flat = crate::types::flatten(&sections);
        assert!(flat.iter().all(|s| !s.content_requirements.is_empty()));
    }

    #[test]
    fn test_nothing_is_marked_dynamic() {
        let sections = fallback_structure();
        let flat = crate::types::flatten(&sections);
        assert!(flat.iter().all(|s| !s.is_dynamic));
    }

    #[test]
    fn test_timeline_subsection_requests_visual() {
        let sections = fallback_structure();
        let implementation = sections
            .iter()
            .find(|s| s.key == "implementation_plan")
            .unwrap();
        assert!(
            implementation
                .subsections
                .iter()
                .any(|s| s.content_requirements.iter().any(|r| r.contains("timeline")))
        );
    }
}
