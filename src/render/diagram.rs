//! Fixed Diagram Templates
//!
//! Mermaid diagram descriptions keyed off a section's vocabulary. Sections
//! whose key matches one of the visual topics get one fixed-template diagram
//! (schedule chart or directed graph); everything else contributes nothing.

use crate::types::Section;

/// One diagram attached to a section in the visualization artifact.
pub struct SectionDiagram {
    pub heading: &'static str,
    pub description: &'static str,
    pub mermaid: String,
}

/// Select the diagram template for a section, if its key names a visual
/// topic (timeline, architecture, modular, implementation, deliverables,
/// structure).
pub fn diagram_for(section: &Section, company_name: &str) -> Option<SectionDiagram> {
    let key = section.key.to_lowercase();

    if key.contains("timeline") {
        Some(SectionDiagram {
            heading: "Project Timeline",
            description: "This interactive timeline shows the complete project schedule with all phases, milestones, and dependencies.",
            mermaid: format!(
                r#"gantt
    title {} Project Timeline
    dateFormat YYYY-MM-DD

    section Planning Phase
    Requirements Analysis    :active, req, 2024-01-01, 2w
    System Design          :design, after req, 2w

    section Development Phase
    Core Development       :dev, after design, 6w
    Integration Testing    :test, after dev, 2w

    section Deployment Phase
    User Training          :training, after test, 1w
    Go-Live               :golive, after training, 1w"#,
                company_name
            ),
        })
    } else if key.contains("architecture") {
        Some(SectionDiagram {
            heading: "System Architecture",
            description: "This diagram illustrates the complete system architecture with all components and their relationships.",
            mermaid: r#"graph TD
    A[User Interface Layer] --> B[API Gateway]
    B --> C[Authentication Service]
    B --> D[Business Logic Layer]
    D --> E[Data Access Layer]
    E --> F[(Primary Database)]
    E --> G[(Cache Layer)]
    D --> H[External Services]
    I[Load Balancer] --> A
    J[CDN] --> I"#
                .to_string(),
        })
    } else if key.contains("modular") {
        Some(SectionDiagram {
            heading: "Modular Solution Design",
            description: "This diagram shows how our modular solution architecture enables scalability and maintainability.",
            mermaid: r#"graph LR
    Core[Core System] --> UserMgmt[User Management Module]
    Core --> DataProc[Data Processing Module]
    Core --> Reports[Reporting Module]
    Core --> Integration[Integration Module]

    UserMgmt --> Auth[Authentication]
    UserMgmt --> Profile[Profile Management]
    UserMgmt --> Permissions[Permissions]

    DataProc --> Ingestion[Data Ingestion]
    DataProc --> Validation[Data Validation]
    DataProc --> Transform[Data Transformation]

    Reports --> Dashboard[Dashboard]
    Reports --> Analytics[Analytics Engine]
    Reports --> Export[Export Functions]"#
                .to_string(),
        })
    } else if key.contains("implementation") {
        Some(SectionDiagram {
            heading: "Implementation Process Flow",
            description: "This flowchart shows the step-by-step implementation process with decision points and deliverables.",
            mermaid: r#"flowchart TD
    A[Project Kickoff] --> B{Requirements Review}
    B --> C[System Design]
    C --> D[Development Sprint 1]
    D --> E[Testing & QA]
    E --> F{Quality Gate}
    F -->|Pass| G[Development Sprint 2]
    F -->|Fail| D
    G --> H[Integration Testing]
    H --> I[User Acceptance Testing]
    I --> J{UAT Approval}
    J -->|Approved| K[Production Deployment]
    J -->|Changes Required| G
    K --> L[Go-Live Support]"#
                .to_string(),
        })
    } else if key.contains("deliverables") || key.contains("structure") {
        Some(SectionDiagram {
            heading: "Project Deliverables Structure",
            description: "This diagram shows all project deliverables organized by phase and their interdependencies.",
            mermaid: r#"graph TD
    subgraph "Phase 1: Planning"
        A[Requirements Document]
        B[System Architecture]
        C[Project Plan]
    end

    subgraph "Phase 2: Development"
        D[Core System]
        E[User Interface]
        F[API Documentation]
    end

    subgraph "Phase 3: Testing"
        G[Test Results]
        H[User Manual]
        I[Training Materials]
    end

    subgraph "Phase 4: Deployment"
        J[Production System]
        K[Support Documentation]
        L[Maintenance Plan]
    end

    A --> D
    B --> D
    B --> E
    C --> D
    D --> G
    E --> G
    G --> J
    H --> I
    I --> L"#
                .to_string(),
        })
    } else {
        None
    }
}
