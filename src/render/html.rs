//! HTML Visualization Renderer
//!
//! Emits a self-contained HTML artifact: a linked table of contents, every
//! non-filtered section's numbered heading and body, and fixed mermaid
//! diagrams for sections whose key names a visual topic.

use tracing::debug;

use super::{RenderContext, anchor_name, diagram, heading_label, sanitize_file_stem, strip_emphasis, toc_label};
use crate::types::{Result, Section, visit};

const FORMAT: &str = "html";

/// Render the visualization artifact, returning its filename.
pub fn render(ctx: &RenderContext<'_>) -> Result<String> {
    let rtl = ctx.request.language.is_rtl();
    let labels = ctx.request.language.labels();
    let company = escape(ctx.company_name);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html lang=\"{}\"{}>\n",
        ctx.request.language,
        if rtl { " dir=\"rtl\"" } else { "" }
    ));
    html.push_str(&format!(
        r#"<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{company} - Project Visualizations</title>
    <script src="https://cdn.jsdelivr.net/npm/mermaid/dist/mermaid.min.js"></script>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f8f9fa;
        }}
        .header {{
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 2rem;
            border-radius: 10px;
            margin-bottom: 2rem;
            text-align: center;
        }}
        .toc, .content-section {{
            background: white;
            padding: 2rem;
            margin-bottom: 2rem;
            border-radius: 10px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }}
        .toc a {{ color: #667eea; text-decoration: none; }}
        .toc-entry {{ margin: 0.25rem 0; }}
        .mermaid {{ text-align: center; margin: 2rem 0; }}
        h1 {{ margin: 0; font-size: 2.5rem; }}
        h2 {{ color: #667eea; border-bottom: 2px solid #667eea; padding-bottom: 0.5rem; }}
        h3, h4 {{ color: #555; }}
        .description {{
            background: #e3f2fd;
            padding: 1rem;
            border-radius: 5px;
            margin: 1rem 0;
            border-left: 4px solid #2196F3;
        }}
        .timestamp {{
            text-align: center;
            color: #666;
            font-size: 0.9rem;
            margin-top: 2rem;
        }}
    </style>
</head>
<body>
    <div class="header">
        <h1>Project Visualizations</h1>
        <p>Interactive Diagrams and Content Overview for {company}</p>
        <p>Proposal Type: {kind} | Sector: {sector}</p>
    </div>
"#,
        company = company,
        kind = escape(&ctx.request.kind.to_string()),
        sector = escape(&ctx.request.sector),
    ));

    // Pass 1: table of contents, one linked line per non-filtered section.
    html.push_str("    <nav class=\"toc\">\n");
    html.push_str(&format!(
        "        <h2>{}</h2>\n",
        escape(labels.table_of_contents)
    ));
    let mut toc_entries: Vec<String> = Vec::new();
    let mut toc_error: Option<crate::types::SmithError> = None;
    visit(ctx.structure, &mut |section, depth| {
        if !ctx.includes(section) || toc_error.is_some() {
            return;
        }
        match ctx.shape(&toc_label(section, rtl), FORMAT) {
            Ok(label) => toc_entries.push(format!(
                "        <div class=\"toc-entry\" style=\"margin-inline-start: {}em\"><a href=\"#{}\">{}</a></div>\n",
                depth * 2,
                anchor_name(&section.key),
                escape(&label)
            )),
            Err(e) => toc_error = Some(e),
        }
    });
    if let Some(e) = toc_error {
        return Err(e);
    }
    for entry in &toc_entries {
        html.push_str(entry);
    }
    html.push_str("    </nav>\n");

    // Pass 2: anchored headings and bodies, same traversal and same anchors.
    let mut body = String::new();
    render_sections(ctx, ctx.structure, rtl, &mut body)?;
    html.push_str(&body);

    html.push_str(&format!(
        r#"    <div class="timestamp">
        Generated on {}
    </div>

    <script>
        mermaid.initialize({{ startOnLoad: true, theme: 'default' }});
    </script>
</body>
</html>
"#,
        chrono::Local::now().format("%B %d, %Y at %I:%M %p")
    ));

    let filename = format!(
        "visualization_{}_{}.html",
        ctx.job_id,
        sanitize_file_stem(ctx.company_name)
    );
    std::fs::write(ctx.artifact_path(&filename), html)?;
    debug!("Wrote visualization artifact {}", filename);
    Ok(filename)
}

fn render_sections(
    ctx: &RenderContext<'_>,
    sections: &[Section],
    rtl: bool,
    out: &mut String,
) -> Result<()> {
    for section in sections {
        if ctx.includes(section) {
            let label = ctx.shape(&heading_label(section, rtl), FORMAT)?;
            let heading_tag = match section.level {
                1 => "h2",
                2 => "h3",
                _ => "h4",
            };

            out.push_str(&format!(
                "    <section class=\"content-section\" id=\"{}\">\n",
                anchor_name(&section.key)
            ));
            out.push_str(&format!(
                "        <{tag}>{label}</{tag}>\n",
                tag = heading_tag,
                label = escape(&label)
            ));

            if let Some(content) = ctx.content.get(&section.key) {
                render_body(ctx, content, out)?;
            }

            if let Some(diagram) = diagram::diagram_for(section, ctx.company_name) {
                out.push_str(&format!(
                    "        <h3>{}</h3>\n        <div class=\"description\">{}</div>\n        <div class=\"mermaid\">\n{}\n        </div>\n",
                    escape(diagram.heading),
                    escape(diagram.description),
                    diagram.mermaid
                ));
            }

            out.push_str("    </section>\n");
        }

        render_sections(ctx, &section.subsections, rtl, out)?;
    }
    Ok(())
}

/// Emit body text as paragraphs, grouping bullet lines into lists.
fn render_body(ctx: &RenderContext<'_>, content: &str, out: &mut String) -> Result<()> {
    let cleaned = strip_emphasis(content);
    let mut in_list = false;

    for line in cleaned.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let shaped = ctx.shape(line, FORMAT)?;
        if let Some(item) = shaped.strip_prefix("- ").or_else(|| shaped.strip_prefix("• ")) {
            if !in_list {
                out.push_str("        <ul>\n");
                in_list = true;
            }
            out.push_str(&format!("            <li>{}</li>\n", escape(item)));
        } else {
            if in_list {
                out.push_str("        </ul>\n");
                in_list = false;
            }
            out.push_str(&format!("        <p>{}</p>\n", escape(&shaped)));
        }
    }
    if in_list {
        out.push_str("        </ul>\n");
    }
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentMap;
    use crate::render::LogicalOrderShaper;
    use crate::types::{Language, ProposalRequest, number_sections};
    use tempfile::TempDir;

    fn sample_structure() -> Vec<Section> {
        let mut deliverables = Section::new("deliverables_outcomes", "Deliverables", 1);
        deliverables.add_subsection(Section::new("primary_deliverables", "Primary", 2));
        let mut tree = vec![
            Section::new("executive_summary", "Executive Summary", 1),
            deliverables,
            Section::new("conclusion", "Conclusion", 1),
        ];
        number_sections(&mut tree);
        tree
    }

    fn render_with(request: ProposalRequest) -> (TempDir, String, String) {
        let dir = TempDir::new().unwrap();
        let mut content = ContentMap::new();
        content.insert(
            "executive_summary".into(),
            "Overview paragraph.\n- First point\n- Second point\nClosing.".into(),
        );
        let structure = sample_structure();
        let ctx = RenderContext {
            content: &content,
            structure: &structure,
            company_name: "Acme & Co",
            job_id: "job123",
            request: &request,
            output_dir: dir.path(),
            shaper: &LogicalOrderShaper,
        };
        let filename = render(&ctx).unwrap();
        let html = std::fs::read_to_string(dir.path().join(&filename)).unwrap();
        (dir, filename, html)
    }

    #[test]
    fn test_toc_and_body_share_anchor() {
        let (_dir, _name, html) = render_with(ProposalRequest::default());
        assert!(html.contains("href=\"#section_executive_summary\""));
        assert!(html.contains("id=\"section_executive_summary\""));
        assert!(html.contains("href=\"#section_primary_deliverables\""));
        assert!(html.contains("id=\"section_primary_deliverables\""));
    }

    #[test]
    fn test_selection_filter_excludes_sections() {
        let request = ProposalRequest {
            selected_sections: Some(vec!["executive_summary".into(), "conclusion".into()]),
            ..Default::default()
        };
        let (_dir, _name, html) = render_with(request);
        assert!(html.contains("id=\"section_executive_summary\""));
        assert!(!html.contains("id=\"section_deliverables_outcomes\""));
        assert!(!html.contains("href=\"#section_deliverables_outcomes\""));
    }

    #[test]
    fn test_visual_topic_gets_diagram() {
        let (_dir, _name, html) = render_with(ProposalRequest::default());
        assert!(html.contains("class=\"mermaid\""));
        assert!(html.contains("Phase 1: Planning"));
    }

    #[test]
    fn test_body_renders_bullets_and_paragraphs() {
        let (_dir, _name, html) = render_with(ProposalRequest::default());
        assert!(html.contains("<li>First point</li>"));
        assert!(html.contains("<p>Overview paragraph.</p>"));
    }

    #[test]
    fn test_rtl_sets_direction_and_mirrors_labels() {
        let request = ProposalRequest {
            language: Language::Ar,
            ..Default::default()
        };
        let (_dir, _name, html) = render_with(request);
        assert!(html.contains("dir=\"rtl\""));
        assert!(html.contains("Executive Summary .1"));
    }

    #[test]
    fn test_rtl_without_capable_shaper_fails_this_format_only() {
        struct LatinOnlyShaper;
        impl crate::render::TextShaper for LatinOnlyShaper {
            fn supports(&self, language: Language) -> bool {
                !language.is_rtl()
            }
            fn shape(&self, text: &str) -> crate::types::Result<String> {
                Ok(text.to_string())
            }
        }

        let dir = TempDir::new().unwrap();
        let content = ContentMap::new();
        let structure = sample_structure();
        let request = ProposalRequest {
            language: Language::Ar,
            ..Default::default()
        };
        let ctx = RenderContext {
            content: &content,
            structure: &structure,
            company_name: "Acme",
            job_id: "job9",
            request: &request,
            output_dir: dir.path(),
            shaper: &LatinOnlyShaper,
        };

        let err = render(&ctx).unwrap_err();
        assert!(matches!(err, crate::types::SmithError::Render { .. }));
        // Nothing was written for the failed format
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_company_name_is_escaped() {
        let (_dir, _name, html) = render_with(ProposalRequest::default());
        assert!(html.contains("Acme &amp; Co"));
    }

    #[test]
    fn test_filename_is_collision_resistant() {
        let (_dir, name, _html) = render_with(ProposalRequest::default());
        assert_eq!(name, "visualization_job123_Acme___Co.html");
    }
}
