//! Word-Processor Renderer
//!
//! Emits the proposal as a .docx document: title page, table of contents
//! whose entries carry PAGEREF fields pointing at per-section bookmarks, the
//! anchored numbered headings and bodies, optional header/footer logos, and a
//! "Page X of Y" footer built from PAGE/NUMPAGES fields (the word processor
//! recomputes the fields at display time, which is this target's equivalent
//! of a print-time pagination pass).

use docx_rs::{
    AlignmentType, BreakType, Docx, FieldCharType, Footer, Header, InstrPAGEREF, InstrText,
    Paragraph, Pic, Run, Style, StyleType,
};
use tracing::debug;

use super::{
    RenderContext, anchor_name, fetch_image, heading_label, sanitize_file_stem, strip_emphasis,
    toc_label,
};
use crate::types::{Result, Section, SmithError, visit};

const FORMAT: &str = "docx";

/// Logo edge length in EMU (~0.72 inch).
const LOGO_SIZE_EMU: u32 = 660_000;

/// Render the word-processor artifact, returning its filename.
pub async fn render(ctx: &RenderContext<'_>) -> Result<String> {
    let rtl = ctx.request.language.is_rtl();
    let labels = ctx.request.language.labels();
    let align_main = if rtl {
        AlignmentType::Right
    } else {
        AlignmentType::Left
    };
    let align_title = if rtl {
        AlignmentType::Right
    } else {
        AlignmentType::Center
    };

    let mut doc = Docx::new();
    for level in 1..=4u8 {
        doc = doc.add_style(
            Style::new(format!("Heading{}", level), StyleType::Paragraph)
                .name(format!("Heading {}", level))
                .size((40 - level as usize * 4).max(24))
                .bold(),
        );
    }

    // Title page
    let title = ctx.shape(labels.document_title(ctx.request.kind), FORMAT)?;
    let prepared = ctx.shape(
        &format!("{} {}", labels.prepared_for, ctx.company_name),
        FORMAT,
    )?;
    doc = doc
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(title).size(56).bold())
                .align(align_title),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(prepared).size(32).bold())
                .align(align_title),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(
                    Run::new()
                        .add_text(chrono::Local::now().format("%B %Y").to_string())
                        .size(28),
                )
                .align(align_title),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));

    // Pass 1: table of contents with PAGEREF cross-references
    doc = doc.add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(ctx.shape(labels.table_of_contents, FORMAT)?))
            .style("Heading1")
            .align(align_main),
    );
    doc = doc.add_paragraph(
        Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(
                        "Note: To update page numbers, select all text (Ctrl+A) and press F9.",
                    )
                    .italic()
                    .size(18),
            )
            .align(AlignmentType::Center),
    );

    let entries = collect_entries(ctx, rtl)?;
    for entry in &entries {
        doc = doc.add_paragraph(toc_entry_paragraph(entry, align_main));
    }
    doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));

    // Pass 2: anchored headings and bodies, same anchors as the TOC
    let mut bookmark_id: usize = 1;
    let included_roots = ctx
        .structure
        .iter()
        .filter(|s| ctx.includes(s) || subtree_included(ctx, s))
        .count();
    let mut emitted_roots = 0;

    for root in ctx.structure {
        if !ctx.includes(root) && !subtree_included(ctx, root) {
            continue;
        }
        doc = add_section(doc, ctx, root, rtl, align_main, &mut bookmark_id)?;
        emitted_roots += 1;

        // Hard page break after each top-level section except the last
        if root.level == 1 && emitted_roots < included_roots {
            doc = doc.add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        }
    }

    // Header/footer: logos and "Page X of Y" fields
    let mut header = Header::new();
    if let Some(bytes) = fetch_image(&ctx.request.logo_top_left).await {
        header = header.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_image(Pic::new(&bytes).size(LOGO_SIZE_EMU, LOGO_SIZE_EMU)))
                .align(AlignmentType::Left),
        );
    }
    doc = doc.header(header);

    let mut footer = Footer::new().add_paragraph(page_number_paragraph(
        labels.page,
        labels.of,
    ));
    if let Some(bytes) = fetch_image(&ctx.request.logo_bottom_right).await {
        footer = footer.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_image(Pic::new(&bytes).size(LOGO_SIZE_EMU, LOGO_SIZE_EMU)))
                .align(AlignmentType::Right),
        );
    }
    doc = doc.footer(footer);

    let filename = format!(
        "proposal_{}_{}.docx",
        sanitize_file_stem(ctx.company_name),
        ctx.job_id
    );
    let file = std::fs::File::create(ctx.artifact_path(&filename))?;
    doc.build()
        .pack(file)
        .map_err(|e| SmithError::render(FORMAT, e.to_string()))?;

    debug!("Wrote word-processor artifact {}", filename);
    Ok(filename)
}

struct TocEntry {
    label: String,
    anchor: String,
    depth: usize,
}

fn collect_entries(ctx: &RenderContext<'_>, rtl: bool) -> Result<Vec<TocEntry>> {
    let mut entries = Vec::new();
    let mut failure: Option<SmithError> = None;
    visit(ctx.structure, &mut |section, depth| {
        if !ctx.includes(section) || failure.is_some() {
            return;
        }
        match ctx.shape(&toc_label(section, rtl), FORMAT) {
            Ok(label) => entries.push(TocEntry {
                label,
                anchor: anchor_name(&section.key),
                depth,
            }),
            Err(e) => failure = Some(e),
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(entries),
    }
}

/// One TOC line: indented label, tab, then a PAGEREF field resolving to the
/// bookmark emitted with the section's heading.
fn toc_entry_paragraph(entry: &TocEntry, align: AlignmentType) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(entry.label.as_str()))
        .add_run(Run::new().add_tab())
        .add_run(Run::new().add_field_char(FieldCharType::Begin, false))
        .add_run(Run::new().add_instr_text(InstrText::PAGEREF(
            InstrPAGEREF::new(entry.anchor.as_str()).hyperlink(),
        )))
        .add_run(Run::new().add_field_char(FieldCharType::Separate, false))
        .add_run(Run::new().add_text("1"))
        .add_run(Run::new().add_field_char(FieldCharType::End, false))
        .align(align)
        .indent(Some(entry.depth as i32 * 360), None, None, None)
}

/// Whether any descendant of an excluded node is itself included.
fn subtree_included(ctx: &RenderContext<'_>, section: &Section) -> bool {
    section
        .subsections
        .iter()
        .any(|s| ctx.includes(s) || subtree_included(ctx, s))
}

fn add_section(
    mut doc: Docx,
    ctx: &RenderContext<'_>,
    section: &Section,
    rtl: bool,
    align: AlignmentType,
    bookmark_id: &mut usize,
) -> Result<Docx> {
    if ctx.includes(section) {
        let label = ctx.shape(&heading_label(section, rtl), FORMAT)?;
        let style_id = format!("Heading{}", section.level.min(4));
        let id = *bookmark_id;
        *bookmark_id += 1;

        doc = doc.add_paragraph(
            Paragraph::new()
                .add_bookmark_start(id, anchor_name(&section.key))
                .add_run(Run::new().add_text(label))
                .add_bookmark_end(id)
                .style(&style_id)
                .align(align),
        );

        if let Some(content) = ctx.content.get(&section.key) {
            for line in strip_emphasis(content).lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let text = match line.strip_prefix("- ") {
                    Some(item) => format!("• {}", item),
                    None => line.to_string(),
                };
                doc = doc.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text(ctx.shape(&text, FORMAT)?))
                        .align(align),
                );
            }
        }
        doc = doc.add_paragraph(Paragraph::new());
    }

    for subsection in &section.subsections {
        doc = add_section(doc, ctx, subsection, rtl, align, bookmark_id)?;
    }
    Ok(doc)
}

/// Footer paragraph with "Page X of Y" built from PAGE and NUMPAGES fields.
fn page_number_paragraph(page_label: &str, of_label: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(format!("{} ", page_label)))
        .add_run(Run::new().add_field_char(FieldCharType::Begin, false))
        .add_run(Run::new().add_instr_text(InstrText::Unsupported("PAGE".to_string())))
        .add_run(Run::new().add_field_char(FieldCharType::Separate, false))
        .add_run(Run::new().add_text("1"))
        .add_run(Run::new().add_field_char(FieldCharType::End, false))
        .add_run(Run::new().add_text(format!(" {} ", of_label)))
        .add_run(Run::new().add_field_char(FieldCharType::Begin, false))
        .add_run(Run::new().add_instr_text(InstrText::Unsupported("NUMPAGES".to_string())))
        .add_run(Run::new().add_field_char(FieldCharType::Separate, false))
        .add_run(Run::new().add_text("1"))
        .add_run(Run::new().add_field_char(FieldCharType::End, false))
        .align(AlignmentType::Center)
}
