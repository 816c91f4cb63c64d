//! Spreadsheet Renderer
//!
//! Emits the proposal as a SpreadsheetML 2003 workbook (single-file XML that
//! spreadsheet applications open natively): a "Table of Contents" worksheet
//! whose entries hyperlink to the matching heading rows on the "Proposal"
//! worksheet, then the numbered headings and body rows themselves.
//!
//! The TOC needs each heading's eventual row before anything is written, so
//! rendering is two passes: a layout pass assigns rows to every included
//! section, then the emit pass writes both worksheets against that layout.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use tracing::debug;

use super::{RenderContext, heading_label, sanitize_file_stem, strip_emphasis, toc_label};
use crate::types::{Result, Section, SmithError, visit};

const FORMAT: &str = "sheet";
const CONTENT_SHEET: &str = "Proposal";

/// Render the workbook artifact, returning its filename.
pub fn render(ctx: &RenderContext<'_>) -> Result<String> {
    let rtl = ctx.request.language.is_rtl();
    let layout = layout_sections(ctx);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::PI(BytesPI::new(
            "mso-application progid=\"Excel.Sheet\"",
        )))
        .map_err(xml_err)?;

    let mut workbook = BytesStart::new("Workbook");
    workbook.push_attribute(("xmlns", "urn:schemas-microsoft-com:office:spreadsheet"));
    workbook.push_attribute(("xmlns:ss", "urn:schemas-microsoft-com:office:spreadsheet"));
    workbook.push_attribute(("xmlns:x", "urn:schemas-microsoft-com:office:excel"));
    writer.write_event(Event::Start(workbook)).map_err(xml_err)?;

    write_styles(&mut writer, rtl)?;
    write_toc_sheet(ctx, &mut writer, &layout, rtl)?;
    write_content_sheet(ctx, &mut writer, &layout, rtl)?;

    writer
        .write_event(Event::End(BytesEnd::new("Workbook")))
        .map_err(xml_err)?;

    let filename = format!(
        "proposal_sheet_{}_{}.xml",
        sanitize_file_stem(ctx.company_name),
        ctx.job_id
    );
    std::fs::write(ctx.artifact_path(&filename), writer.into_inner())?;
    debug!("Wrote spreadsheet artifact {}", filename);
    Ok(filename)
}

// =============================================================================
// Layout Pass
// =============================================================================

struct SectionRow<'a> {
    section: &'a Section,
    depth: usize,
    heading_row: usize,
    body_lines: Vec<String>,
}

/// Assign the content-sheet row of every included section's heading.
/// Row 1 is the sheet title, row 2 a spacer; each section occupies a heading
/// row, one row per body line, and a trailing spacer row.
fn layout_sections<'a>(ctx: &RenderContext<'a>) -> Vec<SectionRow<'a>> {
    let mut rows = Vec::new();
    let mut next_row = 3;

    visit(ctx.structure, &mut |section, depth| {
        if !ctx.includes(section) {
            return;
        }
        let body_lines = ctx
            .content
            .get(&section.key)
            .map(|content| {
                strip_emphasis(content)
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(|l| match l.strip_prefix("- ") {
                        Some(item) => format!("• {}", item),
                        None => l.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let heading_row = next_row;
        next_row += 1 + body_lines.len() + 1;
        rows.push(SectionRow {
            section,
            depth,
            heading_row,
            body_lines,
        });
    });

    rows
}

// =============================================================================
// Emit Pass
// =============================================================================

type SheetWriter = Writer<Vec<u8>>;

fn xml_err(e: std::io::Error) -> SmithError {
    SmithError::render(FORMAT, e.to_string())
}

fn write_styles(writer: &mut SheetWriter, rtl: bool) -> Result<()> {
    let align = if rtl { "Right" } else { "Left" };

    writer
        .write_event(Event::Start(BytesStart::new("Styles")))
        .map_err(xml_err)?;

    write_style(writer, "Title", "16", "#FFFFFF", Some("#003366"), "Center")?;
    write_style(writer, "TocTitle", "14", "#003366", None, align)?;
    write_style(writer, "TocEntry", "10", "#336699", None, align)?;
    write_style(writer, "Heading1", "14", "#003366", None, align)?;
    write_style(writer, "Heading2", "12", "#003366", None, align)?;
    write_style(writer, "Heading3", "11", "#336699", None, align)?;
    write_style(writer, "Heading4", "10", "#336699", None, align)?;
    write_body_style(writer, align)?;

    writer
        .write_event(Event::End(BytesEnd::new("Styles")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_style(
    writer: &mut SheetWriter,
    id: &str,
    size: &str,
    color: &str,
    interior: Option<&str>,
    align: &str,
) -> Result<()> {
    let mut style = BytesStart::new("Style");
    style.push_attribute(("ss:ID", id));
    writer.write_event(Event::Start(style)).map_err(xml_err)?;

    let mut font = BytesStart::new("Font");
    font.push_attribute(("ss:Bold", "1"));
    font.push_attribute(("ss:Size", size));
    font.push_attribute(("ss:Color", color));
    writer.write_event(Event::Empty(font)).map_err(xml_err)?;

    if let Some(interior_color) = interior {
        let mut fill = BytesStart::new("Interior");
        fill.push_attribute(("ss:Color", interior_color));
        fill.push_attribute(("ss:Pattern", "Solid"));
        writer.write_event(Event::Empty(fill)).map_err(xml_err)?;
    }

    let mut alignment = BytesStart::new("Alignment");
    alignment.push_attribute(("ss:Horizontal", align));
    writer.write_event(Event::Empty(alignment)).map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("Style")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_body_style(writer: &mut SheetWriter, align: &str) -> Result<()> {
    let mut style = BytesStart::new("Style");
    style.push_attribute(("ss:ID", "Body"));
    writer.write_event(Event::Start(style)).map_err(xml_err)?;

    let mut alignment = BytesStart::new("Alignment");
    alignment.push_attribute(("ss:Horizontal", align));
    alignment.push_attribute(("ss:Vertical", "Top"));
    alignment.push_attribute(("ss:WrapText", "1"));
    writer.write_event(Event::Empty(alignment)).map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("Style")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_toc_sheet(
    ctx: &RenderContext<'_>,
    writer: &mut SheetWriter,
    layout: &[SectionRow<'_>],
    rtl: bool,
) -> Result<()> {
    let labels = ctx.request.language.labels();
    open_worksheet(writer, "Table of Contents")?;

    write_text_row(writer, ctx.shape(labels.table_of_contents, FORMAT)?, "Title", None)?;
    write_blank_row(writer)?;

    for entry in layout {
        let indent = "    ".repeat(entry.depth);
        let label = ctx.shape(&toc_label(entry.section, rtl), FORMAT)?;
        let href = format!("#{}!A{}", CONTENT_SHEET, entry.heading_row);
        write_text_row(
            writer,
            format!("{}{}", indent, label),
            "TocEntry",
            Some(&href),
        )?;
    }

    close_worksheet(writer, rtl)?;
    Ok(())
}

fn write_content_sheet(
    ctx: &RenderContext<'_>,
    writer: &mut SheetWriter,
    layout: &[SectionRow<'_>],
    rtl: bool,
) -> Result<()> {
    let labels = ctx.request.language.labels();
    open_worksheet(writer, CONTENT_SHEET)?;

    let title = format!(
        "{} - {}",
        labels.document_title(ctx.request.kind),
        ctx.company_name
    );
    write_text_row(writer, ctx.shape(&title, FORMAT)?, "Title", None)?;
    write_blank_row(writer)?;

    for entry in layout {
        let heading_style = format!("Heading{}", entry.section.level.min(4));
        let label = ctx.shape(&heading_label(entry.section, rtl), FORMAT)?;
        write_text_row(writer, label, &heading_style, None)?;

        for line in &entry.body_lines {
            write_text_row(writer, ctx.shape(line, FORMAT)?, "Body", None)?;
        }
        write_blank_row(writer)?;
    }

    close_worksheet(writer, rtl)?;
    Ok(())
}

fn open_worksheet(writer: &mut SheetWriter, name: &str) -> Result<()> {
    let mut worksheet = BytesStart::new("Worksheet");
    worksheet.push_attribute(("ss:Name", name));
    writer.write_event(Event::Start(worksheet)).map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("Table")))
        .map_err(xml_err)?;
    Ok(())
}

fn close_worksheet(writer: &mut SheetWriter, rtl: bool) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new("Table")))
        .map_err(xml_err)?;

    if rtl {
        // Sheet-level right-to-left layout flag.
        let mut options = BytesStart::new("WorksheetOptions");
        options.push_attribute(("xmlns", "urn:schemas-microsoft-com:office:excel"));
        writer.write_event(Event::Start(options)).map_err(xml_err)?;
        writer
            .write_event(Event::Empty(BytesStart::new("DisplayRightToLeft")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("WorksheetOptions")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("Worksheet")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_text_row(
    writer: &mut SheetWriter,
    text: String,
    style: &str,
    href: Option<&str>,
) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("Row")))
        .map_err(xml_err)?;

    let mut cell = BytesStart::new("Cell");
    cell.push_attribute(("ss:StyleID", style));
    if let Some(href) = href {
        cell.push_attribute(("ss:HRef", href));
    }
    writer.write_event(Event::Start(cell)).map_err(xml_err)?;

    let mut data = BytesStart::new("Data");
    data.push_attribute(("ss:Type", "String"));
    writer.write_event(Event::Start(data)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(&text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("Data")))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("Cell")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("Row")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_blank_row(writer: &mut SheetWriter) -> Result<()> {
    writer
        .write_event(Event::Empty(BytesStart::new("Row")))
        .map_err(xml_err)?;
    Ok(())
}
