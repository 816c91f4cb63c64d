//! Output Rendering
//!
//! Three renderers consume the same inputs — content map, section tree,
//! display name, job identifier and request descriptor — and each emits one
//! artifact: a word-processor document, a spreadsheet workbook, and a
//! self-contained HTML visualization.
//!
//! Every renderer implements the same two-pass contract over one shared
//! traversal: a TOC pass emitting `number. title` lines with a forward
//! reference to the heading's anchor, then a body pass emitting the matching
//! anchored heading plus the section's content (absent content ⇒ heading
//! only). The selection filter and the anchor naming live here so the passes
//! cannot drift apart.

pub mod diagram;
pub mod docx;
pub mod html;
pub mod image;
pub mod shaping;
pub mod sheet;

pub use image::fetch_image;
pub use shaping::{LogicalOrderShaper, TextShaper};

use std::path::{Path, PathBuf};

use crate::content::ContentMap;
use crate::types::{ProposalRequest, Result, Section, SmithError};

/// Everything a renderer needs for one artifact.
pub struct RenderContext<'a> {
    pub content: &'a ContentMap,
    pub structure: &'a [Section],
    pub company_name: &'a str,
    pub job_id: &'a str,
    pub request: &'a ProposalRequest,
    pub output_dir: &'a Path,
    pub shaper: &'a dyn TextShaper,
}

impl RenderContext<'_> {
    /// Selection filter, identical semantics to content generation.
    pub fn includes(&self, section: &Section) -> bool {
        self.request.includes_section(&section.key)
    }

    /// Shape one literal text run for the output script. Fails the format
    /// when the configured shaper cannot handle the requested language.
    pub fn shape(&self, text: &str, format: &str) -> Result<String> {
        if self.request.language.is_rtl() && !self.shaper.supports(self.request.language) {
            return Err(SmithError::render(
                format,
                format!(
                    "No text shaper available for {} output",
                    self.request.language
                ),
            ));
        }
        self.shaper.shape(text)
    }

    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.output_dir.join(filename)
    }
}

/// Anchor identifier for a section, shared by the TOC and body passes of
/// every renderer. Derived solely from the key.
pub fn anchor_name(key: &str) -> String {
    format!("section_{}", key)
}

/// TOC line for a section: `number. title`, mirrored to `title .number` for
/// right-to-left output.
pub fn toc_label(section: &Section, rtl: bool) -> String {
    let title = strip_emphasis(&section.title);
    if rtl {
        format!("{} .{}", title, section.number)
    } else {
        format!("{}. {}", section.number, title)
    }
}

/// Heading line for a section, same number+title as the TOC entry.
pub fn heading_label(section: &Section, rtl: bool) -> String {
    toc_label(section, rtl)
}

/// Strip literal emphasis markup characters before emission.
pub fn strip_emphasis(text: &str) -> String {
    text.replace(['*', '#'], "")
}

/// Identifier-safe file stem for artifact names.
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
