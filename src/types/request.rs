//! Proposal Request Descriptor
//!
//! The caller intent attached to a generation job: document kind, sector,
//! output language, section selection, format selection and logo references.
//! Shared by structure synthesis, content generation and every renderer so the
//! selection-filter semantics are defined exactly once.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

// =============================================================================
// Document Kind
// =============================================================================

/// High-level proposal flavor, steers prompt wording only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    #[default]
    Technical,
    Financial,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Technical => write!(f, "technical"),
            DocumentKind::Financial => write!(f, "financial"),
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "technical" => Ok(DocumentKind::Technical),
            "financial" => Ok(DocumentKind::Financial),
            _ => Err(format!(
                "Unknown proposal type: {}. Valid values: technical, financial",
                s
            )),
        }
    }
}

// =============================================================================
// Language
// =============================================================================

/// Output language for titles and generated prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    /// Right-to-left scripts mirror alignment and TOC punctuation order.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Fixed boilerplate labels for rendered artifacts.
    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::En => &EN_LABELS,
            Language::Ar => &AR_LABELS,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Ar => write!(f, "ar"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            _ => Err(format!("Unknown language: {}. Valid values: en, ar", s)),
        }
    }
}

/// Per-language boilerplate strings used by the renderers.
pub struct Labels {
    pub technical_proposal: &'static str,
    pub financial_proposal: &'static str,
    pub prepared_for: &'static str,
    pub table_of_contents: &'static str,
    pub page: &'static str,
    pub of: &'static str,
}

impl Labels {
    pub fn document_title(&self, kind: DocumentKind) -> &'static str {
        match kind {
            DocumentKind::Technical => self.technical_proposal,
            DocumentKind::Financial => self.financial_proposal,
        }
    }
}

static EN_LABELS: Labels = Labels {
    technical_proposal: "Technical Proposal",
    financial_proposal: "Financial Proposal",
    prepared_for: "Prepared for",
    table_of_contents: "Table of Contents",
    page: "Page",
    of: "of",
};

static AR_LABELS: Labels = Labels {
    technical_proposal: "العرض الفني",
    financial_proposal: "العرض المالي",
    prepared_for: "مُعد لـ",
    table_of_contents: "جدول المحتويات",
    page: "صفحة",
    of: "من",
};

// =============================================================================
// Output Format Selection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Word-processor document (.docx)
    Docx,
    /// Spreadsheet workbook (SpreadsheetML)
    Sheet,
    /// Self-contained HTML visualization
    Html,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Docx => write!(f, "docx"),
            OutputFormat::Sheet => write!(f, "sheet"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

/// Which artifacts a job should produce. Defaults to everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatSelection {
    #[default]
    All,
    Only(Vec<OutputFormat>),
}

impl FormatSelection {
    pub fn includes(&self, format: OutputFormat) -> bool {
        match self {
            FormatSelection::All => true,
            FormatSelection::Only(formats) => formats.contains(&format),
        }
    }
}

impl FromStr for FormatSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(FormatSelection::All);
        }
        let mut formats = Vec::new();
        for part in s.split(',') {
            match part.trim().to_lowercase().as_str() {
                "docx" => formats.push(OutputFormat::Docx),
                "sheet" | "xlsx" => formats.push(OutputFormat::Sheet),
                "html" | "viz" => formats.push(OutputFormat::Html),
                other => {
                    return Err(format!(
                        "Unknown output format: {}. Valid values: all, docx, sheet, html",
                        other
                    ));
                }
            }
        }
        Ok(FormatSelection::Only(formats))
    }
}

// =============================================================================
// Image Source
// =============================================================================

/// Logo reference, classified once at submission time instead of re-inspected
/// at each render call.
#[derive(Debug, Clone, Default)]
pub enum ImageSource {
    #[default]
    None,
    LocalPath(PathBuf),
    RemoteUrl(url::Url),
    InlineBytes(Vec<u8>),
}

impl ImageSource {
    /// Classify a caller-supplied reference string.
    pub fn classify(reference: Option<&str>) -> ImageSource {
        let Some(reference) = reference else {
            return ImageSource::None;
        };
        let reference = reference.trim();
        if reference.is_empty() {
            return ImageSource::None;
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            match url::Url::parse(reference) {
                Ok(parsed) => ImageSource::RemoteUrl(parsed),
                Err(e) => {
                    tracing::warn!("Ignoring malformed logo URL {}: {}", reference, e);
                    ImageSource::None
                }
            }
        } else {
            ImageSource::LocalPath(PathBuf::from(reference))
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ImageSource::None)
    }
}

// =============================================================================
// Proposal Request
// =============================================================================

/// Caller intent for one generation job.
#[derive(Debug, Clone, Default)]
pub struct ProposalRequest {
    pub kind: DocumentKind,
    pub sector: String,
    pub company_name: String,
    /// Caller-selected section keys; `None` or empty means "all".
    pub selected_sections: Option<Vec<String>>,
    pub formats: FormatSelection,
    pub language: Language,
    pub logo_top_left: ImageSource,
    pub logo_bottom_right: ImageSource,
    /// Distilled insight from the "special" supporting document, if any.
    pub special_insights: Option<String>,
    /// Distilled insight from the concatenated additional documents, if any.
    pub additional_insights: Option<String>,
}

impl ProposalRequest {
    /// Selection filter shared by the content generator and all renderers:
    /// pure set membership against the caller-selected keys, everything
    /// included when no selection was given.
    pub fn includes_section(&self, key: &str) -> bool {
        match &self.selected_sections {
            Some(selected) if !selected.is_empty() => selected.iter().any(|s| s == key),
            _ => true,
        }
    }
}
