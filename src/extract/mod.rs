//! Source Document Extraction
//!
//! Dispatches uploaded files to a format-specific extractor by extension and
//! returns raw text plus a normalized outline. Plain-text and word-processor
//! extractors are built in; PDF and image-OCR extraction are host-supplied
//! collaborators registered at startup (an OCR implementation is expected to
//! degrade to a placeholder string on recognition failure rather than fail
//! the file).
//!
//! Unknown extensions fail with `UnsupportedFormat`; a readable-but-corrupt
//! file fails with `Extract` — the two are distinguishable so callers can
//! reject the former synchronously.

pub mod docx;
pub mod outline;

use std::fmt::Display;
use std::path::Path;

use crate::types::{DocumentOutline, Result, SmithError};

pub use docx::DocxExtractor;
pub use outline::{analyze, derive_key, identify_heading};

/// Format-specific extraction collaborator.
pub trait TextExtractor: Send + Sync {
    /// Whether this extractor handles the (lowercased) file extension.
    fn handles(&self, extension: &str) -> bool;

    /// Extract raw text and a structural outline from the file.
    fn extract(&self, path: &Path) -> Result<(String, DocumentOutline)>;
}

/// Build a read/parse failure for a source file.
pub(crate) fn read_failure(path: &Path, error: impl Display) -> SmithError {
    SmithError::Extract {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

// =============================================================================
// Plain Text
// =============================================================================

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn handles(&self, extension: &str) -> bool {
        matches!(extension, "txt" | "text" | "md")
    }

    fn extract(&self, path: &Path) -> Result<(String, DocumentOutline)> {
        let text = std::fs::read_to_string(path).map_err(|e| read_failure(path, e))?;
        let outline = outline::analyze(&text);
        Ok((text, outline))
    }
}

// =============================================================================
// Processor
// =============================================================================

/// Extension-dispatching front door for source extraction.
pub struct DocumentProcessor {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentProcessor {
    /// Processor with the built-in plain-text and docx extractors.
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(PlainTextExtractor), Box::new(DocxExtractor)],
        }
    }

    /// Register a host-supplied extractor (PDF, image OCR, ...).
    pub fn register(&mut self, extractor: Box<dyn TextExtractor>) {
        self.extractors.push(extractor);
    }

    /// Extract text and outline from one file, dispatching on its extension.
    pub fn process_file(&self, path: &Path) -> Result<(String, DocumentOutline)> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let extractor = self
            .extractors
            .iter()
            .find(|e| e.handles(&extension))
            .ok_or(SmithError::UnsupportedFormat {
                extension: extension.clone(),
            })?;

        tracing::debug!("Extracting {} (.{})", path.display(), extension);
        extractor.extract(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_with(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_plain_text_extraction() {
        let file = temp_with("1. Introduction\nThe vendor must comply.\n", ".txt");
        let processor = DocumentProcessor::new();
        let (text, outline) = processor.process_file(file.path()).unwrap();

        assert!(text.contains("Introduction"));
        assert_eq!(outline.headings.len(), 1);
        assert_eq!(outline.requirements.len(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_with("data", ".zip");
        let processor = DocumentProcessor::new();
        let err = processor.process_file(file.path()).unwrap_err();
        assert!(matches!(
            err,
            SmithError::UnsupportedFormat { extension } if extension == "zip"
        ));
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let processor = DocumentProcessor::new();
        let err = processor
            .process_file(Path::new("/nonexistent/source.txt"))
            .unwrap_err();
        assert!(matches!(err, SmithError::Extract { .. }));
    }

    #[test]
    fn test_corrupt_docx_is_read_failure() {
        let file = temp_with("this is not a zip archive", ".docx");
        let processor = DocumentProcessor::new();
        let err = processor.process_file(file.path()).unwrap_err();
        assert!(matches!(err, SmithError::Extract { .. }));
    }

    #[test]
    fn test_registered_extractor_takes_unknown_extension() {
        struct StubPdf;
        impl TextExtractor for StubPdf {
            fn handles(&self, extension: &str) -> bool {
                extension == "pdf"
            }
            fn extract(&self, _path: &Path) -> Result<(String, DocumentOutline)> {
                Ok(("stub text".into(), DocumentOutline::default()))
            }
        }

        let file = temp_with("%PDF-1.4", ".pdf");
        let mut processor = DocumentProcessor::new();
        processor.register(Box::new(StubPdf));
        let (text, _) = processor.process_file(file.path()).unwrap();
        assert_eq!(text, "stub text");
    }
}
