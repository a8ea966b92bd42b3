//! PDF adapter
//!
//! Reads the text layer page by page and hands the joined text to the
//! legal extractor in memory. Password-protected files and scans without a
//! text layer fail with their own error variants.

use crate::document::{file_name, has_extension};
use crate::error::ExtractorError;
use crate::legal::LegalExtractor;
use cosmograph_domain::{ExtractionStrategy, ExtractionSummary, Graph};
use lopdf::{Document, Object};
use std::path::Path;
use tracing::{debug, info, warn};

/// Trimmed text length above which a document is never treated as scanned
const SUBSTANTIAL_TEXT_CHARS: usize = 100;

/// Page text below this length on a page with images suggests a scan
const SCANNED_PAGE_CHARS: usize = 50;

/// Total text below this length suggests a scan
const MINIMAL_TEXT_CHARS: usize = 20;

/// Text layer of a loaded PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfText {
    /// Page texts in page order
    pub pages: Vec<String>,

    /// Whether the document embeds image XObjects
    pub has_images: bool,
}

impl PdfText {
    /// Page texts joined with newlines
    pub fn joined(&self) -> String {
        self.pages.join("\n")
    }

    /// Whether the document looks like a scan without a text layer
    pub fn is_likely_scanned(&self) -> bool {
        let total = self.joined();
        let total = total.trim().chars().count();
        if total > SUBSTANTIAL_TEXT_CHARS {
            return false;
        }

        if self.has_images
            && self
                .pages
                .iter()
                .any(|page| page.trim().chars().count() < SCANNED_PAGE_CHARS)
        {
            return true;
        }

        total < MINIMAL_TEXT_CHARS
    }
}

/// Load a PDF's text layer from bytes
///
/// `file` names the document in errors.
pub fn load_pdf_text(bytes: &[u8], file: &str) -> Result<PdfText, ExtractorError> {
    let doc = Document::load_mem(bytes).map_err(|e| map_load_error(e, file))?;

    if doc.is_encrypted() {
        return Err(ExtractorError::PdfEncrypted {
            file: file.to_string(),
        });
    }

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text),
            Err(e) => {
                warn!("No text on page {} of {}: {}", page_number, file, e);
                pages.push(String::new());
            }
        }
    }

    let has_images = doc.objects.values().any(is_image_stream);
    debug!("{}: {} pages, images: {}", file, pages.len(), has_images);

    Ok(PdfText { pages, has_images })
}

/// Read a PDF file and return its text, rejecting scans
pub fn read_pdf(path: &Path) -> Result<String, ExtractorError> {
    let file = file_name(path);
    let bytes = std::fs::read(path).map_err(|source| ExtractorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = load_pdf_text(&bytes, &file)?;
    if text.is_likely_scanned() {
        return Err(ExtractorError::PdfNoText { file });
    }
    Ok(text.joined())
}

fn map_load_error(error: lopdf::Error, file: &str) -> ExtractorError {
    classify_load_failure(&error.to_string(), file)
}

/// Load failures mentioning encryption or passwords mean a protected file
fn classify_load_failure(message: &str, file: &str) -> ExtractorError {
    let lowered = message.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("password") || lowered.contains("decrypt") {
        ExtractorError::PdfEncrypted {
            file: file.to_string(),
        }
    } else {
        ExtractorError::Pdf(format!("Failed to parse {}: {}", file, message))
    }
}

fn is_image_stream(object: &Object) -> bool {
    match object {
        Object::Stream(stream) => stream
            .dict
            .get(b"Subtype")
            .map(|subtype| matches!(subtype, Object::Name(name) if name == b"Image"))
            .unwrap_or(false),
        _ => false,
    }
}

/// PDF adapter delegating to the legal extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor {
    legal: LegalExtractor,
}

impl PdfExtractor {
    /// Create a new PDF adapter
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExtractionStrategy for PdfExtractor {
    type Error = ExtractorError;

    fn name(&self) -> &'static str {
        "pdf"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["pdf"])
    }

    fn extract(&self, path: &Path, graph: &mut Graph) -> Result<ExtractionSummary, Self::Error> {
        let text = read_pdf(path)?;
        info!("Read {} characters from {}", text.chars().count(), file_name(path));
        Ok(self.legal.extract_text(&text, path, graph))
    }
}
