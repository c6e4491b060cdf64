// src/pdf/mod.rs

use std::path::Path;

use lopdf::Document;

use crate::utils::error::PdfError;

/// Text content of a single PDF page.
#[derive(Debug, Clone)]
pub struct PageText {
    /// Page number (1-indexed, in document order)
    pub number: u32,
    /// Raw text content as extracted from the page
    pub text: String,
}

/// Reads every page of the PDF at `path` and returns their text in document
/// order. Pages whose text cannot be decoded are returned empty rather than
/// failing the whole run; a document that cannot be opened at all is an error.
pub fn read_pages(path: &Path) -> Result<Vec<PageText>, PdfError> {
    if !path.exists() {
        return Err(PdfError::NotFound(path.display().to_string()));
    }

    let doc = Document::load(path).map_err(|e| PdfError::Load(e.to_string()))?;

    // get_pages() is keyed by page number, so iteration follows document order.
    let mut pages = Vec::new();
    for (number, _object_id) in doc.get_pages() {
        match doc.extract_text(&[number]) {
            Ok(text) => pages.push(PageText { number, text }),
            Err(e) => {
                tracing::warn!("Could not extract text from page {}: {}", number, e);
                pages.push(PageText {
                    number,
                    text: String::new(),
                });
            }
        }
    }

    tracing::debug!("Extracted text from {} pages of {}", pages.len(), path.display());
    Ok(pages)
}
