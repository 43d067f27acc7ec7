use mupdf::{Document, TextPageFlags};

use studybuddy_core::{BackendError, PdfBackend};

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency so
/// that non-PDF code paths do not transitively depend on it.
///
/// Each text line of a page is one token. Lines are returned in MuPDF's
/// block order, which follows the page's reading order for ordinary
/// single-column documents.
#[derive(Debug, Default)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn page_tokens(&self, bytes: &[u8]) -> Result<Vec<Vec<String>>, BackendError> {
        let document = Document::from_bytes(bytes, "application/pdf")
            .map_err(|e| BackendError::OpenError(e.to_string()))?;

        let mut pages = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::ExtractionError(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::ExtractionError(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::ExtractionError(e.to_string()))?;

            let mut tokens = Vec::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    if !line_text.is_empty() {
                        tokens.push(line_text);
                    }
                }
            }
            pages.push(tokens);
        }

        Ok(pages)
    }
}
