use std::path::Path;

use thiserror::Error;

use studybuddy_core::{BackendError, DEFAULT_MIN_CHARS, Document, DocumentFormat, PdfBackend};

pub mod spreadsheet;

// Re-export domain types for convenience
pub use studybuddy_core::SUPPORTED_EXTENSIONS;

/// Extraction failure, as shown to the user.
///
/// Every low-level cause collapses into [`ExtractionError::Unreadable`]; the
/// cause stays available through `source()` for logging.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error(
        "Failed to read or process the file. It might be corrupted or in an unsupported format."
    )]
    Unreadable {
        #[source]
        source: ReadError,
    },
    #[error("The uploaded file contained little or no readable text.")]
    InsufficientContent { found: usize },
}

/// Underlying reason a document could not be read.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] BackendError),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("PDF support not compiled in (enable the `pdf` feature of studybuddy-ingest)")]
    NoPdfSupport,
}

impl From<ReadError> for ExtractionError {
    fn from(source: ReadError) -> Self {
        ExtractionError::Unreadable { source }
    }
}

/// Whether the picker should offer `path` (by suffix, case-insensitive).
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Read a file from disk into a [`Document`].
pub async fn load_document(path: &Path) -> Result<Document, ExtractionError> {
    let bytes = tokio::fs::read(path).await.map_err(ReadError::from)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Document::new(name, bytes))
}

/// Load and extract a file, running the parsing off the async runtime.
pub async fn extract_path(path: &Path, min_chars: usize) -> Result<String, ExtractionError> {
    let document = load_document(path).await?;
    extract_blocking(document, min_chars).await
}

/// Run [`extract_with_min`] on the blocking thread pool.
pub async fn extract_blocking(document: Document, min_chars: usize) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_with_min(&document, min_chars))
        .await
        .map_err(|e| ReadError::Io(std::io::Error::other(e.to_string())))?
}

/// Extract the text of `document` with the default minimum length.
pub fn extract(document: &Document) -> Result<String, ExtractionError> {
    extract_with_min(document, DEFAULT_MIN_CHARS)
}

/// Extract the text of `document`, failing if fewer than `min_chars`
/// characters remain after trimming.
pub fn extract_with_min(document: &Document, min_chars: usize) -> Result<String, ExtractionError> {
    #[cfg(feature = "pdf")]
    {
        let mupdf = studybuddy_pdf_mupdf::MupdfBackend::new();
        extract_inner(document, Some(&mupdf), min_chars)
    }
    #[cfg(not(feature = "pdf"))]
    {
        extract_inner(document, None, min_chars)
    }
}

/// Extract with an explicit PDF backend.
pub fn extract_with_backend(
    document: &Document,
    backend: &dyn PdfBackend,
    min_chars: usize,
) -> Result<String, ExtractionError> {
    extract_inner(document, Some(backend), min_chars)
}

fn extract_inner(
    document: &Document,
    backend: Option<&dyn PdfBackend>,
    min_chars: usize,
) -> Result<String, ExtractionError> {
    tracing::debug!(file = %document.name, format = ?document.format, bytes = document.bytes.len(), "extracting");

    let text = read_text(document, backend).map_err(|e| {
        tracing::warn!(file = %document.name, error = %e, "could not read document");
        ExtractionError::from(e)
    })?;

    // Blank text is never usable, whatever minimum was configured.
    let found = text.trim().chars().count();
    if found < min_chars.max(1) {
        tracing::info!(file = %document.name, found, min_chars, "too little text extracted");
        return Err(ExtractionError::InsufficientContent { found });
    }

    Ok(text)
}

fn read_text(document: &Document, backend: Option<&dyn PdfBackend>) -> Result<String, ReadError> {
    match document.format {
        DocumentFormat::Pdf => {
            let backend = backend.ok_or(ReadError::NoPdfSupport)?;
            pdf_text(&document.bytes, backend)
        }
        DocumentFormat::Spreadsheet if has_extension(&document.name, "csv") => {
            spreadsheet::csv_to_csv(&document.bytes)
        }
        DocumentFormat::Spreadsheet => spreadsheet::workbook_to_csv(&document.bytes),
        DocumentFormat::PlainText => plain_text(&document.bytes),
    }
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Tokens of a page are joined by single spaces; pages are concatenated with
/// no separator.
fn pdf_text(bytes: &[u8], backend: &dyn PdfBackend) -> Result<String, ReadError> {
    let pages = backend.page_tokens(bytes)?;
    Ok(pages.iter().map(|tokens| tokens.join(" ")).collect())
}

fn plain_text(bytes: &[u8]) -> Result<String, ReadError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    Ok(String::from_utf8(bytes.to_vec())?)
}
