//! Extraction of real files on disk.

use std::path::Path;

use studybuddy_ingest::{ExtractionError, ReadError, extract_path, load_document};

fn write(dir: &Path, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn text_file_is_extracted_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "capital.txt", b"Paris is the capital of France.");

    let text = extract_path(&path, 20).await.unwrap();
    assert_eq!(text, "Paris is the capital of France.");
}

#[tokio::test]
async fn markdown_keeps_formatting() {
    let dir = tempfile::tempdir().unwrap();
    let body = "# Cells\n\n- Nucleus holds DNA\n- Ribosomes build proteins\n";
    let path = write(dir.path(), "cells.md", body.as_bytes());

    assert_eq!(extract_path(&path, 20).await.unwrap(), body);
}

#[tokio::test]
async fn tiny_file_reports_insufficient_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "hi.txt", b"hi");

    let err = extract_path(&path, 20).await.unwrap_err();
    assert!(matches!(err, ExtractionError::InsufficientContent { found: 2 }));
    assert_eq!(
        err.to_string(),
        "The uploaded file contained little or no readable text."
    );
}

#[tokio::test]
async fn csv_file_is_serialized_per_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "Vocab.CSV",
        b"word,meaning\nmitosis,cell division\nmeiosis,reduction division\n",
    );

    let text = extract_path(&path, 20).await.unwrap();
    assert_eq!(
        text,
        "word,meaning\nmitosis,cell division\nmeiosis,reduction division\n"
    );
}

#[tokio::test]
async fn missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_path(&dir.path().join("nope.txt"), 20)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::Unreadable {
            source: ReadError::Io(_)
        }
    ));
}

#[tokio::test]
async fn load_document_tags_format_from_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "slides.PDF", b"%PDF-1.4");

    let doc = load_document(&path).await.unwrap();
    assert_eq!(doc.name, "slides.PDF");
    assert_eq!(doc.format, studybuddy_core::DocumentFormat::Pdf);
    assert_eq!(doc.bytes, b"%PDF-1.4");
}

/// Two sheets declared as "Second" then "First", holding a date, a datetime,
/// booleans, a float with binary noise and a duration.
const WORKBOOK: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/study_sheets.xlsx");

#[tokio::test]
async fn workbook_sheets_are_serialized_in_declared_order() {
    let text = extract_path(Path::new(WORKBOOK), 20).await.unwrap();
    assert_eq!(
        text,
        "term,date,flag,score\n\
         exam,2024-01-15,TRUE,0.3\n\
         \"Cell, nucleus\",2024-01-15 12:00:00,FALSE,42\n\
         photosynthesis makes sugar,1:30:00\n"
    );
}

#[test]
fn workbook_bytes_convert_without_a_file_name() {
    let bytes = std::fs::read(WORKBOOK).unwrap();
    let text = studybuddy_ingest::spreadsheet::workbook_to_csv(&bytes).unwrap();
    let sheets: Vec<&str> = text.split_inclusive('\n').collect();
    assert_eq!(sheets.first(), Some(&"term,date,flag,score\n"));
    assert_eq!(sheets.last(), Some(&"photosynthesis makes sugar,1:30:00\n"));
}
