//! Spreadsheet to CSV text.
//!
//! Every sheet is serialized to comma-separated text in the workbook's
//! declared order, and each sheet's text is followed by a newline. A `.csv`
//! upload is treated as a one-sheet workbook and re-serialized through the
//! same writer so quoting is normalized either way.

use std::io::Cursor;

use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto_from_rs};
use chrono::NaiveTime;

use crate::ReadError;

/// Serialize every sheet of an `.xlsx` / `.xls` workbook.
pub fn workbook_to_csv(bytes: &[u8]) -> Result<String, ReadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let mut text = String::new();
    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
        text.push_str(&rows_to_csv(rows)?);
        text.push('\n');
    }
    Ok(text)
}

/// Display text of one cell, the way a spreadsheet shows it rather than the
/// stored value.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => general_number(*f),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(dt) => date_time_text(dt),
        Data::Error(e) => e.to_string(),
    }
}

/// Round to the 15 significant digits a spreadsheet keeps, so binary noise
/// like `0.30000000000000004` prints as `0.3`.
fn general_number(value: f64) -> String {
    let rounded: f64 = format!("{value:.14e}").parse().unwrap_or(value);
    rounded.to_string()
}

fn date_time_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let secs = duration.num_seconds();
            return format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        return if datetime.time() == NaiveTime::MIN {
            datetime.format("%Y-%m-%d").to_string()
        } else {
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        };
    }
    general_number(dt.as_f64())
}

/// Re-serialize a CSV file as a single sheet.
///
/// Fields must be valid UTF-8.
pub fn csv_to_csv(bytes: &[u8]) -> Result<String, ReadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    let mut text = rows_to_csv(rows)?;
    text.push('\n');
    Ok(text)
}

/// Write rows as CSV, rows separated by `\n` with no trailing terminator.
fn rows_to_csv<I>(rows: I) -> Result<String, ReadError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReadError::Io(e.into_error()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
