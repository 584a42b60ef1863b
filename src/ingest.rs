//! File-boundary readers that turn uploads into a `RawTable`.
//!
//! Two formats are accepted: delimited text (delimiter auto-detected) and a
//! single-sheet spreadsheet with a header row. Both produce the same
//! `RawTable`, so normalization never knows where the data came from.

use crate::error::{BillAnalyticsError, Result};
use crate::schema::RawTable;
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use std::path::Path;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Read a table from a file, dispatching on its extension.
/// csv/txt are treated as delimited text, xlsx/xls as spreadsheets.
pub fn load_table(path: &Path) -> Result<RawTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => {
            let bytes = std::fs::read(path)?;
            read_delimited(&bytes)
        }
        "xlsx" | "xls" => read_spreadsheet(path),
        other => Err(BillAnalyticsError::Schema(format!(
            "unsupported file extension '{}': expected csv, txt, xlsx or xls",
            other
        ))),
    }
}

/// Parse delimited text into a `RawTable`, sniffing the delimiter from the
/// header line.
pub fn read_delimited(bytes: &[u8]) -> Result<RawTable> {
    let delimiter = sniff_delimiter(bytes);
    debug!("detected delimiter {:?}", delimiter as char);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Count candidate delimiters on the header line and take the most frequent.
/// Ties keep the earlier candidate, so a plain CSV stays a CSV.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or(bytes);

    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .max_by_key(|&candidate| first_line.iter().filter(|&&b| b == candidate).count())
        .unwrap_or(b',')
}

/// Read the first worksheet of a spreadsheet, treating its first row as the
/// header row.
pub fn read_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| BillAnalyticsError::Schema("workbook has no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut iter = range.rows();

    let headers = iter
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .ok_or_else(|| {
            BillAnalyticsError::Schema(format!("sheet '{}' is empty", sheet_name))
        })?;

    let rows = iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}
