use crate::dates::{coerce_month, coerce_year, date_key, month_name, parse_reference, period_label};
use crate::error::{BillAnalyticsError, Result};
use crate::schema::{AccountKind, ColumnMap, RawTable, Unit};
use crate::{CanonicalRecord, Dataset};
use log::{debug, info, warn};

/// Why a single row was rejected during normalization. Row-level failures are
/// absorbed here and reported in aggregate; they never fail the dataset.
#[derive(Debug, Clone)]
pub struct DroppedRow {
    /// 1-based data row number (header row excluded).
    pub row: usize,
    pub reason: String,
}

/// Outcome of normalizing one raw table: the canonical dataset plus the
/// data-quality signals the caller is expected to surface.
#[derive(Debug)]
pub struct NormalizedData {
    pub dataset: Dataset,
    pub dropped: Vec<DroppedRow>,
    /// (year, month) pairs that appear more than once. Kept in the dataset,
    /// surfaced here so the caller can flag them.
    pub duplicate_periods: Vec<(i32, u32)>,
}

impl NormalizedData {
    pub fn drop_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Normalize a raw table into a canonical `Dataset`.
///
/// Column resolution failures are dataset-level and terminal; individual rows
/// failing coercion or range checks are dropped and counted. The account kind
/// only decides the unit label attached to each record.
pub fn normalize(table: &RawTable, account: AccountKind) -> Result<NormalizedData> {
    if table.is_empty() {
        return Err(BillAnalyticsError::Schema(
            "the table contains no data rows".to_string(),
        ));
    }

    let columns = ColumnMap::resolve(&table.headers)?;
    debug!(
        "resolved columns: month={:?} year={:?} reference={:?} amount={} quantity={}",
        columns.month, columns.year, columns.reference, columns.amount, columns.quantity
    );

    let unit = account.unit();
    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = Vec::new();

    for (idx, cells) in table.rows.iter().enumerate() {
        let row = idx + 1;
        match build_record(cells, &columns, unit) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("dropping row {}: {}", row, e);
                dropped.push(DroppedRow {
                    row,
                    reason: e.to_string(),
                });
            }
        }
    }

    // Stable sort: duplicate periods keep their input order.
    records.sort_by_key(|r| r.date_key);

    let duplicate_periods = find_duplicate_periods(&records);
    if !duplicate_periods.is_empty() {
        warn!(
            "{} billing period(s) appear more than once: {:?}",
            duplicate_periods.len(),
            duplicate_periods
        );
    }

    info!(
        "normalized {} of {} rows ({} dropped)",
        records.len(),
        table.rows.len(),
        dropped.len()
    );

    Ok(NormalizedData {
        dataset: Dataset::from_sorted(records),
        dropped,
        duplicate_periods,
    })
}

fn build_record(cells: &[String], columns: &ColumnMap, unit: Unit) -> Result<CanonicalRecord> {
    let (month, year) = resolve_period(cells, columns)?;

    let amount = coerce_number(get_cell(cells, columns.amount, "amount")?)
        .map_err(|e| BillAnalyticsError::Date(format!("amount: {}", e)))?;
    let quantity = coerce_number(get_cell(cells, columns.quantity, "quantity")?)
        .map_err(|e| BillAnalyticsError::Date(format!("quantity: {}", e)))?;

    let key = date_key(year, month)?;

    Ok(CanonicalRecord {
        month,
        year,
        amount,
        quantity,
        date_key: key,
        unit,
        label_month: month_name(month).to_string(),
        label_period: period_label(year, month),
    })
}

/// A reference value that parses takes precedence over the separate
/// month/year columns, so the two encodings of the same fact cannot drift.
fn resolve_period(cells: &[String], columns: &ColumnMap) -> Result<(u32, i32)> {
    let mut reference_error = None;

    if let Some(ref_idx) = columns.reference {
        match cells.get(ref_idx) {
            Some(cell) if !cell.trim().is_empty() => match parse_reference(cell) {
                Ok(period) => return Ok(period),
                Err(e) => reference_error = Some(e),
            },
            _ => {}
        }
    }

    match (columns.month, columns.year) {
        (Some(m), Some(y)) => {
            let month = coerce_month(get_cell(cells, m, "month")?)?;
            let year = coerce_year(get_cell(cells, y, "year")?)?;
            Ok((month, year))
        }
        _ => Err(reference_error.unwrap_or_else(|| {
            BillAnalyticsError::Date("no usable date value in row".to_string())
        })),
    }
}

fn get_cell<'a>(cells: &'a [String], idx: usize, name: &str) -> Result<&'a str> {
    cells
        .get(idx)
        .map(|s| s.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| BillAnalyticsError::Date(format!("missing {} value", name)))
}

/// Parse a numeric cell, tolerating surrounding whitespace and a comma used
/// as the decimal separator.
fn coerce_number(raw: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return Ok(value);
        }
        return Err(format!("non-finite value '{}'", trimmed));
    }

    if trimmed.contains(',') && !trimmed.contains('.') {
        if let Ok(value) = trimmed.replace(',', ".").parse::<f64>() {
            if value.is_finite() {
                return Ok(value);
            }
        }
    }

    Err(format!("non-numeric value '{}'", trimmed))
}

fn find_duplicate_periods(records: &[CanonicalRecord]) -> Vec<(i32, u32)> {
    let mut duplicates = Vec::new();
    for pair in records.windows(2) {
        let key = (pair[0].year, pair[0].month);
        if key == (pair[1].year, pair[1].month) && duplicates.last() != Some(&key) {
            duplicates.push(key);
        }
    }
    duplicates
}
