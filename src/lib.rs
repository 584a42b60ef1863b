//! # Utility Bill Analytics
//!
//! A library for normalizing semi-structured utility-bill tables (one row per
//! billing period) into a canonical monthly schema, and deriving
//! time-indexed and comparative analytics from the result.
//!
//! ## Core Concepts
//!
//! - **Raw table**: header row + string cells, straight from an upload.
//!   Column names vary by source; a fixed alias table maps them to the
//!   canonical attributes {month, year, amount, quantity}.
//! - **Canonical record**: one billing period with a first-of-month
//!   `date_key`, used as the sort and join key everywhere downstream.
//! - **Dataset**: the immutable, ascending-sorted sequence of canonical
//!   records owned by one analysis session.
//! - **Derived views**: period aggregations, month-by-year pivots, a
//!   quantity/amount correlation, and a stable year → color map. All are
//!   pure functions of the dataset.
//!
//! Row-level problems (bad month, non-numeric amount) drop the row and are
//! reported in aggregate; only unresolvable schemas fail the whole dataset.
//!
//! ## Example
//!
//! ```rust,ignore
//! use utility_bill_analytics::*;
//!
//! let table = ingest::read_delimited(b"mes,ano,consumo,valor\n1,2021,50,100.0\n")?;
//! let normalized = normalize(&table, AccountKind::Water)?;
//!
//! let window = PeriodWindow::from_periods(2021, 1, 2021, 12)?;
//! let report = aggregate(&normalized.dataset, &window);
//! let pivot = build_pivot(&normalized.dataset, &normalized.dataset.years(), Metric::Amount);
//! let trend = correlate(&normalized.dataset);
//! let colors = colors_for(normalized.dataset.years());
//! ```

pub mod aggregate;
pub mod dates;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod palette;
pub mod pivot;
pub mod schema;
pub mod stats;

pub use aggregate::{aggregate, Aggregation, PeriodWindow, SummaryStats};
pub use error::{BillAnalyticsError, Result};
pub use normalize::{normalize, DroppedRow, NormalizedData};
pub use palette::{colors_for, YearColorMap, PALETTE};
pub use pivot::{build_pivot, ComparativePivot, Metric, PivotRow};
pub use schema::{AccountKind, RawTable, Unit};
pub use stats::{correlate, Correlation, Strength};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A normalized billing-period row. Created once by normalization and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Calendar month, 1..=12.
    pub month: u32,
    pub year: i32,
    /// Billed amount for the period, in the file's currency.
    pub amount: f64,
    /// Consumed quantity for the period, in `unit`.
    pub quantity: f64,
    /// First day of (year, month); sort and join key.
    pub date_key: NaiveDate,
    pub unit: Unit,
    /// Full localized month name, e.g. "Janeiro".
    pub label_month: String,
    /// Abbreviated month/year, e.g. "Jan/2021".
    pub label_period: String,
}

/// Ordered sequence of canonical records, ascending by `date_key`.
///
/// Immutable once built, so it is safe to share read-only across any number
/// of analysis calls. Duplicate (year, month) pairs are permitted; the
/// normalization report surfaces them.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    records: Vec<CanonicalRecord>,
}

impl Dataset {
    /// `records` must already be sorted ascending by `date_key`.
    pub(crate) fn from_sorted(records: Vec<CanonicalRecord>) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].date_key <= w[1].date_key));
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// (earliest, latest) date_key, or `None` for an empty dataset.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some((first.date_key, last.date_key)),
            _ => None,
        }
    }

    /// JSON rendition for handoff to the presentation layer.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> RawTable {
        RawTable::new(
            vec![
                "mes".to_string(),
                "ano".to_string(),
                "consumo_mensal".to_string(),
                "valor_mensal".to_string(),
            ],
            vec![
                vec![
                    "1".to_string(),
                    "2021".to_string(),
                    "50".to_string(),
                    "100.0".to_string(),
                ],
                vec![
                    "2".to_string(),
                    "2021".to_string(),
                    "55".to_string(),
                    "110.0".to_string(),
                ],
            ],
        )
    }

    #[test]
    fn test_end_to_end_normalize_and_aggregate() {
        let normalized = normalize(&raw_table(), AccountKind::Water).unwrap();
        assert_eq!(normalized.dataset.len(), 2);
        assert_eq!(normalized.drop_count(), 0);

        let (start, end) = normalized.dataset.span().unwrap();
        let window = PeriodWindow::new(start, end).unwrap();
        let report = aggregate(&normalized.dataset, &window);

        assert_eq!(report.count, 2);
        let summary = report.summary.unwrap();
        assert!((summary.amount_sum - 210.0).abs() < 1e-9);
        assert!((summary.amount_mean - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_dataset_years_and_span() {
        let normalized = normalize(&raw_table(), AccountKind::Water).unwrap();
        assert_eq!(normalized.dataset.years(), vec![2021]);

        let (start, end) = normalized.dataset.span().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2021, 2, 1).unwrap());
    }
}
