use crate::error::{BillAnalyticsError, Result};
use crate::{CanonicalRecord, Dataset};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date window over billing-period keys. The start ≤ end invariant
/// is enforced at construction; windows are never silently swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BillAnalyticsError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Convenience constructor from (year, month) period bounds.
    pub fn from_periods(
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    ) -> Result<Self> {
        let start = crate::dates::date_key(start_year, start_month)?;
        let end = crate::dates::date_key(end_year, end_month)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, key: NaiveDate) -> bool {
        self.start <= key && key <= self.end
    }
}

/// Sum/mean metrics over a non-empty filtered subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub amount_sum: f64,
    pub amount_mean: f64,
    pub quantity_sum: f64,
    pub quantity_mean: f64,
}

/// Result of aggregating a dataset over a window.
///
/// `summary` is `None` when no record falls inside the window: the metrics
/// are undefined, not zero, and callers must render "no data".
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub records: Vec<CanonicalRecord>,
    pub count: usize,
    pub summary: Option<SummaryStats>,
}

/// Filter `dataset` to the window (inclusive both ends) and summarize it.
pub fn aggregate(dataset: &Dataset, window: &PeriodWindow) -> Aggregation {
    let records: Vec<CanonicalRecord> = dataset
        .records()
        .iter()
        .filter(|r| window.contains(r.date_key))
        .cloned()
        .collect();

    let count = records.len();
    let summary = if count == 0 {
        None
    } else {
        let n = count as f64;
        let amount_sum: f64 = records.iter().map(|r| r.amount).sum();
        let quantity_sum: f64 = records.iter().map(|r| r.quantity).sum();
        Some(SummaryStats {
            amount_sum,
            amount_mean: amount_sum / n,
            quantity_sum,
            quantity_mean: quantity_sum / n,
        })
    };

    Aggregation {
        records,
        count,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Unit;
    use crate::test_support::record;

    fn dataset() -> Dataset {
        Dataset::from_sorted(vec![
            record(2021, 1, 100.0, 50.0, Unit::Volume),
            record(2021, 2, 110.0, 55.0, Unit::Volume),
            record(2021, 3, 120.0, 60.0, Unit::Volume),
        ])
    }

    #[test]
    fn test_window_rejects_reversed_bounds() {
        let result = PeriodWindow::from_periods(2022, 1, 2021, 1);
        assert!(matches!(
            result,
            Err(BillAnalyticsError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_full_span_aggregation() {
        let window = PeriodWindow::from_periods(2021, 1, 2021, 3).unwrap();
        let agg = aggregate(&dataset(), &window);

        assert_eq!(agg.count, 3);
        let summary = agg.summary.unwrap();
        assert!((summary.amount_sum - 330.0).abs() < 1e-9);
        assert!((summary.amount_mean - 110.0).abs() < 1e-9);
        assert!((summary.quantity_sum - 165.0).abs() < 1e-9);
        assert!((summary.quantity_mean - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_is_inclusive_both_ends() {
        let window = PeriodWindow::from_periods(2021, 2, 2021, 2).unwrap();
        let agg = aggregate(&dataset(), &window);
        assert_eq!(agg.count, 1);
        assert_eq!(agg.records[0].month, 2);
    }

    #[test]
    fn test_empty_window_has_undefined_metrics() {
        let window = PeriodWindow::from_periods(2019, 1, 2019, 12).unwrap();
        let agg = aggregate(&dataset(), &window);
        assert_eq!(agg.count, 0);
        assert!(agg.summary.is_none());
        assert!(agg.records.is_empty());
    }
}
