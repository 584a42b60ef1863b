use crate::dates::month_name;
use crate::Dataset;
use serde::{Deserialize, Serialize};

/// Which series a pivot (or chart) reads from the canonical records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Amount,
    Quantity,
}

/// One calendar-month row of the comparative table: a cell per requested
/// year, `None` when that (year, month) has no record. Absence is distinct
/// from a zero value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotRow {
    pub month: u32,
    pub label: String,
    pub cells: Vec<Option<f64>>,
}

/// Month-by-year tabulation of a chosen metric. Always exactly 12 rows;
/// the year columns keep the caller's order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparativePivot {
    pub years: Vec<i32>,
    pub metric: Metric,
    pub rows: Vec<PivotRow>,
}

impl ComparativePivot {
    /// A comparison over fewer than two years is valid but carries no
    /// year-over-year signal; callers typically prompt for more years.
    pub fn is_underspecified(&self) -> bool {
        self.years.len() < 2
    }

    pub fn cell(&self, month: u32, year: i32) -> Option<f64> {
        let col = self.years.iter().position(|&y| y == year)?;
        self.rows.get((month - 1) as usize)?.cells[col]
    }
}

/// Build the month-indexed comparative table for the requested years.
///
/// Year order is taken from the caller and never re-sorted. When duplicate
/// records exist for a (year, month), the last one in dataset order wins.
pub fn build_pivot(dataset: &Dataset, years: &[i32], metric: Metric) -> ComparativePivot {
    let rows = (1..=12)
        .map(|month| {
            let cells = years
                .iter()
                .map(|&year| {
                    dataset
                        .records()
                        .iter()
                        .filter(|r| r.year == year && r.month == month)
                        .map(|r| match metric {
                            Metric::Amount => r.amount,
                            Metric::Quantity => r.quantity,
                        })
                        .last()
                })
                .collect();

            PivotRow {
                month,
                label: month_name(month).to_string(),
                cells,
            }
        })
        .collect();

    ComparativePivot {
        years: years.to_vec(),
        metric,
        rows,
    }
}
