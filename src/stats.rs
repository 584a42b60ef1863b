use crate::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pearson correlation and OLS trend of amount as a function of quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub r: f64,
    pub slope: f64,
    pub intercept: f64,
}

/// Narrative classification of |r| used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::Weak => "weak",
        };
        write!(f, "{}", label)
    }
}

impl Correlation {
    pub fn strength(&self) -> Strength {
        if self.r > 0.7 {
            Strength::Strong
        } else if self.r > 0.4 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

/// Correlate the quantity and amount series of `dataset` in row order.
///
/// Returns `None` when the statistic is undefined: fewer than two records,
/// or zero variance in either series. Never propagates NaN.
pub fn correlate(dataset: &Dataset) -> Option<Correlation> {
    let records = dataset.records();
    let xs: Vec<f64> = records.iter().map(|r| r.quantity).collect();
    let ys: Vec<f64> = records.iter().map(|r| r.amount).collect();
    correlate_series(&xs, &ys)
}

pub(crate) fn correlate_series(xs: &[f64], ys: &[f64]) -> Option<Correlation> {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return None;
    }

    let nf = n as f64;
    let x_mean = xs.iter().sum::<f64>() / nf;
    let y_mean = ys.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut x_var = 0.0;
    let mut y_var = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        cov += dx * dy;
        x_var += dx * dx;
        y_var += dy * dy;
    }

    if x_var == 0.0 || y_var == 0.0 {
        return None;
    }

    // Clamp against float drift so callers can rely on r ∈ [-1, 1].
    let r = (cov / (x_var.sqrt() * y_var.sqrt())).clamp(-1.0, 1.0);
    let slope = cov / x_var;
    let intercept = y_mean - slope * x_mean;

    Some(Correlation {
        r,
        slope,
        intercept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Unit;
    use crate::test_support::record;

    fn linear_dataset() -> Dataset {
        // amount = 2 * quantity + 10, exactly.
        let records = (1..=6)
            .map(|month| {
                let quantity = 40.0 + month as f64 * 5.0;
                record(2021, month, 2.0 * quantity + 10.0, quantity, Unit::Volume)
            })
            .collect();
        Dataset::from_sorted(records)
    }

    #[test]
    fn test_exact_linear_relationship() {
        let result = correlate(&linear_dataset()).unwrap();
        assert!((result.r - 1.0).abs() < 1e-6);
        assert!((result.slope - 2.0).abs() < 1e-6);
        assert!((result.intercept - 10.0).abs() < 1e-6);
        assert_eq!(result.strength(), Strength::Strong);
    }

    #[test]
    fn test_negative_relationship() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [8.0, 6.0, 4.0, 2.0];
        let result = correlate_series(&xs, &ys).unwrap();
        assert!((result.r + 1.0).abs() < 1e-9);
        assert!((result.slope + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_is_undefined() {
        let flat = Dataset::from_sorted(vec![
            record(2021, 1, 100.0, 50.0, Unit::Volume),
            record(2021, 2, 120.0, 50.0, Unit::Volume),
        ]);
        assert!(correlate(&flat).is_none());
    }

    #[test]
    fn test_too_few_points_is_undefined() {
        let single = Dataset::from_sorted(vec![record(2021, 1, 100.0, 50.0, Unit::Volume)]);
        assert!(correlate(&single).is_none());
        assert!(correlate(&Dataset::from_sorted(Vec::new())).is_none());
    }

    #[test]
    fn test_strength_thresholds() {
        let strong = Correlation {
            r: 0.71,
            slope: 0.0,
            intercept: 0.0,
        };
        let moderate = Correlation {
            r: 0.7,
            slope: 0.0,
            intercept: 0.0,
        };
        let weak = Correlation {
            r: 0.4,
            slope: 0.0,
            intercept: 0.0,
        };
        assert_eq!(strong.strength(), Strength::Strong);
        assert_eq!(moderate.strength(), Strength::Moderate);
        assert_eq!(weak.strength(), Strength::Weak);
        assert_eq!(Strength::Strong.to_string(), "strong");
    }
}
