use crate::error::{BillAnalyticsError, Result};
use chrono::NaiveDate;

/// Full month names used for `label_month`, Brazilian Portuguese as in the
/// source files this library typically receives.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Abbreviations used for `label_period` ("Jan/2021").
pub const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const MONTH_NAMES_EN: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Coerce a raw month cell to 1..=12.
///
/// Accepts a plain number or a localized month name (Portuguese or English,
/// case-insensitive). Fails the row when the value is not a month at all or
/// falls outside 1..=12.
pub fn coerce_month(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();

    if let Ok(numeric) = trimmed.parse::<i64>() {
        if (1..=12).contains(&numeric) {
            return Ok(numeric as u32);
        }
        return Err(BillAnalyticsError::Date(format!(
            "month {} out of range 1-12",
            numeric
        )));
    }

    let lowered = trimmed.to_lowercase();
    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        if lowered == name.to_lowercase() {
            return Ok(idx as u32 + 1);
        }
    }
    for (idx, name) in MONTH_NAMES_EN.iter().enumerate() {
        if lowered == *name {
            return Ok(idx as u32 + 1);
        }
    }

    Err(BillAnalyticsError::Date(format!(
        "unrecognized month value '{}'",
        trimmed
    )))
}

/// Coerce a raw year cell to a positive integer year.
pub fn coerce_year(raw: &str) -> Result<i32> {
    let trimmed = raw.trim();
    let year: i32 = trimmed.parse().map_err(|_| {
        BillAnalyticsError::Date(format!("unrecognized year value '{}'", trimmed))
    })?;
    if year <= 0 {
        return Err(BillAnalyticsError::Date(format!(
            "year {} must be positive",
            year
        )));
    }
    Ok(year)
}

/// Parse a combined "MM/YYYY" reference token into (month, year).
pub fn parse_reference(raw: &str) -> Result<(u32, i32)> {
    let trimmed = raw.trim();
    let (month_part, year_part) = trimmed.split_once('/').ok_or_else(|| {
        BillAnalyticsError::Date(format!(
            "invalid reference '{}': expected MM/YYYY",
            trimmed
        ))
    })?;

    let month = coerce_month(month_part)?;
    let year = coerce_year(year_part)?;
    Ok((month, year))
}

/// First day of (year, month), the canonical sort and join key for a billing
/// period.
pub fn date_key(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        BillAnalyticsError::Date(format!("invalid period {:02}/{}", month, year))
    })
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month - 1) as usize]
}

/// Abbreviated "Mon/YYYY" display label for a billing period.
pub fn period_label(year: i32, month: u32) -> String {
    format!("{}/{}", MONTH_ABBREVS[(month - 1) as usize], year)
}
