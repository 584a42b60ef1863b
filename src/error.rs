use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillAnalyticsError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid period window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Date error: {0}")]
    Date(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillAnalyticsError>;
