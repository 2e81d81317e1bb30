use chrono::NaiveDate;
use thiserror::Error;

/// Raised when the engine is handed input it cannot compute over.
///
/// Empty completion sets are never an error; only structurally invalid
/// values are.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("target frequency must be an integer between 1 and 7, got {0}")]
    InvalidTargetFrequency(i64),

    #[error("rate window must be between 1 and 3660 days, got {0}")]
    InvalidRateWindow(i64),

    #[error("a window of {days} days before {end} falls outside the calendar")]
    DateOutOfRange { end: NaiveDate, days: i64 },
}
