use thiserror::Error;

#[derive(Error, Debug)]
pub enum JovianError {
    #[error("Invalid scan window: {0}")]
    InvalidTimeSpan(String),

    #[error("Invalid calendar date: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },

    #[error("Invalid observer location: {0}")]
    InvalidLocation(String),

    #[error("Invalid search parameter: {0}")]
    InvalidSearchParams(String),

    #[error("Ephemeris provider returned a non-finite sample at JD {0}")]
    InvalidEphemeris(f64),

    #[error("Least-squares polynomial fit failed: {0}")]
    PolynomialFit(&'static str),

    #[error("Event scan was cancelled")]
    Cancelled,

    #[error("Background worker failed: {0}")]
    Worker(String),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<tokio::task::JoinError> for JovianError {
    fn from(err: tokio::task::JoinError) -> Self {
        JovianError::Worker(err.to_string())
    }
}

impl PartialEq for JovianError {
    fn eq(&self, other: &Self) -> bool {
        use JovianError::*;
        match (self, other) {
            (InvalidTimeSpan(a), InvalidTimeSpan(b)) => a == b,
            (
                InvalidDate {
                    year: ya,
                    month: ma,
                    day: da,
                },
                InvalidDate {
                    year: yb,
                    month: mb,
                    day: db,
                },
            ) => ya == yb && ma == mb && da == db,
            (InvalidLocation(a), InvalidLocation(b)) => a == b,
            (InvalidSearchParams(a), InvalidSearchParams(b)) => a == b,
            (InvalidEphemeris(a), InvalidEphemeris(b)) => a == b,
            (PolynomialFit(a), PolynomialFit(b)) => a == b,
            (Worker(a), Worker(b)) => a == b,

            // Wrapped foreign errors are only compared by variant
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            (Cancelled, Cancelled) => true,

            _ => false,
        }
    }
}
