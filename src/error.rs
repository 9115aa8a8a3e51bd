//! Error types for the rate pipeline

use std::path::PathBuf;
use thiserror::Error;

use crate::indicators::Indicator;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, RateError>;

/// Errors raised while loading, merging, imputing or persisting rate data.
///
/// Everything except [`RateError::InvalidIndicator`] aborts the run before the
/// output file is touched. `InvalidIndicator` is scoped to a single country and
/// is absorbed by the rate generator.
#[derive(Debug, Error)]
pub enum RateError {
    /// A source table is malformed, empty, or violates the unique-key contract
    #[error("data format error in {origin}: {reason}")]
    DataFormat { origin: String, reason: String },

    /// Imputation cannot proceed because there is nothing to impute from
    #[error("insufficient data: no usable {indicator} values across {rows} merged rows")]
    InsufficientData { indicator: Indicator, rows: usize },

    /// A country's indicator is NaN or infinite
    #[error("invalid {field} for {country_code}: {value}")]
    InvalidIndicator {
        country_code: String,
        field: &'static str,
        value: f64,
    },

    /// Configuration values that would make every computed rate meaningless
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl RateError {
    pub(crate) fn data_format(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataFormat {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// True for errors that only affect one country's rate
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidIndicator { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_indicator_is_recoverable() {
        let err = RateError::InvalidIndicator {
            country_code: "ARG".to_string(),
            field: "inflation",
            value: f64::NAN,
        };
        assert!(err.is_recoverable());
        assert!(!RateError::data_format("PPP.csv", "empty").is_recoverable());
        assert!(!RateError::InsufficientData {
            indicator: Indicator::Inflation,
            rows: 3
        }
        .is_recoverable());
    }

    #[test]
    fn test_messages_carry_context() {
        let err = RateError::InsufficientData {
            indicator: Indicator::Inflation,
            rows: 12,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: no usable inflation values across 12 merged rows"
        );

        let err = RateError::io(
            "final_data/PPP.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("final_data/PPP.csv"));
    }
}
