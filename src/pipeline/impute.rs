//! Fill absent inflation and COLI values
//!
//! Missing inflation takes the cross-country median (computed once, before any
//! row is filled). Missing COLI is estimated from PPP with a power law anchored
//! on the reference country's COLI.

use std::fmt;

use super::merge::MergedRow;
use crate::config::Config;
use crate::error::{RateError, Result};
use crate::indicators::Indicator;
use crate::observe::RunObserver;

/// Exponent of the PPP → COLI power law
pub const COLI_PPP_EXPONENT: f64 = 0.7;

/// Estimated COLI is clamped to this range
pub const COLI_ESTIMATE_MIN: f64 = 50.0;
pub const COLI_ESTIMATE_MAX: f64 = 200.0;

/// A value substituted for an absent indicator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Imputation {
    /// Cross-country median inflation
    MedianInflation(f64),
    /// COLI estimated from PPP
    EstimatedColi(f64),
}

impl fmt::Display for Imputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imputation::MedianInflation(v) => write!(f, "using median inflation {v:.2}"),
            Imputation::EstimatedColi(v) => write!(f, "estimated COLI {v:.2}"),
        }
    }
}

/// A merged row with every indicator present
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    pub country_code: String,
    pub ppp: f64,
    pub inflation: f64,
    pub coli: f64,
}

/// Median of the finite values, `None` if there are none
pub fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// COLI estimate for a country with the given PPP
pub fn estimate_coli(ppp: f64, anchor_coli: f64) -> f64 {
    (anchor_coli * ppp.powf(COLI_PPP_EXPONENT)).clamp(COLI_ESTIMATE_MIN, COLI_ESTIMATE_MAX)
}

/// Resolve every merged row.
///
/// Fails with [`RateError::InsufficientData`] only when some row needs an
/// inflation value and no row has a usable one.
pub fn impute_missing(
    rows: &[MergedRow],
    config: &Config,
    observer: &dyn RunObserver,
) -> Result<Vec<ResolvedRow>> {
    let median_inflation = median(rows.iter().filter_map(|r| r.inflation));

    let needs_inflation = rows.iter().any(|r| r.inflation.is_none());
    let median_inflation = match (median_inflation, needs_inflation) {
        (Some(m), _) => m,
        // Never read when nothing is missing
        (None, false) => f64::NAN,
        (None, true) => {
            return Err(RateError::InsufficientData {
                indicator: Indicator::Inflation,
                rows: rows.len(),
            })
        }
    };

    Ok(rows
        .iter()
        .map(|row| resolve_row(row, median_inflation, config.anchor.coli, observer))
        .collect())
}

fn resolve_row(
    row: &MergedRow,
    median_inflation: f64,
    anchor_coli: f64,
    observer: &dyn RunObserver,
) -> ResolvedRow {
    let inflation = row.inflation.unwrap_or_else(|| {
        observer.imputed(&row.country_code, &Imputation::MedianInflation(median_inflation));
        median_inflation
    });

    let coli = row.coli.unwrap_or_else(|| {
        let estimate = estimate_coli(row.ppp, anchor_coli);
        observer.imputed(&row.country_code, &Imputation::EstimatedColi(estimate));
        estimate
    });

    ResolvedRow {
        country_code: row.country_code.clone(),
        ppp: row.ppp,
        inflation,
        coli,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{NullObserver, RecordingObserver};
    use approx::assert_relative_eq;

    fn row(code: &str, ppp: f64, inflation: Option<f64>, coli: Option<f64>) -> MergedRow {
        MergedRow {
            country_code: code.to_string(),
            ppp,
            inflation,
            coli,
        }
    }

    #[test]
    fn test_median() {
        assert_eq!(median([3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median([f64::NAN, 5.0]), Some(5.0));
        assert_eq!(median(std::iter::empty::<f64>()), None);
    }

    #[test]
    fn test_missing_inflation_uses_pre_imputation_median() {
        let rows = vec![
            row("USA", 1.0, Some(2.95), Some(128.03)),
            row("AAA", 0.5, None, Some(90.0)),
            row("BRA", 0.52, Some(4.6), Some(80.0)),
            row("BBB", 0.4, None, Some(70.0)),
            row("JPN", 0.9, Some(3.2), Some(110.0)),
        ];
        let observer = RecordingObserver::default();
        let resolved = impute_missing(&rows, &Config::default(), &observer).unwrap();

        // Median of {2.95, 4.6, 3.2}, not shifted by the first imputed value
        assert_eq!(resolved[1].inflation, 3.2);
        assert_eq!(resolved[3].inflation, 3.2);
        assert_eq!(
            observer.events(),
            vec![
                "imputed: AAA: using median inflation 3.20".to_string(),
                "imputed: BBB: using median inflation 3.20".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_coli_estimated_from_ppp() {
        let rows = vec![
            row("USA", 1.0, Some(2.95), Some(128.03)),
            row("IND", 0.3, Some(5.4), None),
        ];
        let observer = RecordingObserver::default();
        let resolved = impute_missing(&rows, &Config::default(), &observer).unwrap();

        assert_relative_eq!(resolved[1].coli, 128.03 * 0.3f64.powf(0.7), epsilon = 1e-9);
        assert_eq!(observer.events().len(), 1);
        assert!(observer.events()[0].starts_with("imputed: IND: estimated COLI"));
    }

    #[test]
    fn test_coli_estimate_clamped() {
        // 128.03 * 2^0.7 ≈ 208
        assert_eq!(estimate_coli(2.0, 128.03), 200.0);
        assert_eq!(estimate_coli(0.05, 128.03), 50.0);
        assert_relative_eq!(estimate_coli(1.0, 128.03), 128.03);
    }

    #[test]
    fn test_order_independent() {
        let rows = vec![
            row("USA", 1.0, Some(2.95), Some(128.03)),
            row("IND", 0.3, None, None),
            row("BRA", 0.52, Some(4.6), None),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let forward = impute_missing(&rows, &Config::default(), &NullObserver).unwrap();
        let mut backward = impute_missing(&reversed, &Config::default(), &NullObserver).unwrap();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_all_inflation_missing_fails() {
        let rows = vec![row("USA", 1.0, None, Some(128.03)), row("IND", 0.3, None, None)];
        let err = impute_missing(&rows, &Config::default(), &NullObserver).unwrap_err();
        assert!(matches!(
            err,
            RateError::InsufficientData {
                indicator: Indicator::Inflation,
                rows: 2
            }
        ));
    }

    #[test]
    fn test_imputations_reported() {
        let rows = vec![row("USA", 1.0, Some(2.95), None)];
        let observer = RecordingObserver::default();
        impute_missing(&rows, &Config::default(), &observer).unwrap();
        assert_eq!(observer.events(), vec!["imputed: USA: estimated COLI 128.03".to_string()]);
    }
}
