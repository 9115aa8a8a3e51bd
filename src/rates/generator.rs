//! Per-country rates from resolved indicators

use serde::{Deserialize, Serialize};

use super::factor::adjustment_factor;
use crate::config::Config;
use crate::error::Result;
use crate::observe::RunObserver;
use crate::pipeline::ResolvedRow;

/// Final rate for one country, as written to the output CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    #[serde(rename = "CountryCode")]
    pub country_code: String,
    #[serde(rename = "Rate")]
    pub rate: f64,
}

/// Round to cents, ties to even.
///
/// Rounds the exact decimal expansion of `value`: scaling by 100 first would
/// round the product to the nearest double and move values across the tie.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Compute one rate per resolved row, in input order.
///
/// The anchor country always gets exactly `base_rate`. A country whose factor
/// cannot be computed because of a recoverable error also gets `base_rate`, and
/// the failure is reported to the observer instead of aborting the batch. Any
/// other error is returned.
pub fn generate_rates(
    rows: &[ResolvedRow],
    config: &Config,
    observer: &dyn RunObserver,
) -> Result<Vec<RateRow>> {
    rows.iter()
        .map(|row| {
            Ok(RateRow {
                country_code: row.country_code.clone(),
                rate: country_rate(row, config, observer)?,
            })
        })
        .collect()
}

fn country_rate(row: &ResolvedRow, config: &Config, observer: &dyn RunObserver) -> Result<f64> {
    if row.country_code == config.anchor.country_code {
        return Ok(config.base_rate);
    }

    match adjustment_factor(&row.country_code, row.ppp, row.inflation, row.coli, config) {
        Ok(breakdown) => {
            let rate = round_to_cents(config.base_rate * breakdown.adjustment_factor);
            observer.rate_computed(&row.country_code, &breakdown, rate);
            Ok(rate)
        }
        Err(e) if e.is_recoverable() => {
            observer.rate_fallback(&row.country_code, &e);
            Ok(config.base_rate)
        }
        Err(e) => Err(e),
    }
}
