//! Adjustment factor from PPP, inflation and COLI relative to the anchor
//!
//! Lower relative PPP or COLI lowers the factor proportionally. Inflation above
//! the anchor's adds a dampened buffer capped at +10%; inflation below the
//! anchor's lowers the inflation term without any floor. The combined value is
//! clamped to the configured bounds.

use crate::config::Config;
use crate::error::{RateError, Result};

/// Fraction of the relative inflation excess passed into the factor
pub const INFLATION_DAMPING: f64 = 0.1;

/// Cap on the inflation buffer
pub const MAX_INFLATION_BOOST: f64 = 0.1;

/// Intermediate terms of one factor computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorBreakdown {
    pub ppp_factor: f64,
    pub inflation_factor: f64,
    pub coli_factor: f64,
    /// Weighted sum before clamping
    pub combined: f64,
    /// Clamped result
    pub adjustment_factor: f64,
}

/// Compute the adjustment factor for one country.
///
/// Fails with [`RateError::InvalidIndicator`] if any input is NaN or infinite.
pub fn adjustment_factor(
    country_code: &str,
    ppp: f64,
    inflation: f64,
    coli: f64,
    config: &Config,
) -> Result<FactorBreakdown> {
    for (field, value) in [("ppp", ppp), ("inflation", inflation), ("coli", coli)] {
        if !value.is_finite() {
            return Err(RateError::InvalidIndicator {
                country_code: country_code.to_string(),
                field,
                value,
            });
        }
    }

    let anchor = &config.anchor;
    let weights = &config.weights;

    let ppp_factor = ppp / anchor.ppp;

    let inflation_ratio = inflation / anchor.inflation;
    let inflation_factor = 1.0 + ((inflation_ratio - 1.0) * INFLATION_DAMPING).min(MAX_INFLATION_BOOST);

    let coli_factor = coli / anchor.coli;

    let combined = weights.ppp * ppp_factor
        + weights.inflation * inflation_factor
        + weights.coli * coli_factor;

    Ok(FactorBreakdown {
        ppp_factor,
        inflation_factor,
        coli_factor,
        combined,
        adjustment_factor: config.factor_bounds.clamp(combined),
    })
}
