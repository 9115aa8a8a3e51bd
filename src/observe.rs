//! Pipeline observability
//!
//! Stages never log directly. They report events to a [`RunObserver`] passed
//! in by the caller: the binary uses [`LogObserver`], tests use
//! [`RecordingObserver`] or [`NullObserver`].

use std::cell::RefCell;
use std::path::Path;

use log::{debug, error, info, warn};

use crate::config::{Config, ConfigFallback};
use crate::error::RateError;
use crate::indicators::{IndicatorRange, IndicatorTable};
use crate::pipeline::{Imputation, MergeStats};
use crate::rates::{FactorBreakdown, RateSummary};

/// Receiver for pipeline events. Every method defaults to a no-op.
pub trait RunObserver {
    fn config_loaded(&self, _path: &Path, _config: &Config) {}
    fn config_fallback(&self, _path: &Path, _fallback: &ConfigFallback) {}
    fn table_loaded(&self, _table: &IndicatorTable) {}
    fn range_checked(&self, _range: &IndicatorRange) {}
    fn outlier(&self, _warning: &str) {}
    fn merged(&self, _stats: &MergeStats) {}
    fn imputed(&self, _country_code: &str, _imputation: &Imputation) {}
    fn rate_computed(&self, _country_code: &str, _breakdown: &FactorBreakdown, _rate: f64) {}
    fn rate_fallback(&self, _country_code: &str, _error: &RateError) {}
    fn persisted(&self, _path: &Path, _summary: &RateSummary, _base_rate: f64) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn config_loaded(&self, path: &Path, config: &Config) {
        info!("Loaded config from {} (base rate ${:.2})", path.display(), config.base_rate);
    }

    fn config_fallback(&self, path: &Path, fallback: &ConfigFallback) {
        match fallback {
            ConfigFallback::Missing => warn!("Config file {} not found, using defaults", path.display()),
            ConfigFallback::Unparsable(reason) => {
                error!("Error in config file {}: {reason}, using defaults", path.display())
            }
        }
    }

    fn table_loaded(&self, table: &IndicatorTable) {
        info!("Loaded {} data: {} countries from {}", table.indicator, table.len(), table.origin);
    }

    fn range_checked(&self, range: &IndicatorRange) {
        info!("{} range: {:.3} - {:.3}", range.indicator, range.min, range.max);
    }

    fn outlier(&self, warning: &str) {
        warn!("{warning}");
    }

    fn merged(&self, stats: &MergeStats) {
        info!(
            "Merged dataset: {} countries, {} complete, {} missing inflation, {} missing COLI",
            stats.total, stats.complete, stats.missing_inflation, stats.missing_coli
        );
    }

    fn imputed(&self, country_code: &str, imputation: &Imputation) {
        debug!("{country_code}: {imputation}");
    }

    fn rate_computed(&self, country_code: &str, breakdown: &FactorBreakdown, rate: f64) {
        debug!(
            "{country_code}: ppp_factor={:.3} inflation_factor={:.3} coli_factor={:.3} factor={:.3} rate=${rate:.2}",
            breakdown.ppp_factor, breakdown.inflation_factor, breakdown.coli_factor, breakdown.adjustment_factor
        );
    }

    fn rate_fallback(&self, country_code: &str, error: &RateError) {
        warn!("Using base rate for {country_code}: {error}");
    }

    fn persisted(&self, path: &Path, summary: &RateSummary, base_rate: f64) {
        info!("Rates for {} countries saved to {}", summary.count, path.display());
        info!("  Range: ${:.2} - ${:.2}", summary.min, summary.max);
        info!("  Mean: ${:.2}", summary.mean);
        match summary.anchor_rate {
            Some(rate) if rate == base_rate => info!("  Anchor rate: ${rate:.2}"),
            Some(rate) => warn!("  Anchor rate ${rate:.2} differs from base rate ${base_rate:.2}"),
            None => warn!("  Anchor country missing from output"),
        }
    }
}

/// Keeps a one-line description of every event, in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl RunObserver for RecordingObserver {
    fn config_fallback(&self, path: &Path, fallback: &ConfigFallback) {
        self.record(format!("config_fallback: {}: {fallback}", path.display()));
    }

    fn outlier(&self, warning: &str) {
        self.record(format!("outlier: {warning}"));
    }

    fn merged(&self, stats: &MergeStats) {
        self.record(format!(
            "merged: total={} complete={} missing_inflation={} missing_coli={}",
            stats.total, stats.complete, stats.missing_inflation, stats.missing_coli
        ));
    }

    fn imputed(&self, country_code: &str, imputation: &Imputation) {
        self.record(format!("imputed: {country_code}: {imputation}"));
    }

    fn rate_fallback(&self, country_code: &str, error: &RateError) {
        self.record(format!("rate_fallback: {country_code}: {error}"));
    }

    fn persisted(&self, path: &Path, summary: &RateSummary, _base_rate: f64) {
        self.record(format!("persisted: {} rows to {}", summary.count, path.display()));
    }
}
