//! The rate pipeline: load → check ranges → merge → impute → generate → persist
//!
//! Each stage takes the previous stage's output by reference and returns a new
//! value, so the only shared state is the read-only [`Config`].

mod impute;
mod merge;

pub use impute::{
    estimate_coli, impute_missing, median, Imputation, ResolvedRow, COLI_ESTIMATE_MAX, COLI_ESTIMATE_MIN,
    COLI_PPP_EXPONENT,
};
pub use merge::{merge_tables, MergeStats, MergedRow};

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::indicators::{check_ranges, load_indicator, Indicator, IndicatorTable};
use crate::observe::RunObserver;
use crate::rates::{generate_rates, write_rates, RateRow, RateSummary};

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Rates sorted by country code, as written
    pub rates: Vec<RateRow>,
    pub summary: RateSummary,
    pub output_path: PathBuf,
}

impl RunReport {
    pub fn rate_for(&self, country_code: &str) -> Option<f64> {
        self.rates
            .iter()
            .find(|r| r.country_code == country_code)
            .map(|r| r.rate)
    }
}

/// Compute rates from already loaded tables without touching the file system
pub fn compute_rates(
    config: &Config,
    ppp: &IndicatorTable,
    inflation: &IndicatorTable,
    coli: &IndicatorTable,
    observer: &dyn RunObserver,
) -> Result<Vec<RateRow>> {
    config.validate()?;
    check_ranges(&[ppp, inflation, coli], observer);
    let merged = merge_tables(ppp, inflation, coli, observer)?;
    let resolved = impute_missing(&merged, config, observer)?;
    generate_rates(&resolved, config, observer)
}

/// Run the whole pipeline using the locations in `config.paths`.
///
/// Any fatal error is returned before the output file is created or replaced.
pub fn run(config: &Config, observer: &dyn RunObserver) -> Result<RunReport> {
    let paths = &config.paths;

    let ppp = load_indicator(&paths.ppp, Indicator::Ppp)?;
    observer.table_loaded(&ppp);
    let inflation = load_indicator(&paths.inflation, Indicator::Inflation)?;
    observer.table_loaded(&inflation);
    let coli = load_indicator(&paths.coli, Indicator::Coli)?;
    observer.table_loaded(&coli);

    let mut rates = compute_rates(config, &ppp, &inflation, &coli, observer)?;
    let summary = write_rates(&paths.output, &mut rates, config, observer)?;

    Ok(RunReport {
        rates,
        summary,
        output_path: paths.output.clone(),
    })
}
