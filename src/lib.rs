//! Grant rate engine
//!
//! Scales a base grant rate, set for one anchor country, to every other country
//! using purchasing power parity, inflation and a cost-of-living index.
//!
//! ```no_run
//! use grant_rate_engine::{load_config, pipeline, LogObserver};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.json"), &LogObserver)?;
//! let report = pipeline::run(&config, &LogObserver)?;
//! println!("{} countries", report.rates.len());
//! # Ok::<(), grant_rate_engine::RateError>(())
//! ```

pub mod config;
pub mod error;
pub mod indicators;
pub mod observe;
pub mod pipeline;
pub mod rates;

pub use config::{load_config, Config};
pub use error::{RateError, Result};
pub use indicators::{Indicator, IndicatorRow, IndicatorTable};
pub use observe::{LogObserver, NullObserver, RecordingObserver, RunObserver};
pub use pipeline::{compute_rates, run, RunReport};
pub use rates::{RateRow, RateSummary};
