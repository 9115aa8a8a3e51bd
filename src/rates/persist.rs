//! Write the rate table and summarize it

use std::fs;
use std::path::{Path, PathBuf};

use super::generator::RateRow;
use crate::config::Config;
use crate::error::{RateError, Result};
use crate::observe::RunObserver;

/// Summary statistics over a finished rate table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// `None` when the anchor country is not in the table
    pub anchor_rate: Option<f64>,
}

impl RateSummary {
    pub fn of(rows: &[RateRow], anchor_code: &str) -> Self {
        if rows.is_empty() {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                anchor_rate: None,
            };
        }

        let (min, max, sum) = rows.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), r| (min.min(r.rate), max.max(r.rate), sum + r.rate),
        );

        Self {
            count: rows.len(),
            min,
            max,
            mean: sum / rows.len() as f64,
            anchor_rate: rows.iter().find(|r| r.country_code == anchor_code).map(|r| r.rate),
        }
    }
}

/// Sort `rows` in place by country code and write them to `path`, then report
/// a summary. On return `rows` is in the order written.
///
/// The table is written to a sibling temporary file first and renamed over
/// `path`, so `path` never holds a partial table.
pub fn write_rates(
    path: &Path,
    rows: &mut [RateRow],
    config: &Config,
    observer: &dyn RunObserver,
) -> Result<RateSummary> {
    rows.sort_by(|a, b| a.country_code.cmp(&b.country_code));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RateError::io(parent, e))?;
    }

    let tmp_path = temp_path_for(path);
    if let Err(e) = write_csv(&tmp_path, rows) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        RateError::io(path, e)
    })?;

    let summary = RateSummary::of(rows, &config.anchor.country_code);
    observer.persisted(path, &summary, config.base_rate);
    Ok(summary)
}

fn write_csv(path: &Path, rows: &[RateRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| RateError::csv(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| RateError::csv(path, e))?;
    }
    writer.flush().map_err(|e| RateError::io(path, e))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
