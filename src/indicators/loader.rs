//! Load indicator CSVs into canonical `(country_code, <indicator>)` tables
//!
//! Upstream converters name their columns however they like, so only position
//! matters: the first column is the country code and the second the value.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{Indicator, IndicatorRow, IndicatorTable};
use crate::error::{RateError, Result};

/// Load one indicator table from a CSV file
pub fn load_indicator(path: &Path, indicator: Indicator) -> Result<IndicatorTable> {
    let file = File::open(path).map_err(|e| RateError::io(path, e))?;
    let origin = path.display().to_string();

    load_indicator_from_reader(file, indicator, &origin).map_err(|e| match e {
        // Re-attach the real path to low-level CSV failures
        RateError::Csv { source, .. } => RateError::csv(path, source),
        other => other,
    })
}

/// Load one indicator table from any reader (useful for testing)
pub fn load_indicator_from_reader<R: Read>(
    reader: R,
    indicator: Indicator,
    origin: &str,
) -> Result<IndicatorTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| RateError::csv(origin, e))?;
    if headers.len() < 2 {
        return Err(RateError::data_format(
            origin,
            format!(
                "expected at least 2 columns (country code, {indicator}), found {}",
                headers.len()
            ),
        ));
    }

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| RateError::csv(origin, e))?;
        // Header is line 1
        let line = record.position().map_or(idx + 2, |p| p.line() as usize);

        if record.len() < 2 {
            return Err(RateError::data_format(
                origin,
                format!("line {line}: expected 2 fields, found {}", record.len()),
            ));
        }

        let country_code = &record[0];
        if country_code.is_empty() {
            return Err(RateError::data_format(origin, format!("line {line}: blank country code")));
        }

        let raw_value = &record[1];
        let value: f64 = raw_value.parse().map_err(|_| {
            RateError::data_format(
                origin,
                format!("line {line}: {indicator} value '{raw_value}' for {country_code} is not a number"),
            )
        })?;

        rows.push(IndicatorRow::new(country_code, value, line));
    }

    if rows.is_empty() {
        return Err(RateError::data_format(origin, "table has no data rows"));
    }

    Ok(IndicatorTable::new(indicator, origin, rows))
}
