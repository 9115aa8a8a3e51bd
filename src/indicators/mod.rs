//! Per-country indicator tables and their loading

pub mod loader;
pub mod ranges;

pub use loader::{load_indicator, load_indicator_from_reader};
pub use ranges::{check_ranges, IndicatorRange};

use std::fmt;

/// The three independently sourced indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Ppp,
    Inflation,
    Coli,
}

impl Indicator {
    /// Canonical column name after loading
    pub fn column(&self) -> &'static str {
        match self {
            Indicator::Ppp => "ppp",
            Indicator::Inflation => "inflation",
            Indicator::Coli => "coli",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One `(country_code, value)` pair from a source table
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub country_code: String,
    pub value: f64,
    /// 1-based line in the source file, header included
    pub line: usize,
}

impl IndicatorRow {
    pub fn new(country_code: impl Into<String>, value: f64, line: usize) -> Self {
        Self {
            country_code: country_code.into(),
            value,
            line,
        }
    }
}

/// A loaded source table in canonical form
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub indicator: Indicator,
    /// Where the rows came from, used in error messages
    pub origin: String,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorTable {
    pub fn new(indicator: Indicator, origin: impl Into<String>, rows: Vec<IndicatorRow>) -> Self {
        Self {
            indicator,
            origin: origin.into(),
            rows,
        }
    }

    /// Build a table from `(code, value)` pairs, numbered as if read from a
    /// file with a header line
    pub fn from_pairs<S: Into<String>>(
        indicator: Indicator,
        origin: impl Into<String>,
        pairs: impl IntoIterator<Item = (S, f64)>,
    ) -> Self {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(idx, (code, value))| IndicatorRow::new(code, value, idx + 2))
            .collect();
        Self::new(indicator, origin, rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
