//! Value-range summary and outlier warnings for loaded tables

use super::{Indicator, IndicatorTable};
use crate::observe::RunObserver;

/// Inflation above this (percent) is flagged as extreme
pub const EXTREME_INFLATION: f64 = 50.0;

/// PPP below this is flagged as suspiciously low
pub const LOW_PPP: f64 = 0.1;

/// Min/max over the finite values of one table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRange {
    pub indicator: Indicator,
    pub min: f64,
    pub max: f64,
}

impl IndicatorRange {
    /// `None` when the table has no finite values
    pub fn of(table: &IndicatorTable) -> Option<Self> {
        let mut finite = table.rows.iter().map(|r| r.value).filter(|v| v.is_finite());
        let first = finite.next()?;
        let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self {
            indicator: table.indicator,
            min,
            max,
        })
    }

    /// Human-readable warning if this range contains an extreme outlier
    pub fn outlier_warning(&self) -> Option<String> {
        match self.indicator {
            Indicator::Inflation if self.max > EXTREME_INFLATION => {
                Some(format!("extreme inflation detected: {:.2}%", self.max))
            }
            Indicator::Ppp if self.min < LOW_PPP => {
                Some(format!("very low PPP detected: {:.3}", self.min))
            }
            _ => None,
        }
    }
}

/// Report each table's range and any outliers to the observer
pub fn check_ranges(tables: &[&IndicatorTable], observer: &dyn RunObserver) -> Vec<IndicatorRange> {
    let mut ranges = Vec::with_capacity(tables.len());
    for table in tables {
        let Some(range) = IndicatorRange::of(table) else {
            continue;
        };
        observer.range_checked(&range);
        if let Some(warning) = range.outlier_warning() {
            observer.outlier(&warning);
        }
        ranges.push(range);
    }
    ranges
}
