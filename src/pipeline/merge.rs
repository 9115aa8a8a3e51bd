//! Left-join inflation and COLI onto the PPP country universe

use std::collections::HashMap;

use crate::error::{RateError, Result};
use crate::indicators::IndicatorTable;
use crate::observe::RunObserver;

/// One country after merging; inflation and COLI may still be absent
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub country_code: String,
    pub ppp: f64,
    pub inflation: Option<f64>,
    pub coli: Option<f64>,
}

impl MergedRow {
    pub fn is_complete(&self) -> bool {
        self.inflation.is_some() && self.coli.is_some()
    }
}

/// Row counts reported after the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub total: usize,
    pub complete: usize,
    pub missing_inflation: usize,
    pub missing_coli: usize,
}

impl MergeStats {
    pub fn of(rows: &[MergedRow]) -> Self {
        Self {
            total: rows.len(),
            complete: rows.iter().filter(|r| r.is_complete()).count(),
            missing_inflation: rows.iter().filter(|r| r.inflation.is_none()).count(),
            missing_coli: rows.iter().filter(|r| r.coli.is_none()).count(),
        }
    }
}

/// Merge the three tables, keeping exactly one row per PPP country in PPP order.
///
/// Fails if any table repeats a country code, since a repeated key would make
/// the join ambiguous.
pub fn merge_tables(
    ppp: &IndicatorTable,
    inflation: &IndicatorTable,
    coli: &IndicatorTable,
    observer: &dyn RunObserver,
) -> Result<Vec<MergedRow>> {
    // Index construction doubles as the uniqueness check for PPP
    index_by_code(ppp)?;
    let inflation_by_code = index_by_code(inflation)?;
    let coli_by_code = index_by_code(coli)?;

    let merged: Vec<MergedRow> = ppp
        .rows
        .iter()
        .map(|row| MergedRow {
            country_code: row.country_code.clone(),
            ppp: row.value,
            inflation: inflation_by_code.get(row.country_code.as_str()).copied(),
            coli: coli_by_code.get(row.country_code.as_str()).copied(),
        })
        .collect();

    observer.merged(&MergeStats::of(&merged));
    Ok(merged)
}

fn index_by_code(table: &IndicatorTable) -> Result<HashMap<&str, f64>> {
    let mut index = HashMap::with_capacity(table.len());
    let mut first_lines: HashMap<&str, usize> = HashMap::with_capacity(table.len());

    for row in &table.rows {
        let code = row.country_code.as_str();
        if let Some(first) = first_lines.insert(code, row.line) {
            return Err(RateError::data_format(
                table.origin.as_str(),
                format!(
                    "duplicate country code '{code}' in {} table (lines {first} and {})",
                    table.indicator, row.line
                ),
            ));
        }
        index.insert(code, row.value);
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Indicator;
    use crate::observe::{NullObserver, RecordingObserver};

    fn tables() -> (IndicatorTable, IndicatorTable, IndicatorTable) {
        (
            IndicatorTable::from_pairs(Indicator::Ppp, "PPP.csv", [("USA", 1.0), ("IND", 0.29), ("BRA", 0.52)]),
            IndicatorTable::from_pairs(Indicator::Inflation, "INFLATION.csv", [("BRA", 4.6), ("USA", 2.95), ("FRA", 4.9)]),
            IndicatorTable::from_pairs(Indicator::Coli, "COLI.csv", [("USA", 128.03)]),
        )
    }

    #[test]
    fn test_row_count_follows_ppp() {
        let (ppp, inflation, coli) = tables();
        let merged = merge_tables(&ppp, &inflation, &coli, &NullObserver).unwrap();

        assert_eq!(merged.len(), ppp.len());
        let codes: Vec<_> = merged.iter().map(|r| r.country_code.as_str()).collect();
        assert_eq!(codes, ["USA", "IND", "BRA"]);
    }

    #[test]
    fn test_left_join_leaves_gaps() {
        let (ppp, inflation, coli) = tables();
        let merged = merge_tables(&ppp, &inflation, &coli, &NullObserver).unwrap();

        assert_eq!(merged[0].inflation, Some(2.95));
        assert_eq!(merged[0].coli, Some(128.03));
        assert_eq!(merged[1].inflation, None);
        assert_eq!(merged[1].coli, None);
        assert_eq!(merged[2].inflation, Some(4.6));
        assert_eq!(merged[2].coli, None);
    }

    #[test]
    fn test_stats_reported() {
        let (ppp, inflation, coli) = tables();
        let observer = RecordingObserver::default();
        merge_tables(&ppp, &inflation, &coli, &observer).unwrap();

        assert_eq!(
            observer.events(),
            vec!["merged: total=3 complete=1 missing_inflation=1 missing_coli=2".to_string()]
        );
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let (ppp, _, coli) = tables();
        let inflation = IndicatorTable::from_pairs(
            Indicator::Inflation,
            "INFLATION.csv",
            [("USA", 2.95), ("IND", 5.4), ("USA", 3.1)],
        );

        let err = merge_tables(&ppp, &inflation, &coli, &NullObserver).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, RateError::DataFormat { .. }));
        assert!(msg.contains("INFLATION.csv"), "{msg}");
        assert!(msg.contains("'USA'"), "{msg}");
        // Header is line 1, so the third data row is line 4
        assert!(msg.contains("lines 2 and 4"), "{msg}");
    }

    #[test]
    fn test_duplicate_ppp_code_rejected() {
        let (_, inflation, coli) = tables();
        let ppp = IndicatorTable::from_pairs(Indicator::Ppp, "PPP.csv", [("USA", 1.0), ("USA", 1.0)]);
        assert!(merge_tables(&ppp, &inflation, &coli, &NullObserver).is_err());
    }
}
