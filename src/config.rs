//! Run configuration
//!
//! Loaded once from a JSON document and never mutated afterwards. Only
//! `base_rate` is expected in a typical config file; the anchor constants,
//! weights, factor bounds and file locations all have defaults that reproduce
//! the reference calculation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RateError, Result};
use crate::observe::RunObserver;
use crate::rates::round_to_cents;

/// Base rate used when the config file is missing or has no usable value
pub const DEFAULT_BASE_RATE: f64 = 7.5;

/// Why defaults were used in place of (part of) the config file
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigFallback {
    Missing,
    Unparsable(String),
}

impl std::fmt::Display for ConfigFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigFallback::Missing => f.write_str("file not found"),
            ConfigFallback::Unparsable(reason) => f.write_str(reason),
        }
    }
}

/// Reference country whose indicators define a factor of 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(default = "default_anchor_code")]
    pub country_code: String,

    #[serde(default = "default_anchor_ppp")]
    pub ppp: f64,

    /// Annual inflation in percent
    #[serde(default = "default_anchor_inflation")]
    pub inflation: f64,

    #[serde(default = "default_anchor_coli")]
    pub coli: f64,
}

fn default_anchor_code() -> String { "USA".to_string() }
fn default_anchor_ppp() -> f64 { 1.0 }
fn default_anchor_inflation() -> f64 { 2.95 }
fn default_anchor_coli() -> f64 { 128.03 }

impl Default for Anchor {
    fn default() -> Self {
        Self {
            country_code: default_anchor_code(),
            ppp: default_anchor_ppp(),
            inflation: default_anchor_inflation(),
            coli: default_anchor_coli(),
        }
    }
}

/// Relative weight of each indicator in the combined factor (must sum to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    #[serde(default = "default_ppp_weight")]
    pub ppp: f64,

    #[serde(default = "default_quarter")]
    pub inflation: f64,

    #[serde(default = "default_quarter")]
    pub coli: f64,
}

fn default_ppp_weight() -> f64 { 0.5 }
fn default_quarter() -> f64 { 0.25 }

impl Default for Weights {
    fn default() -> Self {
        Self {
            ppp: 0.5,
            inflation: 0.25,
            coli: 0.25,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.ppp + self.inflation + self.coli
    }
}

/// Clamp applied to the combined adjustment factor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBounds {
    #[serde(default = "default_factor_min")]
    pub min: f64,

    #[serde(default = "default_factor_max")]
    pub max: f64,
}

fn default_factor_min() -> f64 { 0.2 }
fn default_factor_max() -> f64 { 1.2 }

impl Default for FactorBounds {
    fn default() -> Self {
        Self { min: 0.2, max: 1.2 }
    }
}

impl FactorBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

}

/// Input and output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPaths {
    #[serde(default = "default_ppp_path")]
    pub ppp: PathBuf,

    #[serde(default = "default_inflation_path")]
    pub inflation: PathBuf,

    #[serde(default = "default_coli_path")]
    pub coli: PathBuf,

    #[serde(default = "default_output_path")]
    pub output: PathBuf,
}

fn default_ppp_path() -> PathBuf { PathBuf::from("final_data/PPP.csv") }
fn default_inflation_path() -> PathBuf { PathBuf::from("final_data/INFLATION.csv") }
fn default_coli_path() -> PathBuf { PathBuf::from("final_data/COLI.csv") }
fn default_output_path() -> PathBuf { PathBuf::from("rates/rates.csv") }

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            ppp: default_ppp_path(),
            inflation: default_inflation_path(),
            coli: default_coli_path(),
            output: default_output_path(),
        }
    }
}

/// Everything a pipeline run reads besides the indicator tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Payout for the anchor country; every other rate is a multiple of it
    #[serde(default = "default_base_rate")]
    pub base_rate: f64,

    #[serde(default)]
    pub anchor: Anchor,

    #[serde(default)]
    pub weights: Weights,

    #[serde(default)]
    pub factor_bounds: FactorBounds,

    #[serde(default)]
    pub paths: DataPaths,
}

fn default_base_rate() -> f64 { DEFAULT_BASE_RATE }

impl Default for Config {
    fn default() -> Self {
        Self {
            base_rate: DEFAULT_BASE_RATE,
            anchor: Anchor::default(),
            weights: Weights::default(),
            factor_bounds: FactorBounds::default(),
            paths: DataPaths::default(),
        }
    }
}

impl Config {
    /// Reject settings under which the factor formula is undefined
    pub fn validate(&self) -> Result<()> {
        if (self.weights.sum() - 1.0).abs() > 1e-9 {
            return Err(RateError::InvalidConfig(format!(
                "weights must sum to 1.0, got {}",
                self.weights.sum()
            )));
        }
        let weights = [self.weights.ppp, self.weights.inflation, self.weights.coli];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RateError::InvalidConfig(
                "weights must be finite and non-negative".to_string(),
            ));
        }

        let bounds = self.factor_bounds;
        if !(bounds.min.is_finite() && bounds.max.is_finite()) || bounds.min <= 0.0 || bounds.min > bounds.max {
            return Err(RateError::InvalidConfig(format!(
                "factor bounds must satisfy 0 < min <= max, got [{}, {}]",
                bounds.min, bounds.max
            )));
        }

        // Every rate must stay positive after rounding to cents
        if !self.base_rate.is_finite() || round_to_cents(self.base_rate * bounds.min) <= 0.0 {
            return Err(RateError::InvalidConfig(format!(
                "base_rate {} rounds to a zero rate at the minimum factor {}",
                self.base_rate, bounds.min
            )));
        }

        let anchor = &self.anchor;
        for (name, value) in [("ppp", anchor.ppp), ("inflation", anchor.inflation), ("coli", anchor.coli)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RateError::InvalidConfig(format!(
                    "anchor {name} must be a positive number, got {value}"
                )));
            }
        }
        if anchor.country_code.trim().is_empty() {
            return Err(RateError::InvalidConfig("anchor country_code is empty".to_string()));
        }

        Ok(())
    }
}

/// Load the configuration at `path`.
///
/// A missing or unparsable file falls back to defaults (reported through the
/// observer); so does a `base_rate` that is not a positive number. Only a
/// parsed config that fails [`Config::validate`] is an error.
pub fn load_config(path: &Path, observer: &dyn RunObserver) -> Result<Config> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            observer.config_fallback(path, &ConfigFallback::Missing);
            return Ok(Config::default());
        }
        Err(e) => return Err(RateError::io(path, e)),
    };

    let config = parse_config(&text, path, observer);
    config.validate()?;
    observer.config_loaded(path, &config);
    Ok(config)
}

fn parse_config(text: &str, path: &Path, observer: &dyn RunObserver) -> Config {
    let mut value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            observer.config_fallback(path, &ConfigFallback::Unparsable(format!("parse error: {e}")));
            return Config::default();
        }
    };

    // base_rate is handled apart from the rest so a bad value only resets itself
    let raw_base_rate = value.as_object_mut().and_then(|map| map.remove("base_rate"));

    let mut config: Config = match serde_json::from_value(value) {
        Ok(config) => config,
        Err(e) => {
            observer.config_fallback(path, &ConfigFallback::Unparsable(format!("parse error: {e}")));
            Config::default()
        }
    };

    config.base_rate = match raw_base_rate {
        None => DEFAULT_BASE_RATE,
        Some(raw) => match raw.as_f64() {
            Some(rate) if rate.is_finite() && rate > 0.0 => rate,
            _ => {
                observer.config_fallback(path, &ConfigFallback::Unparsable(format!("unusable base_rate {raw}")));
                DEFAULT_BASE_RATE
            }
        },
    };

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::RecordingObserver;
    use std::io::Write;

    fn parse(text: &str) -> (Config, RecordingObserver) {
        let observer = RecordingObserver::default();
        let config = parse_config(text, Path::new("config.json"), &observer);
        (config, observer)
    }

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = Config::default();
        assert_eq!(config.base_rate, 7.5);
        assert_eq!(config.anchor.country_code, "USA");
        assert_eq!(config.anchor.inflation, 2.95);
        assert_eq!(config.anchor.coli, 128.03);
        assert!((config.weights.sum() - 1.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_rate_only() {
        let (config, observer) = parse(r#"{"base_rate": 50.0}"#);
        assert_eq!(config.base_rate, 50.0);
        assert_eq!(config.paths, DataPaths::default());
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_bad_base_rate_resets_only_itself() {
        let (config, observer) = parse(r#"{"base_rate": "lots", "anchor": {"country_code": "GBR"}}"#);
        assert_eq!(config.base_rate, DEFAULT_BASE_RATE);
        assert_eq!(config.anchor.country_code, "GBR");
        assert_eq!(observer.events().len(), 1);

        let (config, _) = parse(r#"{"base_rate": -3}"#);
        assert_eq!(config.base_rate, DEFAULT_BASE_RATE);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let (config, observer) = parse("{ base_rate: ");
        assert_eq!(config, Config::default());
        assert!(observer.events()[0].starts_with("config_fallback"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let observer = RecordingObserver::default();
        let config = load_config(Path::new("/definitely/not/here.json"), &observer).unwrap();
        assert_eq!(config, Config::default());
        assert!(observer.events()[0].contains("file not found"));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"weights": {{"ppp": 0.6}}}}"#).unwrap();

        let observer = RecordingObserver::default();
        let err = load_config(file.path(), &observer).unwrap_err();
        assert!(matches!(err, RateError::InvalidConfig(_)));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = Config {
            factor_bounds: FactorBounds { min: 1.5, max: 1.2 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_rate_too_small_to_round_positive() {
        // 0.01 * 0.2 rounds to 0.00
        let tiny = Config {
            base_rate: 0.01,
            ..Default::default()
        };
        assert!(matches!(tiny.validate(), Err(RateError::InvalidConfig(_))));

        // 0.05 * 0.2 = 0.01
        let smallest = Config {
            base_rate: 0.05,
            ..Default::default()
        };
        assert!(smallest.validate().is_ok());
    }

    #[test]
    fn test_tiny_base_rate_in_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_rate": 0.001}}"#).unwrap();

        let err = load_config(file.path(), &RecordingObserver::default()).unwrap_err();
        assert!(err.to_string().contains("base_rate"));
    }
}
