//! Adjustment factors, rate generation and persistence

pub mod factor;
pub mod generator;
pub mod persist;

pub use factor::{adjustment_factor, FactorBreakdown};
pub use generator::{generate_rates, round_to_cents, RateRow};
pub use persist::{write_rates, RateSummary};
