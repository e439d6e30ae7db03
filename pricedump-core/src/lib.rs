//! pricedump core: daily price download, adjustment, CSV export, and an
//! equal-weight backtest over the exported files.
//!
//! - Provider trait and the Yahoo Finance chart-API implementation
//! - Adjuster: dividend/split scaling and high/low re-derivation
//! - Headerless per-ticker CSV writer
//! - Batch export driver with per-ticker error isolation
//! - Equal-weight, periodically rebalanced portfolio backtest
//! - TOML export configuration

pub mod backtest;
pub mod config;
pub mod data;

pub use backtest::{BacktestConfig, BacktestError, BacktestReport};
pub use config::{ConfigError, ExportConfig};
