//! Export configuration: tickers, date range, and output location.
//!
//! Stored as TOML. Every field is optional; anything left out falls back to
//! the built-in defaults (ten large-cap US tickers, 2020-01-01 to 2024-12-31,
//! current directory). Backtest settings live under `[backtest]`.

use crate::backtest::{BacktestConfig, BacktestError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tickers exported when none are configured.
pub const DEFAULT_TICKERS: [&str; 10] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "NFLX", "ADBE", "PYPL",
];

/// Upper bound on per-ticker retries.
pub const MAX_RETRIES: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("jobs must be at least 1")]
    InvalidJobs,

    #[error("max_retries is {0}; at most {max} are allowed", max = MAX_RETRIES)]
    TooManyRetries(u32),

    #[error(transparent)]
    Backtest(#[from] BacktestError),
}

/// Everything one export run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Tickers in processing order. Duplicates are kept.
    pub tickers: Vec<String>,

    /// First day requested (inclusive).
    pub start_date: NaiveDate,

    /// Last day requested; the provider treats it as exclusive.
    pub end_date: NaiveDate,

    /// Directory receiving `<TICKER>.csv` files.
    pub output_dir: PathBuf,

    /// Worker threads. 1 exports sequentially.
    pub jobs: usize,

    /// Retries per ticker on transient provider errors.
    pub max_retries: u32,

    /// Portfolio simulation over the exported files.
    pub backtest: BacktestConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or(NaiveDate::MIN),
            output_dir: PathBuf::from("."),
            jobs: 1,
            max_retries: 0,
            backtest: BacktestConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.jobs == 0 {
            return Err(ConfigError::InvalidJobs);
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ConfigError::TooManyRetries(self.max_retries));
        }
        self.backtest.validate()?;
        Ok(())
    }

    /// Tickers as string slices, in order.
    pub fn symbols(&self) -> Vec<&str> {
        self.tickers.iter().map(|t| t.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_list() {
        let c = ExportConfig::default();
        assert_eq!(c.symbols(), DEFAULT_TICKERS.to_vec());
        assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(c.end_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(c.output_dir, PathBuf::from("."));
        assert_eq!(c.jobs, 1);
        assert_eq!(c.max_retries, 0);
        assert_eq!(c.backtest, BacktestConfig::default());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_roundtrip() {
        let c = ExportConfig::default();
        let parsed = ExportConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(c, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let c = ExportConfig::from_toml(
            r#"
tickers = ["SPY", "QQQ", "SPY"]
start_date = "2021-01-01"
"#,
        )
        .unwrap();
        assert_eq!(c.symbols(), vec!["SPY", "QQQ", "SPY"]);
        assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(c.end_date, ExportConfig::default().end_date);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = ExportConfig::from_toml(
            r#"
start_date = "2024-01-01"
end_date = "2023-01-01"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDateRange { .. }));
    }

    #[test]
    fn zero_jobs_is_rejected() {
        assert!(matches!(
            ExportConfig::from_toml("jobs = 0"),
            Err(ConfigError::InvalidJobs)
        ));
    }

    #[test]
    fn retry_count_is_capped() {
        assert!(ExportConfig::from_toml("max_retries = 10").is_ok());
        assert!(matches!(
            ExportConfig::from_toml("max_retries = 33"),
            Err(ConfigError::TooManyRetries(33))
        ));
    }

    #[test]
    fn backtest_table_is_parsed_and_validated() {
        let c = ExportConfig::from_toml(
            r#"
[backtest]
initial_capital = 50000.0
rebalance_every = 5
"#,
        )
        .unwrap();
        assert_eq!(c.backtest.initial_capital, 50_000.0);
        assert_eq!(c.backtest.rebalance_every, 5);
        assert_eq!(c.backtest.risk_free_rate, 0.01);

        assert!(matches!(
            ExportConfig::from_toml("[backtest]\nrebalance_every = 0"),
            Err(ConfigError::Backtest(BacktestError::InvalidSettings(_)))
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ExportConfig::from_toml("tickrs = [\"AAPL\"]"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ExportConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
