//! Equal-weight portfolio backtest over exported price files.
//!
//! Reads the `<TICKER>.csv` files written by the export, holds every ticker
//! at weight 1/n, rebalances every `rebalance_every` rows, and reports final
//! value, volatility, maximum drawdown and Sharpe ratio. Series are aligned
//! by row index: the first ticker's length sets the number of days.

pub mod metrics;

use crate::data::{csv_path, NormalizedBar};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("no tickers to backtest")]
    NoTickers,

    #[error("symbol '{0}' cannot be used as a file name")]
    InvalidSymbol(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no data for ticker {symbol}")]
    NoData { symbol: String },

    #[error("ticker {symbol} has {rows} rows but {expected} are needed")]
    ShortSeries {
        symbol: String,
        rows: usize,
        expected: usize,
    },

    #[error("ticker {symbol} has a zero close at {date}; cannot rebalance")]
    ZeroPrice { symbol: String, date: i64 },

    #[error("invalid backtest settings: {0}")]
    InvalidSettings(&'static str),
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BacktestConfig {
    /// Starting portfolio value.
    pub initial_capital: f64,

    /// Rebalance on every row index divisible by this.
    pub rebalance_every: usize,

    /// Annual risk-free rate for the Sharpe ratio.
    pub risk_free_rate: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 1_000_000.0,
            rebalance_every: 20,
            risk_free_rate: 0.01,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(BacktestError::InvalidSettings(
                "initial_capital must be a positive number",
            ));
        }
        if self.rebalance_every == 0 {
            return Err(BacktestError::InvalidSettings(
                "rebalance_every must be at least 1",
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(BacktestError::InvalidSettings(
                "risk_free_rate must be a finite number",
            ));
        }
        Ok(())
    }
}

/// One ticker's adjusted bars, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<NormalizedBar>,
}

/// Result of a backtest run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub days: usize,
    pub final_value: f64,
    pub total_return: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

impl fmt::Display for BacktestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Portfolio Value: ${:.2}", self.final_value)?;
        writeln!(f, "Total Return: {:.6}", self.total_return)?;
        writeln!(f, "Volatility: {:.6}", self.volatility)?;
        writeln!(f, "Max Drawdown: {:.6}", self.max_drawdown)?;
        write!(f, "Sharpe Ratio: {:.6}", self.sharpe_ratio)
    }
}

/// Read `<dir>/<SYMBOL>.csv` as written by the export.
pub fn load_series(dir: &Path, symbol: &str) -> Result<PriceSeries, BacktestError> {
    let path =
        csv_path(dir, symbol).map_err(|_| BacktestError::InvalidSymbol(symbol.to_string()))?;
    let read_err = |source| BacktestError::Read {
        path: path.clone(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(&path)
        .map_err(read_err)?;
    let bars = reader
        .deserialize::<NormalizedBar>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;

    if bars.is_empty() {
        return Err(BacktestError::NoData {
            symbol: symbol.to_string(),
        });
    }

    tracing::debug!(symbol, rows = bars.len(), path = %path.display(), "loaded series");
    Ok(PriceSeries {
        symbol: symbol.to_string(),
        bars,
    })
}

/// Load every symbol from `dir` and run the backtest. Repeated symbols count once.
pub fn backtest_dir(
    dir: &Path,
    symbols: &[&str],
    config: &BacktestConfig,
) -> Result<BacktestReport, BacktestError> {
    let mut seen = Vec::with_capacity(symbols.len());
    for &symbol in symbols {
        if !seen.contains(&symbol) {
            seen.push(symbol);
        }
    }

    let series = seen
        .iter()
        .map(|symbol| load_series(dir, symbol))
        .collect::<Result<Vec<_>, _>>()?;
    run_backtest(&series, config)
}

/// Simulate an equal-weight portfolio over `series`.
pub fn run_backtest(
    series: &[PriceSeries],
    config: &BacktestConfig,
) -> Result<BacktestReport, BacktestError> {
    config.validate()?;
    let first = series.first().ok_or(BacktestError::NoTickers)?;
    let days = first.bars.len();

    for s in series {
        if s.bars.is_empty() {
            return Err(BacktestError::NoData {
                symbol: s.symbol.clone(),
            });
        }
        if s.bars.len() < days {
            return Err(BacktestError::ShortSeries {
                symbol: s.symbol.clone(),
                rows: s.bars.len(),
                expected: days,
            });
        }
    }

    let weight = 1.0 / series.len() as f64;
    let mut holdings = vec![0.0; series.len()];
    rebalance(&mut holdings, series, 0, weight, config.initial_capital)?;

    let mut values = Vec::with_capacity(days);
    for day in 0..days {
        let value: f64 = holdings
            .iter()
            .zip(series)
            .map(|(qty, s)| qty * s.bars[day].close)
            .sum();
        values.push(value);

        if day % config.rebalance_every == 0 {
            rebalance(&mut holdings, series, day, weight, value)?;
        }
    }

    let returns = metrics::period_returns(config.initial_capital, &values);
    let report = BacktestReport {
        days,
        final_value: values.last().copied().unwrap_or(config.initial_capital),
        total_return: metrics::total_return(config.initial_capital, &values),
        volatility: metrics::volatility(&returns),
        max_drawdown: metrics::max_drawdown(&values),
        sharpe_ratio: metrics::sharpe_ratio(&returns, config.risk_free_rate),
    };

    tracing::info!(
        tickers = series.len(),
        days,
        final_value = report.final_value,
        "backtest complete"
    );
    Ok(report)
}

/// Reset holdings to `weight * total` of each ticker at `day`'s close.
fn rebalance(
    holdings: &mut [f64],
    series: &[PriceSeries],
    day: usize,
    weight: f64,
    total: f64,
) -> Result<(), BacktestError> {
    for (qty, s) in holdings.iter_mut().zip(series) {
        let bar = &s.bars[day];
        if bar.close == 0.0 {
            return Err(BacktestError::ZeroPrice {
                symbol: s.symbol.clone(),
                date: bar.date,
            });
        }
        *qty = weight * total / bar.close;
    }
    Ok(())
}
