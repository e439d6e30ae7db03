//! Dividend/split adjustment and high/low re-derivation.
//!
//! Each raw bar is turned into a [`NormalizedBar`] in a fixed order:
//! 1. the calendar date becomes whole seconds since the Unix epoch (midnight UTC)
//! 2. if an adjusted close is present, open/high/low/close are scaled by
//!    `adj_close / close`
//! 3. high and low are recomputed as the max/min over the scaled
//!    open/high/low/close (the raw high/low included)
//!
//! The order matters: the scale factor comes from the unadjusted close and is
//! applied uniformly, and the max/min pass runs afterwards. Downstream files
//! depend on exactly this sequence, so it is reproduced as is.

use super::provider::RawBar;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One adjusted daily bar, ready to be written.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBar {
    /// Seconds since the Unix epoch.
    pub date: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Errors raised while adjusting a single bar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdjustError {
    /// Adjusted close present but the raw close is zero.
    #[error("division by zero on {date}: close is 0 with adjusted close {adj_close}")]
    DivisionByZero { date: NaiveDate, adj_close: f64 },

    /// A mandatory price field is missing.
    #[error("malformed record on {date}: missing {field}")]
    MissingField { date: NaiveDate, field: &'static str },
}

/// Normalize a ticker's raw series. Stops at the first bad bar.
///
/// Order and length are preserved; an empty series is valid.
pub fn normalize(bars: &[RawBar]) -> Result<Vec<NormalizedBar>, AdjustError> {
    bars.iter().map(normalize_bar).collect()
}

/// Normalize one raw bar.
pub fn normalize_bar(bar: &RawBar) -> Result<NormalizedBar, AdjustError> {
    let open = required(bar, bar.open, "open")?;
    let high = required(bar, bar.high, "high")?;
    let low = required(bar, bar.low, "low")?;
    let close = required(bar, bar.close, "close")?;

    let [open, high, low, close] = match bar.adj_close {
        Some(adj_close) => {
            if close == 0.0 {
                return Err(AdjustError::DivisionByZero {
                    date: bar.date,
                    adj_close,
                });
            }
            let scale = adj_close / close;
            [open * scale, high * scale, low * scale, close * scale]
        }
        None => [open, high, low, close],
    };

    let prices = [open, high, low, close];
    let high = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = prices.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(NormalizedBar {
        date: epoch_seconds(bar.date),
        open,
        high,
        low,
        close,
    })
}

/// Seconds since the Unix epoch at midnight UTC of `date`.
pub fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn required(bar: &RawBar, value: Option<f64>, field: &'static str) -> Result<f64, AdjustError> {
    value.ok_or(AdjustError::MissingField {
        date: bar.date,
        field,
    })
}
