//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over the remote price source so the export
//! driver can be exercised against mocks in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily bar as received from a data provider (before adjustment).
///
/// Price fields are optional because providers report missing values as
/// nulls. They are still mandatory for normalization; a bar with a missing
/// price is rejected by [`crate::data::adjust::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// A complete OHLC bar with no adjusted close and no volume.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            adj_close: None,
            volume: None,
        }
    }

    pub fn with_adj_close(mut self, adj_close: f64) -> Self {
        self.adj_close = Some(adj_close);
        self
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// True when the provider sent a placeholder row with no values at all.
    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// Structured error types for provider operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("request refused by provider: {0}")]
    Blocked(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
}

/// Trait for remote daily-price providers.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a date range, oldest first.
    ///
    /// The end-date convention is the provider's own.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()
    }

    #[test]
    fn builder_sets_optional_fields() {
        let bar = RawBar::new(day(), 1.0, 2.0, 0.5, 1.5)
            .with_adj_close(0.75)
            .with_volume(42);
        assert_eq!(bar.adj_close, Some(0.75));
        assert_eq!(bar.volume, Some(42));
        assert!(!bar.is_empty());
    }

    #[test]
    fn placeholder_row_is_empty() {
        let bar = RawBar {
            date: day(),
            open: None,
            high: None,
            low: None,
            close: None,
            adj_close: Some(1.0),
            volume: None,
        };
        assert!(bar.is_empty());
    }

    #[test]
    fn error_messages_name_the_symbol() {
        let err = DataError::SymbolNotFound {
            symbol: "XYZ".into(),
        };
        assert!(err.to_string().contains("XYZ"));
        let err = DataError::RateLimited {
            retry_after_secs: 60,
        };
        assert!(err.to_string().contains("60s"));
    }
}
