//! Export orchestrator: fetch → normalize → write for each ticker.
//!
//! Every ticker is attempted. A failure is recorded against that ticker only
//! and never stops the batch.

use super::adjust::{normalize, AdjustError};
use super::csv_export::{csv_path, write_csv, WriteError};
use super::progress::ExportProgress;
use super::provider::{DataError, DataProvider};
use chrono::NaiveDate;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single ticker produced no file.
#[derive(Debug, Error)]
pub enum TickerError {
    #[error("provider error: {0}")]
    Provider(#[from] DataError),

    #[error("adjustment error: {0}")]
    Adjust(#[from] AdjustError),

    #[error("write error: {0}")]
    Write(#[from] WriteError),
}

/// A CSV file written for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub symbol: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Outcome for one entry of the ticker list.
#[derive(Debug)]
pub struct TickerOutcome {
    pub symbol: String,
    pub result: Result<ExportedFile, TickerError>,
}

/// Summary of a batch export, one outcome per input ticker in input order.
#[derive(Debug)]
pub struct ExportSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<TickerOutcome>,
}

impl ExportSummary {
    fn from_results(results: Vec<TickerOutcome>) -> Self {
        let succeeded = results.iter().filter(|o| o.result.is_ok()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn exported(&self) -> impl Iterator<Item = &ExportedFile> {
        self.results.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &TickerError)> {
        self.results
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.symbol.as_str(), e)))
    }
}

/// Fetch, normalize, and write a single ticker.
///
/// Nothing is written unless the whole series normalizes cleanly.
pub fn export_symbol(
    provider: &dyn DataProvider,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
    output_dir: &Path,
) -> Result<ExportedFile, TickerError> {
    let path = csv_path(output_dir, symbol)?;
    let fetched = provider.fetch(symbol, start, end)?;
    let bars = normalize(&fetched.bars)?;
    write_csv(&path, &bars)?;

    tracing::info!(
        symbol,
        provider = provider.name(),
        rows = bars.len(),
        path = %path.display(),
        "exported"
    );

    Ok(ExportedFile {
        symbol: symbol.to_string(),
        path,
        rows: bars.len(),
    })
}

#[allow(clippy::too_many_arguments)]
fn export_reported(
    provider: &dyn DataProvider,
    symbol: &str,
    index: usize,
    total: usize,
    start: NaiveDate,
    end: NaiveDate,
    output_dir: &Path,
    progress: &dyn ExportProgress,
) -> TickerOutcome {
    progress.on_start(symbol, index, total);
    let result = export_symbol(provider, symbol, start, end, output_dir);
    if let Err(e) = &result {
        tracing::debug!(symbol, error = %e, "export failed");
    }
    progress.on_complete(symbol, index, total, &result);
    TickerOutcome {
        symbol: symbol.to_string(),
        result,
    }
}

/// Export tickers one after another, in list order.
///
/// Duplicates are processed independently; the last one to succeed owns the file.
pub fn export_symbols(
    provider: &dyn DataProvider,
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    output_dir: &Path,
    progress: &dyn ExportProgress,
) -> ExportSummary {
    let total = symbols.len();
    let results = symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            export_reported(provider, symbol, i, total, start, end, output_dir, progress)
        })
        .collect();

    let summary = ExportSummary::from_results(results);
    progress.on_batch_complete(summary.succeeded, summary.failed, summary.total);
    summary
}

/// Export tickers on a dedicated pool of `jobs` threads.
///
/// Outcomes are returned in list order. Progress callbacks fire in completion
/// order.
pub fn export_symbols_parallel(
    provider: &dyn DataProvider,
    symbols: &[&str],
    start: NaiveDate,
    end: NaiveDate,
    output_dir: &Path,
    progress: &dyn ExportProgress,
    jobs: usize,
) -> Result<ExportSummary, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .thread_name(|i| format!("pricedump-export-{i}"))
        .build()?;

    let total = symbols.len();
    let results = pool.install(|| {
        symbols
            .par_iter()
            .enumerate()
            .map(|(i, symbol)| {
                export_reported(provider, symbol, i, total, start, end, output_dir, progress)
            })
            .collect::<Vec<_>>()
    });

    let summary = ExportSummary::from_results(results);
    progress.on_batch_complete(summary.succeeded, summary.failed, summary.total);
    Ok(summary)
}
