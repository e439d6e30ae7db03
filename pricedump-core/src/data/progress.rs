//! Progress callbacks for multi-ticker exports.

use super::export::{ExportedFile, TickerError};

/// Progress callback for batch exports.
///
/// Shared across worker threads when exporting in parallel.
pub trait ExportProgress: Send + Sync {
    /// Called when starting a ticker.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a ticker finishes, successfully or not.
    fn on_complete(
        &self,
        symbol: &str,
        index: usize,
        total: usize,
        result: &Result<ExportedFile, TickerError>,
    );

    /// Called once the whole batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Console reporter: one line per ticker plus a batch summary.
pub struct StdoutProgress;

impl ExportProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<ExportedFile, TickerError>,
    ) {
        match result {
            Ok(file) => println!("Saved data for {symbol} to {}", file.path.display()),
            Err(e) => eprintln!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nExport complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Reporter that prints nothing.
pub struct SilentProgress;

impl ExportProgress for SilentProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _result: &Result<ExportedFile, TickerError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
