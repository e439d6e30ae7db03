//! Data retrieval, adjustment, and export

pub mod adjust;
pub mod csv_export;
pub mod export;
pub mod progress;
pub mod provider;
pub mod yahoo;

pub use adjust::{epoch_seconds, normalize, normalize_bar, AdjustError, NormalizedBar};
pub use csv_export::{csv_path, write_csv, WriteError};
pub use export::{
    export_symbol, export_symbols, export_symbols_parallel, ExportSummary, ExportedFile,
    TickerError, TickerOutcome,
};
pub use progress::{ExportProgress, SilentProgress, StdoutProgress};
pub use provider::{DataError, DataProvider, FetchResult, RawBar};
pub use yahoo::YahooProvider;
