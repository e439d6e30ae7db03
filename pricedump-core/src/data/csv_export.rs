//! Headerless CSV output, one file per ticker.
//!
//! Each line is `date,open,high,low,close` with the date as integer epoch
//! seconds and prices in shortest round-trip decimal form.

use super::adjust::NormalizedBar;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from writing a ticker's CSV file.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("symbol '{0}' cannot be used as a file name")]
    InvalidSymbol(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode CSV for {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Destination file for a symbol: `<dir>/<SYMBOL>.csv`.
pub fn csv_path(dir: &Path, symbol: &str) -> Result<PathBuf, WriteError> {
    if symbol.is_empty()
        || symbol == "."
        || symbol == ".."
        || symbol.contains(['/', '\\'])
    {
        return Err(WriteError::InvalidSymbol(symbol.to_string()));
    }
    Ok(dir.join(format!("{symbol}.csv")))
}

/// Write bars to `path`, replacing any existing file. An empty slice yields an empty file.
pub fn write_csv(path: &Path, bars: &[NormalizedBar]) -> Result<(), WriteError> {
    let file = std::fs::File::create(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    for bar in bars {
        writer
            .serialize(bar)
            .map_err(|source| encode_error(path, source))?;
    }

    writer.flush().map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Split I/O failures surfaced through the csv writer from encoding failures.
fn encode_error(path: &Path, source: csv::Error) -> WriteError {
    let path = path.to_path_buf();
    match source.kind() {
        csv::ErrorKind::Io(io) => WriteError::Io {
            path,
            source: std::io::Error::new(io.kind(), io.to_string()),
        },
        _ => WriteError::Csv { path, source },
    }
}
