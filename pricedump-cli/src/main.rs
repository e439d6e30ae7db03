//! pricedump CLI: fetch daily prices, adjust them, and write one CSV per ticker.
//!
//! Commands:
//! - `export` (default): download each ticker from Yahoo Finance, apply the
//!   adjusted-close scaling, and write `<TICKER>.csv`
//! - `backtest`: run an equal-weight portfolio over previously exported files
//! - `default-config`: print the built-in configuration as TOML
//!
//! Running with no arguments exports the built-in ticker list for
//! 2020-01-01..2024-12-31 into the current directory.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use pricedump_core::backtest::backtest_dir;
use pricedump_core::data::{
    export_symbols, export_symbols_parallel, ExportProgress, SilentProgress, StdoutProgress,
    YahooProvider,
};
use pricedump_core::ExportConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Backoff before the first retry; doubles on each further attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Log filter when `RUST_LOG` is unset. Progress lines go to stdout; logs only carry problems.
const DEFAULT_LOG_FILTER: &str = "pricedump=warn,pricedump_core=warn";

#[derive(Parser)]
#[command(
    name = "pricedump",
    version,
    about = "Download adjusted daily prices and write one CSV per ticker"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, adjust, and export daily prices (default command).
    Export(ExportArgs),
    /// Backtest an equal-weight portfolio over exported CSV files.
    Backtest(BacktestArgs),
    /// Print the default configuration as TOML.
    DefaultConfig,
}

#[derive(Args, Debug, Default)]
struct ExportArgs {
    /// Tickers to export (e.g., SPY QQQ AAPL). Overrides the configured list.
    symbols: Vec<String>,

    /// TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start date (YYYY-MM-DD), inclusive.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), exclusive.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Directory for the CSV files. Created if missing.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Worker threads; 1 exports sequentially.
    #[arg(long)]
    jobs: Option<usize>,

    /// Retries per ticker on rate limits and transient network errors.
    #[arg(long)]
    retries: Option<u32>,

    /// Suppress per-ticker progress output.
    #[arg(long, short, default_value_t = false)]
    quiet: bool,
}

#[derive(Args, Debug, Default)]
struct BacktestArgs {
    /// Tickers to include. Overrides the configured list.
    symbols: Vec<String>,

    /// TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `<TICKER>.csv` files (default: the configured output directory).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Starting portfolio value.
    #[arg(long)]
    initial_capital: Option<f64>,

    /// Rebalance every N trading days.
    #[arg(long)]
    rebalance_every: Option<usize>,

    /// Annual risk-free rate for the Sharpe ratio (0.01 = 1%).
    #[arg(long)]
    risk_free_rate: Option<f64>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Export(ExportArgs::default())) {
        Commands::Export(args) => {
            let quiet = args.quiet;
            let config = resolve_config(args)?;
            run_export(&config, quiet)
        }
        Commands::Backtest(args) => {
            let config = resolve_backtest_config(args)?;
            run_backtest(&config)
        }
        Commands::DefaultConfig => {
            print!("{}", ExportConfig::default().to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file (or defaults) with command-line overrides applied, validated.
fn resolve_config(args: ExportArgs) -> Result<ExportConfig> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::from_file(path)?,
        None => ExportConfig::default(),
    };

    if !args.symbols.is_empty() {
        config.tickers = args.symbols;
    }
    if let Some(start) = args.start {
        config.start_date = start;
    }
    if let Some(end) = args.end {
        config.end_date = end;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(retries) = args.retries {
        config.max_retries = retries;
    }

    config.validate()?;
    Ok(config)
}

/// Config file (or defaults) with backtest overrides applied, validated.
fn resolve_backtest_config(args: BacktestArgs) -> Result<ExportConfig> {
    let mut config = match &args.config {
        Some(path) => ExportConfig::from_file(path)?,
        None => ExportConfig::default(),
    };

    if !args.symbols.is_empty() {
        config.tickers = args.symbols;
    }
    if let Some(dir) = args.data_dir {
        config.output_dir = dir;
    }
    if let Some(capital) = args.initial_capital {
        config.backtest.initial_capital = capital;
    }
    if let Some(every) = args.rebalance_every {
        config.backtest.rebalance_every = every;
    }
    if let Some(rate) = args.risk_free_rate {
        config.backtest.risk_free_rate = rate;
    }

    config.validate()?;
    Ok(config)
}

fn run_backtest(config: &ExportConfig) -> Result<()> {
    let symbols = config.symbols();
    let report = backtest_dir(&config.output_dir, &symbols, &config.backtest)
        .with_context(|| format!("backtest over {}", config.output_dir.display()))?;
    println!("{report}");
    Ok(())
}

fn run_export(config: &ExportConfig, quiet: bool) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "create output directory {}",
            config.output_dir.display()
        )
    })?;

    let provider = YahooProvider::new()?
        .with_retries(config.max_retries, RETRY_BASE_DELAY);
    let progress: &dyn ExportProgress = if quiet {
        &SilentProgress
    } else {
        &StdoutProgress
    };

    let symbols = config.symbols();
    tracing::debug!(
        tickers = symbols.len(),
        start = %config.start_date,
        end = %config.end_date,
        jobs = config.jobs,
        "starting export"
    );

    let summary = if config.jobs > 1 {
        export_symbols_parallel(
            &provider,
            &symbols,
            config.start_date,
            config.end_date,
            &config.output_dir,
            progress,
            config.jobs,
        )?
    } else {
        export_symbols(
            &provider,
            &symbols,
            config.start_date,
            config.end_date,
            &config.output_dir,
            progress,
        )
    };

    if !summary.all_succeeded() {
        for (sym, err) in summary.errors() {
            eprintln!("Error for {sym}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}
