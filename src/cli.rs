//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvLevelAdapter, CsvPriceAdapter, OUTPUT_DATE_FORMAT};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{parse_config_date, require_non_empty, validate_run_config};
use crate::domain::engine::{IndexEngine, IndexSummary};
use crate::domain::error::IndexError;
use crate::domain::run_config::{RunConfig, DEFAULT_TICKER_PREFIX};
use crate::ports::config_port::ConfigPort;
use crate::ports::level_port::LevelPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "index-model", about = "Monthly-rebalanced top-3 equity index calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate index levels and export them
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        prices: Option<PathBuf>,
        /// First date of the window (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last date of the window (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also write the rebalance selection trail
        #[arg(long)]
        trail: Option<PathBuf>,
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Show the price table's range, tickers and rebalance calendar
    Info {
        #[arg(short, long)]
        prices: PathBuf,
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// CLI flags that take precedence over config file values.
#[derive(Debug, Default, Clone)]
pub struct RunOverrides {
    pub prices: Option<PathBuf>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub output: Option<PathBuf>,
    pub trail: Option<PathBuf>,
    pub prefix: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            prices,
            start,
            end,
            output,
            trail,
            prefix,
        } => {
            let overrides = RunOverrides {
                prices,
                start,
                end,
                output,
                trail,
                prefix,
            };
            run_calculation(config.as_ref(), &overrides)
        }
        Command::Info { prices, prefix } => run_info(&prices, prefix.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = IndexError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn apply_overrides(adapter: &mut FileConfigAdapter, overrides: &RunOverrides) {
    if let Some(p) = &overrides.prices {
        adapter.set("data", "prices_path", &p.display().to_string());
    }
    if let Some(prefix) = &overrides.prefix {
        adapter.set("data", "ticker_prefix", prefix);
    }
    if let Some(start) = &overrides.start {
        adapter.set("index", "start_date", start);
    }
    if let Some(end) = &overrides.end {
        adapter.set("index", "end_date", end);
    }
    if let Some(p) = &overrides.output {
        adapter.set("export", "output_path", &p.display().to_string());
    }
    if let Some(p) = &overrides.trail {
        adapter.set("export", "trail_path", &p.display().to_string());
    }
}

pub fn build_run_config(adapter: &dyn ConfigPort) -> Result<RunConfig, IndexError> {
    let prices_path = require_non_empty(adapter, "data", "prices_path")?;
    let ticker_prefix = adapter
        .get_string("data", "ticker_prefix")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TICKER_PREFIX.to_string());
    let start_date = parse_config_date(adapter, "index", "start_date")?;
    let end_date = parse_config_date(adapter, "index", "end_date")?;
    let output_path = require_non_empty(adapter, "export", "output_path")?;
    let trail_path = adapter
        .get_string("export", "trail_path")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from);

    Ok(RunConfig {
        prices_path: PathBuf::from(prices_path),
        ticker_prefix,
        start_date,
        end_date,
        output_path: PathBuf::from(output_path),
        trail_path,
    })
}

/// Load prices, walk the window and export. Returns the run summary.
pub fn run_index(
    config: &RunConfig,
    prices: &dyn PricePort,
    sink: &dyn LevelPort,
) -> Result<IndexSummary, IndexError> {
    let mut engine = IndexEngine::from_port(prices)?;
    eprintln!(
        "  Loaded {} trading days, {} tickers",
        engine.table().len(),
        engine.table().tickers().len()
    );

    eprintln!(
        "Calculating index: {} to {}",
        config.start_date, config.end_date
    );
    engine.calc_index_level(config.start_date, config.end_date)?;

    engine.export_values(sink, &config.output_path)?;
    eprintln!("Index levels written to: {}", config.output_path.display());

    if let Some(trail_path) = &config.trail_path {
        engine.export_selection_trail(sink, trail_path)?;
        eprintln!("Selection trail written to: {}", trail_path.display());
    }

    engine.summary().ok_or(IndexError::NotCalculated)
}

fn run_calculation(config_path: Option<&PathBuf>, overrides: &RunOverrides) -> ExitCode {
    // Stage 1: Load config and layer CLI flags on top
    let mut adapter = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(a) => a,
                Err(code) => return code,
            }
        }
        None => FileConfigAdapter::empty(),
    };
    apply_overrides(&mut adapter, overrides);

    // Stage 2: Validate and build run parameters
    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let config = match build_run_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 3: Calculate and export
    eprintln!("Loading prices from {}", config.prices_path.display());
    let prices = CsvPriceAdapter::new(config.prices_path.clone(), config.ticker_prefix.clone());
    let summary = match run_index(&config, &prices, &CsvLevelAdapter) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Console summary
    eprintln!("\n=== Index Summary ===");
    eprintln!("Trading Days:     {}", summary.trading_days);
    eprintln!("Rebalances:       {}", summary.rebalances);
    eprintln!("First Level:      {:.2}", summary.first_level);
    eprintln!("Last Level:       {:.2}", summary.last_level);
    eprintln!("Total Return:     {:.2}%", summary.total_return * 100.0);
    ExitCode::SUCCESS
}

fn run_info(prices_path: &Path, prefix: Option<&str>) -> ExitCode {
    let prices = CsvPriceAdapter::new(
        prices_path.to_path_buf(),
        prefix.unwrap_or(DEFAULT_TICKER_PREFIX),
    );
    let engine = match IndexEngine::from_port(&prices) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for line in describe_engine(&engine) {
        println!("{}", line);
    }
    ExitCode::SUCCESS
}

/// Human-readable listing of the loaded table and its rebalance calendar.
pub fn describe_engine(engine: &IndexEngine) -> Vec<String> {
    let table = engine.table();
    let mut lines = Vec::new();

    match (table.first_date(), table.last_date()) {
        (Some(first), Some(last)) => lines.push(format!(
            "{} trading days, {} to {}",
            table.len(),
            first.format(OUTPUT_DATE_FORMAT),
            last.format(OUTPUT_DATE_FORMAT)
        )),
        _ => lines.push("no trading days".to_string()),
    }
    lines.push(format!("tickers: {}", table.tickers().join(", ")));
    lines.push("rebalance dates (snapshot):".to_string());
    for &marker in engine.markers() {
        let snapshot = engine
            .snapshot_for(marker)
            .map(|d| d.format(OUTPUT_DATE_FORMAT).to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  {} ({})",
            marker.format(OUTPUT_DATE_FORMAT),
            snapshot
        ));
    }
    lines
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_run_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    match build_run_config(&adapter) {
        Ok(config) => {
            eprintln!("  prices:  {}", config.prices_path.display());
            eprintln!("  tickers: {}*", config.ticker_prefix);
            eprintln!("  window:  {} to {}", config.start_date, config.end_date);
            eprintln!("  output:  {}", config.output_path.display());
            if let Some(trail) = &config.trail_path {
                eprintln!("  trail:   {}", trail.display());
            }
            eprintln!("\nRun configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
