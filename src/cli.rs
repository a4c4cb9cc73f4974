//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_chart_adapter::CsvChartAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::chart_frame::ChartFrame;
use crate::domain::config_validation::{DashboardConfig, build_dashboard_config, parse_interval};
use crate::domain::error::StockdashError;
use crate::domain::indicator::IndicatorType;
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::interval::Interval;
use crate::domain::series::{PriceSeries, SeriesKey};
use crate::domain::summary::SeriesSummary;
use crate::logging::setup_logging;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stockdash", about = "Technical indicators for stock charts")]
pub struct Cli {
    /// Log filter, e.g. `info` or `stockdash=debug` (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators and write the chart frame
    Chart {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        interval: Option<Interval>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Indicator such as `SMA(20)` or `MACD(12,26,9)`; replaces the configured list
        #[arg(long = "indicator", value_name = "SPEC")]
        indicators: Vec<IndicatorType>,
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols with data for an interval
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        interval: Option<Interval>,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        interval: Option<Interval>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Result of one chart run, returned for printing and testing.
#[derive(Debug, Clone)]
pub struct ChartRun {
    pub summary: SeriesSummary,
    pub frame: ChartFrame,
    pub output_path: PathBuf,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct ChartOverrides<'a> {
    pub symbol: Option<&'a str>,
    pub interval: Option<Interval>,
    pub indicators: Vec<IndicatorType>,
}

pub fn run(cli: Cli) -> ExitCode {
    setup_logging(&cli.log_level);

    let result = match cli.command {
        Command::Chart {
            config,
            symbol,
            interval,
            output,
            indicators,
            dry_run,
        } => {
            let overrides = ChartOverrides {
                symbol: symbol.as_deref(),
                interval,
                indicators,
            };
            if dry_run {
                run_dry_run(&config, overrides)
            } else {
                run_chart(&config, overrides, output.as_deref())
            }
        }
        Command::ListSymbols { config, interval } => run_list_symbols(&config, interval),
        Command::Info {
            config,
            symbol,
            interval,
        } => run_info(&config, symbol.as_deref(), interval),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StockdashError> {
    tracing::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| StockdashError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Loads and validates the config, then applies the command-line overrides.
pub fn resolve_chart_config(
    config_path: &Path,
    overrides: ChartOverrides<'_>,
) -> Result<DashboardConfig, StockdashError> {
    let adapter = load_config(config_path)?;
    let mut cfg = build_dashboard_config(&adapter, overrides.symbol, overrides.interval)?;
    if !overrides.indicators.is_empty() {
        tracing::debug!("Replacing configured indicators with command-line list");
        cfg.indicators = overrides.indicators;
    }
    Ok(cfg)
}

fn run_chart(
    config_path: &Path,
    overrides: ChartOverrides<'_>,
    output: Option<&Path>,
) -> Result<(), StockdashError> {
    let cfg = resolve_chart_config(config_path, overrides)?;

    let data_port = CsvAdapter::new(cfg.data_dir.clone());
    let chart_port = CsvChartAdapter::new();

    let chart_run = run_chart_pipeline(&data_port, &chart_port, &cfg, output)?;
    println!("{}", format_summary(&chart_run));
    Ok(())
}

/// Fetch, validate, compute, assemble and write. Indicators that cannot be
/// computed are recorded in the frame rather than failing the run.
pub fn run_chart_pipeline(
    data_port: &dyn DataPort,
    chart_port: &dyn ChartPort,
    cfg: &DashboardConfig,
    output_override: Option<&Path>,
) -> Result<ChartRun, StockdashError> {
    let key = &cfg.key;

    tracing::info!(
        "Fetching {} from {} to {}",
        key,
        cfg.start_date,
        cfg.end_date
    );
    let bars = data_port.fetch_bars(&key.symbol, key.interval, cfg.start_date, cfg.end_date)?;
    if bars.is_empty() {
        return Err(no_data(key));
    }

    let series = PriceSeries::new(key.clone(), bars)?;
    tracing::info!("Computing {} indicators over {} bars", cfg.indicators.len(), series.len());

    let computed = compute_indicators(&series.closes(), &cfg.indicators);
    let frame = ChartFrame::build(&series, computed);
    let summary = SeriesSummary::compute(&series).ok_or_else(|| no_data(key))?;

    let output_path = output_override
        .map(Path::to_path_buf)
        .or_else(|| cfg.output_path.clone())
        .unwrap_or_else(|| default_output_path(key));
    chart_port.write(&frame, &output_path)?;

    Ok(ChartRun {
        summary,
        frame,
        output_path,
    })
}

pub fn default_output_path(key: &SeriesKey) -> PathBuf {
    PathBuf::from(format!("{}_{}_chart.csv", key.symbol, key.interval))
}

fn no_data(key: &SeriesKey) -> StockdashError {
    StockdashError::NoData {
        symbol: key.symbol.clone(),
        interval: key.interval.to_string(),
    }
}

pub fn format_summary(run: &ChartRun) -> String {
    let s = &run.summary;
    let mut lines = vec![
        format!("=== {} ({}) ===", s.symbol, s.interval),
        format!(
            "Bars:        {} ({} to {})",
            s.bar_count, s.first_timestamp, s.last_timestamp
        ),
        format!("Last Close:  {:.2}", s.last_close),
    ];

    match (s.change, s.change_pct) {
        (Some(change), Some(pct)) => {
            lines.push(format!("Change:      {:+.2} ({:+.2}%)", change, pct * 100.0))
        }
        (Some(change), None) => lines.push(format!("Change:      {:+.2}", change)),
        _ => lines.push("Change:      n/a".to_string()),
    }
    lines.push(format!("High:        {:.2}", s.period_high));
    lines.push(format!("Low:         {:.2}", s.period_low));
    lines.push(format!("Volume:      {:.0}", s.total_volume));

    if !run.frame.columns.is_empty() {
        lines.push(String::new());
        lines.push("=== Latest Indicator Values ===".to_string());
        for column in &run.frame.columns {
            let value = column
                .values
                .last()
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "n/a".to_string());
            lines.push(format!("  {}: {}", column.name, value));
        }
    }

    if !run.frame.skipped.is_empty() {
        lines.push(String::new());
        lines.push("=== Skipped ===".to_string());
        for skipped in &run.frame.skipped {
            lines.push(format!("  {}: {}", skipped.indicator, skipped.reason));
        }
    }

    lines.push(String::new());
    lines.push(format!("Chart data written to: {}", run.output_path.display()));
    lines.join("\n")
}

fn run_dry_run(config_path: &Path, overrides: ChartOverrides<'_>) -> Result<(), StockdashError> {
    let cfg = resolve_chart_config(config_path, overrides)?;

    println!("Series:     {}", cfg.key);
    println!("Range:      {} to {}", cfg.start_date, cfg.end_date);
    println!("Data dir:   {}", cfg.data_dir.display());
    println!("Indicators:");
    for indicator in &cfg.indicators {
        println!("  {} (needs {} bars)", indicator, indicator.min_bars());
    }
    println!("\nDry run complete: configuration is valid");
    Ok(())
}

fn data_dir(config: &dyn ConfigPort) -> Result<PathBuf, StockdashError> {
    config
        .get_non_empty("data", "data_dir")
        .map(PathBuf::from)
        .ok_or_else(|| StockdashError::ConfigMissing {
            section: "data".into(),
            key: "data_dir".into(),
        })
}

pub fn resolve_interval(
    interval: Option<Interval>,
    config: &dyn ConfigPort,
) -> Result<Interval, StockdashError> {
    match interval {
        Some(i) => Ok(i),
        None => parse_interval(config),
    }
}

pub fn resolve_symbol(
    symbol: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, StockdashError> {
    symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .or_else(|| config.get_non_empty("data", "symbol").map(|s| s.to_uppercase()))
        .ok_or_else(|| StockdashError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })
}

fn run_list_symbols(config_path: &Path, interval: Option<Interval>) -> Result<(), StockdashError> {
    let config = load_config(config_path)?;
    let interval = resolve_interval(interval, &config)?;
    let adapter = CsvAdapter::new(data_dir(&config)?);

    let symbols = adapter.list_symbols(interval)?;
    if symbols.is_empty() {
        tracing::warn!("No symbols found for interval {}", interval);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        tracing::info!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(
    config_path: &Path,
    symbol: Option<&str>,
    interval: Option<Interval>,
) -> Result<(), StockdashError> {
    let config = load_config(config_path)?;
    let key = SeriesKey::new(
        &resolve_symbol(symbol, &config)?,
        resolve_interval(interval, &config)?,
    );
    let adapter = CsvAdapter::new(data_dir(&config)?);

    match adapter.get_data_range(&key.symbol, key.interval)? {
        Some((first, last, count)) => {
            println!("{}: {} bars, {} to {}", key, count, first, last);
            Ok(())
        }
        None => Err(no_data(&key)),
    }
}

fn run_validate(config_path: &Path) -> Result<(), StockdashError> {
    let config = load_config(config_path)?;
    let cfg = build_dashboard_config(&config, None, None)?;

    println!("Series:     {}", cfg.key);
    println!(
        "Indicators: {}",
        cfg.indicators
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("\nConfiguration is valid.");
    Ok(())
}
