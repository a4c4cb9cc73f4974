//! CLI integration tests for the chart command orchestration.
//!
//! Tests cover:
//! - Argument parsing
//! - Config loading from real INI files on disk
//! - Full pipeline with MockDataPort and a recording chart port
//! - End-to-end with CSV files in a temp directory

mod common;

use clap::Parser;
use common::*;
use stockdash::adapters::csv_adapter::CsvAdapter;
use stockdash::adapters::csv_chart_adapter::CsvChartAdapter;
use stockdash::cli::{self, Cli, Command};
use stockdash::domain::config_validation::{DashboardConfig, build_dashboard_config};
use stockdash::domain::error::StockdashError;
use stockdash::domain::indicator::IndicatorType;
use stockdash::domain::interval::Interval;
use stockdash::domain::series::SeriesKey;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[data]
data_dir = /tmp/stockdash-data
symbol = aapl
interval = 1d
start_date = 2024-01-01
end_date = 2024-12-31

[indicators]
sma = 5,20
ema = 10
rsi_window = 14
macd = true

[output]
path = aapl_chart.csv
"#;

fn config_for(symbol: &str, indicators: Vec<IndicatorType>) -> DashboardConfig {
    DashboardConfig {
        data_dir: PathBuf::from("/unused"),
        key: SeriesKey::new(symbol, Interval::Daily),
        start_date: date("2024-01-01"),
        end_date: date("2024-12-31"),
        indicators,
        output_path: None,
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn chart_with_overrides() {
        let cli = Cli::try_parse_from([
            "stockdash",
            "chart",
            "--config",
            "dash.ini",
            "--symbol",
            "msft",
            "--interval",
            "1h",
            "-o",
            "out.csv",
        ])
        .unwrap();

        assert_eq!(cli.log_level, "info");
        match cli.command {
            Command::Chart {
                config,
                symbol,
                interval,
                output,
                indicators,
                dry_run,
            } => {
                assert_eq!(config, PathBuf::from("dash.ini"));
                assert!(indicators.is_empty());
                assert_eq!(symbol.as_deref(), Some("msft"));
                assert_eq!(interval, Some(Interval::Hour1));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
                assert!(!dry_run);
            }
            other => panic!("expected chart command, got {:?}", other),
        }
    }

    #[test]
    fn repeated_indicator_flags() {
        let cli = Cli::try_parse_from([
            "stockdash",
            "chart",
            "-c",
            "dash.ini",
            "--indicator",
            "sma(10)",
            "--indicator",
            "MACD",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Command::Chart {
                indicators,
                dry_run,
                ..
            } => {
                assert!(dry_run);
                assert_eq!(
                    indicators,
                    vec![IndicatorType::Sma(10), IndicatorType::macd_default()]
                );
            }
            other => panic!("expected chart command, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_indicator_spec() {
        let result = Cli::try_parse_from([
            "stockdash",
            "chart",
            "-c",
            "dash.ini",
            "--indicator",
            "MACD(26,12,9)",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_log_level_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stockdash",
            "validate",
            "-c",
            "dash.ini",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn rejects_unknown_interval() {
        let result = Cli::try_parse_from([
            "stockdash",
            "list-symbols",
            "-c",
            "dash.ini",
            "--interval",
            "2d",
        ]);
        assert!(result.is_err());
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn loads_and_resolves_valid_file() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(file.path()).unwrap();
        let cfg = build_dashboard_config(&adapter, None, None).unwrap();

        assert_eq!(cfg.key, SeriesKey::new("AAPL", Interval::Daily));
        assert_eq!(cfg.start_date, date("2024-01-01"));
        assert_eq!(cfg.end_date, date("2024-12-31"));
        assert_eq!(cfg.output_path, Some(PathBuf::from("aapl_chart.csv")));
        assert_eq!(
            cfg.indicators,
            vec![
                IndicatorType::Sma(5),
                IndicatorType::Sma(20),
                IndicatorType::Ema(10),
                IndicatorType::Rsi(14),
                IndicatorType::macd_default(),
            ]
        );
    }

    #[test]
    fn cli_overrides_win() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(file.path()).unwrap();
        let cfg = build_dashboard_config(&adapter, Some("msft"), Some(Interval::Weekly)).unwrap();

        assert_eq!(cfg.key, SeriesKey::new("MSFT", Interval::Weekly));
    }

    #[test]
    fn indicator_overrides_replace_config_list() {
        let file = write_temp_ini(VALID_INI);
        let overrides = cli::ChartOverrides {
            symbol: Some("nvda"),
            interval: None,
            indicators: vec![IndicatorType::Ema(50)],
        };
        let cfg = cli::resolve_chart_config(file.path(), overrides).unwrap();

        assert_eq!(cfg.key.symbol, "NVDA");
        assert_eq!(cfg.indicators, vec![IndicatorType::Ema(50)]);
    }

    #[test]
    fn empty_overrides_keep_config_list() {
        let file = write_temp_ini(VALID_INI);
        let cfg = cli::resolve_chart_config(file.path(), cli::ChartOverrides::default()).unwrap();
        assert_eq!(cfg.indicators.len(), 5);
    }

    #[test]
    fn missing_file_is_config_parse_error() {
        let err = cli::load_config(Path::new("/nonexistent/stockdash.ini")).unwrap_err();
        assert!(matches!(err, StockdashError::ConfigParse { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reversed_dates_rejected() {
        let file = write_temp_ini(
            "[data]\ndata_dir = /tmp\nsymbol = AAPL\nstart_date = 2024-06-01\nend_date = 2024-01-01\n",
        );
        let adapter = cli::load_config(file.path()).unwrap();
        let err = build_dashboard_config(&adapter, None, None).unwrap_err();
        assert!(matches!(err, StockdashError::ConfigInvalid { .. }));
    }

    #[test]
    fn resolve_symbol_prefers_override() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(file.path()).unwrap();

        assert_eq!(cli::resolve_symbol(Some(" tsla "), &adapter).unwrap(), "TSLA");
        assert_eq!(cli::resolve_symbol(None, &adapter).unwrap(), "AAPL");
        assert_eq!(cli::resolve_symbol(Some("  "), &adapter).unwrap(), "AAPL");
    }

    #[test]
    fn resolve_interval_falls_back_to_config() {
        let file = write_temp_ini("[data]\ninterval = 1wk\n");
        let adapter = cli::load_config(file.path()).unwrap();

        assert_eq!(
            cli::resolve_interval(None, &adapter).unwrap(),
            Interval::Weekly
        );
        assert_eq!(
            cli::resolve_interval(Some(Interval::Minute5), &adapter).unwrap(),
            Interval::Minute5
        );
    }
}

mod pipeline {
    use super::*;

    fn default_indicators() -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(5),
            IndicatorType::Sma(20),
            IndicatorType::Ema(10),
            IndicatorType::Rsi(14),
            IndicatorType::macd_default(),
        ]
    }

    #[test]
    fn computes_all_columns_for_long_series() {
        let bars = make_daily_bars("2024-01-01", &rising_closes(100.0, 30));
        let data = MockDataPort::new().with_bars("AAPL", bars);
        let chart = RecordingChartPort::new();
        let cfg = config_for("AAPL", default_indicators());

        let run = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap();

        assert_eq!(run.frame.len(), 30);
        assert_eq!(
            run.frame.column_names(),
            vec![
                "SMA(5)",
                "SMA(20)",
                "EMA(10)",
                "RSI(14)",
                "MACD(12,26,9)",
                "MACD(12,26,9) signal",
                "MACD(12,26,9) histogram",
            ]
        );
        assert!(run.frame.skipped.is_empty());

        let sma5 = &run.frame.column("SMA(5)").unwrap().values;
        assert_eq!(sma5.get(3), None);
        assert_eq!(sma5.last(), Some(127.0));
        let rsi = &run.frame.column("RSI(14)").unwrap().values;
        assert_eq!(rsi.last(), Some(100.0));

        assert_eq!(run.summary.bar_count, 30);
        assert_eq!(run.summary.last_close, 129.0);
        assert_eq!(run.summary.change, Some(1.0));
        assert_eq!(run.output_path, PathBuf::from("AAPL_1d_chart.csv"));

        let written = chart.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, PathBuf::from("AAPL_1d_chart.csv"));
        assert_eq!(written[0].1.columns.len(), 7);
    }

    #[test]
    fn short_series_records_skipped_indicators() {
        let bars = make_daily_bars("2024-01-01", &rising_closes(100.0, 10));
        let data = MockDataPort::new().with_bars("AAPL", bars);
        let chart = RecordingChartPort::new();
        let cfg = config_for("AAPL", default_indicators());

        let run = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap();

        let skipped: Vec<IndicatorType> = run
            .frame
            .skipped
            .iter()
            .map(|s| s.indicator.clone())
            .collect();
        assert_eq!(skipped, vec![IndicatorType::Sma(20), IndicatorType::Rsi(14)]);
        assert!(run.frame.skipped[0].reason.contains("have 10 bars, need 20"));
        assert!(run.frame.column("SMA(5)").is_some());
        assert!(run.frame.column("MACD(12,26,9) histogram").is_some());

        let summary = cli::format_summary(&run);
        assert!(summary.contains("=== Skipped ==="));
        assert!(summary.contains("RSI(14)"));
    }

    #[test]
    fn output_override_beats_config_path() {
        let bars = make_daily_bars("2024-01-01", &rising_closes(100.0, 3));
        let data = MockDataPort::new().with_bars("AAPL", bars);
        let chart = RecordingChartPort::new();
        let mut cfg = config_for("AAPL", vec![IndicatorType::Sma(2)]);
        cfg.output_path = Some(PathBuf::from("from_config.csv"));

        let run = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap();
        assert_eq!(run.output_path, PathBuf::from("from_config.csv"));

        let run =
            cli::run_chart_pipeline(&data, &chart, &cfg, Some(Path::new("override.csv"))).unwrap();
        assert_eq!(run.output_path, PathBuf::from("override.csv"));
    }

    #[test]
    fn missing_symbol_is_no_data() {
        let data = MockDataPort::new();
        let chart = RecordingChartPort::new();
        let cfg = config_for("AAPL", default_indicators());

        let err = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap_err();
        assert!(matches!(err, StockdashError::NoData { .. }));
        assert_eq!(err.exit_code(), 5);
        assert!(chart.written.borrow().is_empty());
    }

    #[test]
    fn data_port_error_propagates() {
        let data = MockDataPort::new().with_error("AAPL", "connection refused");
        let chart = RecordingChartPort::new();
        let cfg = config_for("AAPL", default_indicators());

        let err = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap_err();
        assert!(matches!(err, StockdashError::Data { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn duplicate_timestamps_are_malformed() {
        let bars = vec![
            make_bar("2024-01-02", 100.0),
            make_bar("2024-01-02", 101.0),
        ];
        let data = MockDataPort::new().with_bars("AAPL", bars);
        let chart = RecordingChartPort::new();
        let cfg = config_for("AAPL", vec![IndicatorType::Sma(2)]);

        let err = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap_err();
        assert!(matches!(err, StockdashError::MalformedInput { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn bars_outside_range_are_excluded() {
        let bars = make_daily_bars("2023-12-25", &rising_closes(100.0, 14));
        let data = MockDataPort::new().with_bars("AAPL", bars);
        let chart = RecordingChartPort::new();
        let cfg = config_for("AAPL", vec![IndicatorType::Sma(3)]);

        let run = cli::run_chart_pipeline(&data, &chart, &cfg, None).unwrap();
        assert_eq!(run.summary.bar_count, 7);
        assert_eq!(run.summary.first_timestamp.date(), date("2024-01-01"));
    }
}

mod end_to_end {
    use super::*;
    use std::fs;
    use stockdash::ports::data_port::DataPort;

    fn write_csv(dir: &Path, name: &str, closes: &[f64]) {
        let mut content = String::from("timestamp,open,high,low,close,volume\n");
        for bar in make_daily_bars("2024-03-01", closes) {
            content.push_str(&format!(
                "{},{},{},{},{},{}\n",
                bar.timestamp.format("%Y-%m-%d"),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            ));
        }
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn csv_in_csv_out() {
        let dir = tempfile::TempDir::new().unwrap();
        write_csv(dir.path(), "SPY_1d.csv", &rising_closes(400.0, 20));

        let ini = format!(
            "[data]\ndata_dir = {}\nsymbol = SPY\nstart_date = 2024-01-01\nend_date = 2024-12-31\n\n\
             [indicators]\nsma = 3\nrsi_window = 0\nmacd = false\n",
            dir.path().display()
        );
        let file = write_temp_ini(&ini);
        let adapter = cli::load_config(file.path()).unwrap();
        let cfg = build_dashboard_config(&adapter, None, None).unwrap();
        assert_eq!(cfg.indicators, vec![IndicatorType::Sma(3)]);

        let data = CsvAdapter::new(cfg.data_dir.clone());
        let chart = CsvChartAdapter::new();
        let out = dir.path().join("spy_chart.csv");

        let run = cli::run_chart_pipeline(&data, &chart, &cfg, Some(&out)).unwrap();
        assert_eq!(run.frame.len(), 20);

        let content = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(lines[0], "timestamp,open,high,low,close,volume,SMA(3)");
        assert!(lines[1].ends_with(','));
        assert!(lines[3].starts_with("2024-03-03,402,"));
        assert!(lines[3].ends_with(",401"));

        assert_eq!(data.list_symbols(Interval::Daily).unwrap(), vec!["SPY"]);
    }
}
