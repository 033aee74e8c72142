//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvBarSource;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest as run_simulation, BacktestConfig};
use crate::domain::config_validation::{parse_date, parse_instruments, validate_backtest_config};
use crate::domain::error::BarsimError;
use crate::domain::feed::DataFeed;
use crate::domain::strategy::BuyAndHold;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::BarSource;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "barsim", about = "Event-driven bar replay backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Write the equity curve to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the configured instrument list (comma-separated)
        #[arg(long)]
        instruments: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Show available data ranges per instrument
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        instrument: Option<String>,
    },
    /// Validate a backtest configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            instruments,
            dry_run,
        } => run_backtest(&config, output.as_deref(), instruments.as_deref(), dry_run),
        Command::Info { config, instrument } => run_info(&config, instrument.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &std::path::Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = BarsimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, BarsimError> {
    let start_date = parse_date(
        adapter.get_string("backtest", "start_date").as_deref(),
        "start_date",
    )?;
    let end_date = parse_date(
        adapter.get_string("backtest", "end_date").as_deref(),
        "end_date",
    )?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        initial_cash: adapter.get_double("backtest", "initial_cash", 1_000_000.0),
        order_quantity: adapter.get_int("backtest", "order_quantity", 100),
        commission_rate: adapter.get_double("commission", "rate", 0.005),
        commission_minimum: adapter.get_double("commission", "minimum", 1.0),
        commission_max_pct: adapter.get_double("commission", "max_pct", 0.01),
    })
}

pub fn resolve_instruments(
    adapter: &dyn ConfigPort,
    override_list: Option<&str>,
) -> Result<Vec<String>, BarsimError> {
    let raw = match override_list {
        Some(list) => list.to_string(),
        None => adapter
            .get_string("data", "instruments")
            .ok_or_else(|| BarsimError::ConfigMissing {
                section: "data".to_string(),
                key: "instruments".to_string(),
            })?,
    };
    parse_instruments(&raw)
}

pub fn run_backtest(
    config_path: &std::path::Path,
    output_path: Option<&std::path::Path>,
    instrument_override: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let instruments = match resolve_instruments(&adapter, instrument_override) {
        Ok(list) => list,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if dry_run {
        eprintln!(
            "Dry run: {} instruments, {} to {}, {:.2} starting cash",
            instruments.len(),
            bt_config.start_date,
            bt_config.end_date,
            bt_config.initial_cash
        );
        return ExitCode::SUCCESS;
    }

    let csv_dir = match adapter.get_string("data", "csv_dir") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let err = BarsimError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let source = CsvBarSource::new(csv_dir);

    let mut series = HashMap::new();
    for instrument in &instruments {
        let bars =
            match source.fetch_bars(instrument, bt_config.start_date, bt_config.end_date) {
                Ok(bars) => bars,
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            };
        eprintln!("Loaded {} bars for {instrument}", bars.len());
        series.insert(instrument.clone(), bars);
    }

    let feed = match DataFeed::new(series) {
        Ok(feed) => feed,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut strategy = BuyAndHold::new();
    let result = match run_simulation(feed, &mut strategy, &bt_config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("Ticks replayed:    {}", result.ticks);
    println!("Final cash:        {:.2}", result.portfolio.cash);
    println!(
        "Commissions paid:  {:.2}",
        result.portfolio.commissions_paid
    );
    println!("Final equity:      {:.2}", result.portfolio.total_equity());
    for instrument in &instruments {
        let position = result.portfolio.position(instrument);
        if position != 0 {
            println!("Position {instrument}: {position}");
        }
    }

    if let Some(path) = output_path {
        if let Err(e) = CsvReportAdapter.write(&result, path) {
            eprintln!("error: {e}");
            return (&e).into();
        }
        eprintln!("Wrote equity curve to {}", path.display());
    }

    ExitCode::SUCCESS
}

pub fn run_info(config_path: &std::path::Path, instrument: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let csv_dir = match adapter.get_string("data", "csv_dir") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let err = BarsimError::ConfigMissing {
                section: "data".to_string(),
                key: "csv_dir".to_string(),
            };
            eprintln!("error: {err}");
            return (&err).into();
        }
    };
    let source = CsvBarSource::new(csv_dir);

    let instruments = match instrument {
        Some(i) => vec![i.to_uppercase()],
        None => match source.list_instruments() {
            Ok(list) => list,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        },
    };

    for instrument in instruments {
        match source.data_range(&instrument) {
            Ok(Some((first, last, count))) => {
                println!("{instrument}: {count} bars, {first} to {last}");
            }
            Ok(None) => println!("{instrument}: no data"),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    ExitCode::SUCCESS
}

pub fn run_validate(config_path: &std::path::Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    match validate_backtest_config(&adapter) {
        Ok(()) => {
            println!("Configuration OK");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
