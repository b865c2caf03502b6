use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};

use wickscan_lib::commands;
use wickscan_lib::data::binance::BinanceProvider;
use wickscan_lib::data::loader::CsvProvider;
use wickscan_lib::errors::{AppError, ErrorResponse};
use wickscan_lib::models::config::AppConfig;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path to a JSON config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the traded symbol (e.g. "BTCUSDT")
    #[arg(long)]
    symbol: Option<String>,

    /// Override the EMA span
    #[arg(long)]
    ema_span: Option<usize>,

    /// Override the stop distance in quote currency
    #[arg(long)]
    stop_usd: Option<f64>,

    /// Override the take-profit multiple of the stop distance
    #[arg(long)]
    tp_factor: Option<f64>,

    /// Also write the JSON response to this file
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the service status
    Status,

    /// Fetch the latest candles and evaluate the wick-rejection rule
    Signal,

    /// Replay the rule over a stored CSV history
    Backtest {
        /// History file; overrides `history_csv` from the config
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the per-setup log to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig, AppError> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(symbol) = &self.symbol {
            config.source.symbol = symbol.clone();
        }
        if let Some(span) = self.ema_span {
            config.strategy.ema_span = span;
        }
        if let Some(stop) = self.stop_usd {
            config.strategy.stop_usd = stop;
        }
        if let Some(factor) = self.tp_factor {
            config.strategy.take_profit_factor = factor;
        }
        if let Commands::Backtest { csv: Some(csv), .. } = &self.command {
            config.history_csv = csv.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn emit<T: Serialize>(value: &T, report: Option<&Path>) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    if let Some(path) = report {
        commands::save_report(value, path)?;
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = cli.resolve_config()?;
    let report = cli.report.as_deref();

    match &cli.command {
        Commands::Status => emit(&commands::status(), report),
        Commands::Signal => {
            let provider = BinanceProvider::new(config.source.clone())?;
            let resp = commands::signal(&provider, &config.strategy).await?;
            emit(&resp, report)
        }
        Commands::Backtest { export, .. } => {
            let provider = CsvProvider::new(config.history_csv.clone());
            let resp = match export {
                Some(path) => {
                    commands::backtest_with_export(&provider, &config.strategy, path).await?
                }
                None => commands::backtest(&provider, &config.strategy).await?,
            };
            emit(&resp, report)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    wickscan_lib::init_tracing();
    info!("Starting wickscan");

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            let response = ErrorResponse::from(&e);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}
