//! Command-line runner: value one company from a JSON request file.

use std::path::PathBuf;

use clap::Parser;
use zero_common::logging::init_logging;
use zero_common::{Config, Error, Result};
use zero_valuation::{ValuationEngine, ValuationRequest};

/// Multi-model fair value for one company.
#[derive(Parser, Debug)]
#[command(name = "zero-valuation")]
#[command(version = "0.1.0")]
#[command(about = "Estimate a fair price range from financial statements.", long_about = None)]
struct Cli {
    /// Request file (statements, quotes, assumptions)
    request: PathBuf,

    /// Config file (defaults to ~/.zero/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        // no-op when the configured subscriber is already installed
        init_logging("info", "pretty");
        tracing::error!(error = %err, "Valuation failed");
        std::process::exit(err.exit_code());
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path).map(|mut config| {
            config.apply_env_overrides();
            config
        }),
        None => Config::load_with_env(),
    };
    config.map_err(|err| Error::Config(format!("{err:#}")))
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    init_logging(&config.observability.log_level, &config.observability.log_format);
    config
        .validate()
        .map_err(|err| Error::Config(err.to_string()))?;

    let request = ValuationRequest::from_path(&cli.request)?;
    tracing::debug!(
        path = %cli.request.display(),
        ticker = %request.financials.ticker,
        years = request.financials.years.len(),
        "Loaded valuation request"
    );

    let engine = ValuationEngine::from_settings(&config.valuation);
    let result = engine.calculate_all_prices(&request.input())?;

    let output = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{output}");

    Ok(())
}
