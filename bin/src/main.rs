//! Tasador CLI binary.
//!
//! Provides a command-line interface for the three-stage DCF fair value model.

mod cmd;
mod data;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasador")]
#[command(about = "Three-stage DCF fair value model for equities", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the fair value of one symbol
    Value {
        /// Ticker symbol
        symbol: String,

        /// Valuation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Short-term growth rate, years 1-5 (defaults to 0.14)
        #[arg(long, allow_negative_numbers = true)]
        short: Option<f64>,

        /// Medium-term growth rate, years 6-10 (defaults to half the short-term rate)
        #[arg(long, allow_negative_numbers = true)]
        medium: Option<f64>,

        /// Long-term growth rate, years 11-20 (defaults to 0.04)
        #[arg(long, allow_negative_numbers = true)]
        long: Option<f64>,

        /// Show the year-by-year projection
        #[arg(short, long)]
        breakdown: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Value every symbol in a universe CSV
    Batch {
        /// Input CSV with Symbol, Sector and EPS Next 5Y columns
        #[arg(short, long, default_value = "StockUniverse.csv")]
        input: PathBuf,

        /// Output CSV
        #[arg(short, long, default_value = "StockUniverseWithDCF.csv")]
        output: PathBuf,

        /// Valuation date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,

        /// Long-term growth rate applied to every symbol (defaults to 0.04)
        #[arg(long, allow_negative_numbers = true)]
        long_term: Option<f64>,

        /// Per-symbol fetch timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Stop at the first failing symbol
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show the beta-to-WACC table
    Wacc {
        /// Look up the WACC for this beta
        #[arg(long, allow_negative_numbers = true)]
        beta: Option<f64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // A .env file may carry RUST_LOG as well as FMP_API_KEY.
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = data::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Value {
            symbol,
            as_of,
            short,
            medium,
            long,
            breakdown,
            format,
        } => {
            let growth = config.valuation.growth(short, medium, long);
            cmd::value::value_symbol(&config, &symbol, as_of, growth, breakdown, &format).await?;
        }
        Commands::Batch {
            input,
            output,
            as_of,
            long_term,
            timeout,
            fail_fast,
        } => {
            let mut config = config;
            if let Some(date) = as_of {
                config.batch.as_of = Some(data::parse_date(&date)?);
            }
            if let Some(rate) = long_term {
                config.valuation.default_long_term = rate;
            }
            if timeout.is_some() {
                config.batch.fetch_timeout_secs = timeout;
            }
            config.batch.fail_fast |= fail_fast;

            cmd::batch::run_batch(&config, &input, &output).await?;
        }
        Commands::Wacc { beta } => {
            cmd::wacc::show_wacc(&config.valuation.wacc_table, beta);
        }
    }

    Ok(())
}
