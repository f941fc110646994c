//! Batch command implementation.

use crate::data;
use anyhow::Result;
use std::path::Path;
use tasador::TasadorConfig;

/// Value every symbol in `input` and write the annotated table to `output`.
pub(crate) async fn run_batch(config: &TasadorConfig, input: &Path, output: &Path) -> Result<()> {
    let batch = &config.batch;
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Batch Valuation                           ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Input:    {}", input.display());
    println!("Output:   {}", output.display());
    match batch.as_of {
        Some(date) => println!("As of:    {date}"),
        None => println!("As of:    Today"),
    }
    println!(
        "Growth:   EPS Next 5Y / x{} / {:.2}%",
        config.valuation.medium_to_short_ratio,
        config.valuation.default_long_term * 100.0
    );
    match batch.fetch_timeout_secs {
        Some(secs) => println!("Timeout:  {secs}s per symbol"),
        None => println!("Timeout:  None"),
    }
    println!();

    let provider = data::fmp_provider(config)?;
    let summary = tasador::run_batch(&provider, input, output, config).await?;

    println!("Done: {summary}");
    if summary.failed > 0 {
        println!("Rows that failed carry an 'error: ...' fair value.");
    }
    println!();

    Ok(())
}
