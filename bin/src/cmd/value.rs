//! Value command implementation.

use crate::data;
use anyhow::{Result, bail};
use tasador::TasadorConfig;
use tasador_dcf::{Phase, Valuation};
use tasador_traits::GrowthAssumptions;

/// Fetch one symbol from FMP and print its fair value.
pub(crate) async fn value_symbol(
    config: &TasadorConfig,
    symbol: &str,
    as_of: Option<String>,
    growth: GrowthAssumptions,
    breakdown: bool,
    format: &str,
) -> Result<()> {
    if format != "text" && format != "json" {
        bail!("unknown format '{format}', expected text or json");
    }

    let as_of = data::date_or_today(as_of.as_deref())?;
    let provider = data::fmp_provider(config)?;
    let valuation = tasador::value_symbol(&provider, symbol, as_of, growth).await?;

    if format == "json" {
        let json = serde_json::to_string_pretty(&valuation_json(&valuation, breakdown))?;
        println!("{json}");
    } else {
        print_valuation(&valuation, breakdown);
    }
    Ok(())
}

fn valuation_json(valuation: &Valuation, breakdown: bool) -> serde_json::Value {
    let rate = valuation.discount_rate();
    let growth = valuation.growth();
    let projection = valuation.projection();

    let mut json = serde_json::json!({
        "symbol": valuation.symbol(),
        "as_of": valuation.as_of().to_string(),
        "growth": growth,
        "beta": rate.beta,
        "wacc": rate.wacc,
        "discount_factor": rate.factor,
        "cf5": projection.cf5(),
        "cf10": projection.cf10(),
        "discounted_cash_flow": valuation.discounted_cash_flow(),
        "present_value": valuation.present_value(),
        "fair_value": valuation.per_share(),
    });
    if breakdown {
        json["schedule"] = serde_json::json!(projection.schedule());
    }
    json
}

fn print_valuation(valuation: &Valuation, breakdown: bool) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    DCF Fair Value                            ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let rate = valuation.discount_rate();
    let growth = valuation.growth();
    let projection = valuation.projection();

    println!("Symbol:   {}", valuation.symbol());
    println!("As of:    {}", valuation.as_of());
    println!(
        "Growth:   {:.2}% / {:.2}% / {:.2}% (years 1-5 / 6-10 / 11-20)",
        growth.short_term * 100.0,
        growth.medium_term * 100.0,
        growth.long_term * 100.0
    );
    println!("Beta:     {:.2}", rate.beta);
    println!("WACC:     {:.2}%", rate.wacc * 100.0);
    println!("DF:       {:.6}", rate.factor);
    println!();

    if breakdown {
        println!(
            "{:>4}  {:12}  {:>16}  {:>10}  {:>16}",
            "Year", "Phase", "Cash Flow", "Discount", "Present Value"
        );
        println!("{}", "-".repeat(66));
        for year in projection.schedule() {
            println!(
                "{:>4}  {:12}  {:>16.2}  {:>10.6}  {:>16.2}",
                year.year,
                year.phase.label(),
                year.cash_flow,
                year.discount,
                year.present_value
            );
        }
        println!();
    }

    println!("Projection:");
    println!("{}", "-".repeat(40));
    for phase in [Phase::ShortTerm, Phase::MediumTerm, Phase::LongTerm] {
        println!("  {:20} {:>16.2}", phase.label(), projection.phase_total(phase));
    }
    println!("  {:20} {:>16.2}", "CF5", projection.cf5());
    println!("  {:20} {:>16.2}", "CF10", projection.cf10());
    println!("  {:20} {:>16.2}", "DCF", valuation.discounted_cash_flow());
    println!("  {:20} {:>16.2}", "Present value", valuation.present_value());
    println!();

    match valuation.per_share() {
        Some(value) => println!("Fair value per share: {value:.4}"),
        None => println!("Fair value per share: undefined (no shares outstanding reported)"),
    }
    println!();
}
