//! Run every built-in preset (plus the defaults) and compare ending positions
//!
//! Usage: cargo run --bin compare_presets [-- output.csv]

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use mortgage_sim::config::PRESET_NAMES;
use mortgage_sim::{ScenarioFile, ScenarioResult};
use rayon::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    let mut scenarios = vec![("default".to_string(), ScenarioFile::default())];
    for name in PRESET_NAMES {
        scenarios.push((name.to_string(), ScenarioFile::preset(name)?));
    }

    // Run presets in parallel; each keeps its own error
    let results: Vec<(String, mortgage_sim::Result<ScenarioResult>)> = scenarios
        .into_par_iter()
        .map(|(name, scenario)| {
            let result = scenario
                .into_configuration()
                .and_then(|config| mortgage_sim::simulate(&config));
            (name, result)
        })
        .collect();
    println!("Ran {} scenarios in {:?}\n", results.len(), start.elapsed());

    println!(
        "{:<14} {:<28} {:>14} {:>14} {:>10} {:>14}",
        "Scenario", "Strategy", "Interest", "Balance", "Equity%", "NetCash"
    );
    println!("{}", "-".repeat(98));

    let mut rows = Vec::new();
    for (name, result) in &results {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                println!("{:<14} failed: {}", name, e);
                continue;
            }
        };
        for hv in &result.home_values {
            let Some(strategy) = result.simulation.get(hv.strategy) else { continue };
            let s = &strategy.summary;
            println!(
                "{:<14} {:<28} {:>14.2} {:>14.2} {:>10.2} {:>14.2}",
                name, s.name, s.total_interest, s.ending_balance, s.equity_built_pct, hv.net_cash_on_sale
            );
            rows.push((name.clone(), hv.strategy, s.total_interest, s.ending_balance, hv.net_cash_on_sale));
        }
        let best = result.simulation.best.lowest_interest;
        println!("{:<14} lowest interest: {}\n", "", best.label());
    }

    if let Some(path) = std::env::args().nth(1) {
        let mut file = File::create(&path).with_context(|| format!("Failed to create {}", path))?;
        writeln!(file, "Scenario,Strategy,TotalInterest,EndingBalance,NetCashOnSale")?;
        for (name, strategy, interest, balance, net) in &rows {
            writeln!(file, "{},{},{:.2},{:.2},{:.2}", name, strategy.file_stem(), interest, balance, net)?;
        }
        println!("Written {} rows to {}", rows.len(), path);
    }

    Ok(())
}

