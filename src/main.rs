//! Mortgage Simulator CLI
//!
//! ```bash
//! # Default scenario, with environment overrides, exported to ./mortgage_analysis
//! mortgage-sim run --env
//!
//! # A preset, printed as JSON without writing files
//! mortgage-sim run --preset aggressive --no-export --json
//!
//! # A scenario file
//! mortgage-sim run --scenario scenario.json --output-dir out
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use mortgage_sim::config::PRESET_NAMES;
use mortgage_sim::export;
use mortgage_sim::{ScenarioFile, ScenarioResult, ScenarioRunner, StrategyKind};

/// Compare fixed, variable and split mortgage strategies period by period
#[derive(Parser)]
#[command(name = "mortgage-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every strategy for one scenario
    Run(RunArgs),

    /// List the built-in scenario presets
    Presets,
}

#[derive(Args)]
struct RunArgs {
    /// JSON scenario file
    #[arg(short, long, conflicts_with = "preset")]
    scenario: Option<PathBuf>,

    /// Built-in preset (conservative, aggressive, high_loan)
    #[arg(short, long)]
    preset: Option<String>,

    /// Apply LOAN_AMOUNT, PRIME_RATE, ... from the environment on top of the scenario
    #[arg(long)]
    env: bool,

    /// Directory for CSV and report output
    #[arg(short, long, default_value = "mortgage_analysis")]
    output_dir: PathBuf,

    /// Skip writing files
    #[arg(long)]
    no_export: bool,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Presets => {
            for name in PRESET_NAMES {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut scenario = match (&args.scenario, &args.preset) {
        (Some(path), _) => ScenarioFile::from_json_path(path)
            .with_context(|| format!("Failed to load scenario {}", path.display()))?,
        (None, Some(name)) => ScenarioFile::preset(name)?,
        (None, None) => ScenarioFile::default(),
    };
    if args.env {
        scenario
            .apply_env_overrides()
            .context("Invalid environment override")?;
    }

    let config = scenario
        .into_configuration()
        .context("Invalid scenario configuration")?;
    let result = ScenarioRunner::new(config)?.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result)?;
    }

    if !args.no_export {
        let written = export::write_all(&result, &args.output_dir)
            .with_context(|| format!("Failed to export to {}", args.output_dir.display()))?;
        if !args.json {
            println!("\nExported {} files to '{}'", written.len(), args.output_dir.display());
        }
    }

    Ok(())
}

fn print_report(result: &ScenarioResult) -> Result<()> {
    let config = &result.config;

    println!("Mortgage Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Loan: ${:.0}", config.principal);
    println!(
        "Amortization: {} {} periods, horizon {} periods",
        config.amortization_periods,
        config.frequency.label(),
        config.horizon_periods
    );

    for strategy in &result.simulation.strategies {
        let s = &strategy.summary;
        println!("\n{}:", s.name);
        println!("  Total Payments: ${:.0}", s.total_payments);
        println!("  Total Interest: ${:.0}", s.total_interest);
        println!("  Total Principal: ${:.0}", s.total_principal);
        println!("  Ending Balance: ${:.0}", s.ending_balance);
        println!("  Equity Built: ${:.0} ({:.2}%)", s.equity_built, s.equity_built_pct);
        println!("  Average Rate: {:.2}%", s.average_rate * 100.0);
        if s.min_rate != s.max_rate {
            println!("  Rate Range: {:.2}% - {:.2}%", s.min_rate * 100.0, s.max_rate * 100.0);
        }
        if s.negative_amortization_periods > 0 {
            println!("  Negative amortization in {} periods", s.negative_amortization_periods);
        }

        if matches!(
            strategy.strategy(),
            StrategyKind::VariableFixedPayment | StrategyKind::VariableRecalcPayment
        ) {
            println!("  Rate Progression:");
            for (period, rate) in strategy.ledger.rate_progression() {
                println!("    Period {:>3}: {:.2}%", period, rate * 100.0);
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    export::write_report(&mut std::io::stdout().lock(), result)?;
    Ok(())
}
