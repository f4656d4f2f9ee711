//! CSV export of ledgers and summaries, plus a plain-text analysis report

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use serde::Serialize;

use crate::amortization::LedgerRow;
use crate::error::Result;
use crate::home_value::HomeValueResult;
use crate::scenario::ScenarioResult;
use crate::strategy::{SimulationResult, StrategyKind, StrategySummary};

pub const COMBINED_FILE: &str = "all_strategies_comparison.csv";
pub const SUMMARY_FILE: &str = "mortgage_strategy_summary.csv";
pub const HOME_VALUE_FILE: &str = "home_value_projection.csv";
pub const REPORT_FILE: &str = "analysis_summary.txt";

/// One ledger row as written to CSV; rates in percent, empty once paid off
#[derive(Debug, Serialize)]
struct LedgerRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy: Option<&'a str>,
    period: u32,
    rate_pct: Option<f64>,
    payment: f64,
    interest: f64,
    principal: f64,
    prepayment: f64,
    balance: f64,
    negative_amortization: bool,
}

impl<'a> LedgerRecord<'a> {
    fn new(row: &LedgerRow, strategy: Option<&'a str>) -> Self {
        Self {
            strategy,
            period: row.period,
            rate_pct: row.annual_rate.map(|r| r * 100.0),
            payment: row.payment,
            interest: row.interest,
            principal: row.principal,
            prepayment: row.prepayment,
            balance: row.ending_balance,
            negative_amortization: row.negative_amortization,
        }
    }
}

#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    strategy: &'a str,
    periods: u32,
    total_payments: f64,
    total_interest: f64,
    total_principal: f64,
    total_prepayments: f64,
    ending_balance: f64,
    equity_built: f64,
    equity_built_pct: f64,
    average_rate_pct: f64,
    min_rate_pct: f64,
    max_rate_pct: f64,
    negative_amortization_periods: u32,
}

impl<'a> From<&'a StrategySummary> for SummaryRecord<'a> {
    fn from(s: &'a StrategySummary) -> Self {
        Self {
            strategy: &s.name,
            periods: s.periods,
            total_payments: s.total_payments,
            total_interest: s.total_interest,
            total_principal: s.total_principal,
            total_prepayments: s.total_prepayments,
            ending_balance: s.ending_balance,
            equity_built: s.equity_built,
            equity_built_pct: s.equity_built_pct,
            average_rate_pct: s.average_rate * 100.0,
            min_rate_pct: s.min_rate * 100.0,
            max_rate_pct: s.max_rate * 100.0,
            negative_amortization_periods: s.negative_amortization_periods,
        }
    }
}

/// File name of the per-strategy ledger
pub fn ledger_file_name(strategy: StrategyKind) -> String {
    format!("{}_schedule.csv", strategy.file_stem())
}

/// Write one CSV per strategy and a combined CSV tagged by strategy name
pub fn write_ledgers(simulation: &SimulationResult, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(simulation.strategies.len() + 1);

    for result in &simulation.strategies {
        let path = dir.join(ledger_file_name(result.strategy()));
        let mut wtr = csv::Writer::from_path(&path)?;
        for row in &result.ledger.rows {
            wtr.serialize(LedgerRecord::new(row, None))?;
        }
        wtr.flush()?;
        info!("Wrote {} rows to {}", result.ledger.len(), path.display());
        written.push(path);
    }

    let path = dir.join(COMBINED_FILE);
    let mut wtr = csv::Writer::from_path(&path)?;
    for result in &simulation.strategies {
        let name = result.summary.name.as_str();
        for row in &result.ledger.rows {
            wtr.serialize(LedgerRecord::new(row, Some(name)))?;
        }
    }
    wtr.flush()?;
    info!("Wrote combined comparison to {}", path.display());
    written.push(path);

    Ok(written)
}

/// Write the summary CSV, the home-value CSV and the text report
pub fn write_summary(result: &ScenarioResult, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let summary_path = dir.join(SUMMARY_FILE);
    let mut wtr = csv::Writer::from_path(&summary_path)?;
    for summary in result.simulation.summaries() {
        wtr.serialize(SummaryRecord::from(summary))?;
    }
    wtr.flush()?;
    info!("Wrote strategy summary to {}", summary_path.display());

    let home_path = dir.join(HOME_VALUE_FILE);
    let mut wtr = csv::Writer::from_path(&home_path)?;
    for hv in &result.home_values {
        wtr.serialize(hv)?;
    }
    wtr.flush()?;
    info!("Wrote home value projection to {}", home_path.display());

    let report_path = dir.join(REPORT_FILE);
    let mut file = File::create(&report_path)?;
    write_report(&mut file, result)?;
    info!("Wrote analysis report to {}", report_path.display());

    Ok(vec![summary_path, home_path, report_path])
}

/// Ledgers, summaries and report in one directory
pub fn write_all(result: &ScenarioResult, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = write_ledgers(&result.simulation, dir)?;
    written.extend(write_summary(result, dir)?);
    Ok(written)
}

/// Human-readable comparison of the strategies in a scenario
pub fn write_report<W: Write>(out: &mut W, result: &ScenarioResult) -> Result<()> {
    let config = &result.config;
    let simulation = &result.simulation;
    let ppy = config.periods_per_year();

    writeln!(
        out,
        "MORTGAGE STRATEGY ANALYSIS ({}-Year Horizon)",
        config.horizon_years()
    )?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "Initial Loan Amount: ${:.0}", config.principal)?;
    writeln!(
        out,
        "Amortization Period: {} years ({} {} payments)",
        config.amortization_periods / ppy,
        config.amortization_periods,
        config.frequency.label()
    )?;
    writeln!(out)?;

    let name_of = |kind: StrategyKind| {
        simulation
            .get(kind)
            .map(|r| r.summary.name.clone())
            .unwrap_or_else(|| kind.label().to_string())
    };
    let summary_of = |kind: StrategyKind| simulation.get(kind).map(|r| &r.summary);

    writeln!(out, "BEST PERFORMERS:")?;
    if let Some(s) = summary_of(simulation.best.highest_equity) {
        writeln!(out, "- Highest Equity Built: {} - {:.2}%", s.name, s.equity_built_pct)?;
    }
    if let Some(s) = summary_of(simulation.best.lowest_interest) {
        writeln!(out, "- Lowest Total Interest: {} - ${:.0}", s.name, s.total_interest)?;
    }
    if let Some(s) = summary_of(simulation.best.lowest_total_payments) {
        writeln!(out, "- Lowest Total Payments: {} - ${:.0}", s.name, s.total_payments)?;
    }
    writeln!(out)?;

    if let Some(fixed) = summary_of(StrategyKind::Fixed) {
        writeln!(out, "STRATEGY COMPARISONS:")?;
        for kind in [StrategyKind::VariableFixedPayment, StrategyKind::VariableRecalcPayment] {
            if let Some(s) = summary_of(kind) {
                writeln!(
                    out,
                    "- {} vs Fixed Interest Savings: ${:.0}",
                    s.name,
                    fixed.total_interest - s.total_interest
                )?;
                writeln!(
                    out,
                    "- {} vs Fixed Equity Difference: {:+.2}%",
                    s.name,
                    s.equity_built_pct - fixed.equity_built_pct
                )?;
            }
        }
        if let Some(split) = summary_of(StrategyKind::Split) {
            writeln!(
                out,
                "- {}: {:.2}% equity built",
                name_of(StrategyKind::Split),
                split.equity_built_pct
            )?;
        }
        writeln!(out)?;
    }

    if !config.rate_cuts.is_empty() {
        let total_cut: f64 = config.rate_cuts.cuts.iter().map(|c| -c.delta).sum();
        let last_month = config.rate_cuts.cuts.iter().map(|c| c.month).max().unwrap_or(0);
        writeln!(out, "RATE CUT IMPACT:")?;
        writeln!(out, "- Total rate cuts: {:.2}% over {} months", total_cut * 100.0, last_month)?;
        if let Some(v) = summary_of(StrategyKind::VariableFixedPayment) {
            writeln!(
                out,
                "- Variable rate benefit: {:.2}% rate reduction",
                (v.max_rate - v.min_rate) * 100.0
            )?;
        }
        writeln!(out)?;
    }

    if !result.home_values.is_empty() {
        writeln!(out, "HOME VALUE PROJECTION:")?;
        for hv in &result.home_values {
            writeln!(out, "{}", home_value_line(hv))?;
        }
    }

    Ok(())
}

fn home_value_line(hv: &HomeValueResult) -> String {
    format!(
        "- {}: net cash on sale ${:.0}, return ${:.0} ({:.2}% ROI)",
        hv.name, hv.net_cash_on_sale, hv.total_return, hv.roi_pct
    )
}
