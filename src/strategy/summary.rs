//! Per-strategy summary statistics and best-strategy selection

use serde::{Deserialize, Serialize};

use super::StrategyKind;
use crate::amortization::Ledger;

/// Statistics derived from a completed ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: StrategyKind,
    pub name: String,
    pub periods: u32,

    /// Installments plus prepayments
    pub total_payments: f64,
    pub total_interest: f64,
    /// Principal repaid, prepayments included
    pub total_principal: f64,
    pub total_prepayments: f64,

    pub ending_balance: f64,
    pub equity_built: f64,
    /// Principal repaid as a percentage of the original principal
    pub equity_built_pct: f64,

    /// Mean effective annual rate over periods with a balance outstanding
    pub average_rate: f64,
    pub min_rate: f64,
    pub max_rate: f64,

    pub negative_amortization_periods: u32,
}

impl StrategySummary {
    pub fn from_ledger(strategy: StrategyKind, name: String, ledger: &Ledger, original_principal: f64) -> Self {
        let rates: Vec<f64> = ledger.rows.iter().filter_map(|r| r.annual_rate).collect();
        let (average_rate, min_rate, max_rate) = if rates.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            let sum: f64 = rates.iter().sum();
            let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
            let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (sum / rates.len() as f64, min, max)
        };

        let ending_balance = ledger.ending_balance();
        let equity_built = original_principal - ending_balance;

        Self {
            strategy,
            name,
            periods: ledger.len() as u32,
            total_payments: ledger.total_payments(),
            total_interest: ledger.total_interest(),
            total_principal: ledger.total_principal() + ledger.total_prepayments(),
            total_prepayments: ledger.total_prepayments(),
            ending_balance,
            equity_built,
            equity_built_pct: equity_built / original_principal * 100.0,
            average_rate,
            min_rate,
            max_rate,
            negative_amortization_periods: ledger.negative_amortization_periods().len() as u32,
        }
    }
}

/// Winners under independent criteria; they may name different strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestStrategies {
    pub highest_equity: StrategyKind,
    pub lowest_interest: StrategyKind,
    pub lowest_total_payments: StrategyKind,
}

impl BestStrategies {
    /// `None` when there is nothing to compare
    pub fn from_summaries(summaries: &[&StrategySummary]) -> Option<Self> {
        let pick = |better: fn(&StrategySummary, &StrategySummary) -> bool| {
            summaries
                .iter()
                .copied()
                .reduce(|best, s| if better(s, best) { s } else { best })
                .map(|s| s.strategy)
        };

        Some(Self {
            highest_equity: pick(|a, b| a.equity_built_pct > b.equity_built_pct)?,
            lowest_interest: pick(|a, b| a.total_interest < b.total_interest)?,
            lowest_total_payments: pick(|a, b| a.total_payments < b.total_payments)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::LedgerRow;
    use approx::assert_abs_diff_eq;

    fn summary(strategy: StrategyKind, equity_pct: f64, interest: f64, payments: f64) -> StrategySummary {
        StrategySummary {
            strategy,
            name: strategy.label().to_string(),
            periods: 36,
            total_payments: payments,
            total_interest: interest,
            total_principal: 0.0,
            total_prepayments: 0.0,
            ending_balance: 0.0,
            equity_built: 0.0,
            equity_built_pct: equity_pct,
            average_rate: 0.0,
            min_rate: 0.0,
            max_rate: 0.0,
            negative_amortization_periods: 0,
        }
    }

    #[test]
    fn test_criteria_are_reported_independently() {
        let fixed = summary(StrategyKind::Fixed, 9.0, 70_000.0, 110_000.0);
        let variable = summary(StrategyKind::VariableFixedPayment, 8.5, 65_000.0, 105_000.0);
        let best = BestStrategies::from_summaries(&[&fixed, &variable]).unwrap();

        assert_eq!(best.highest_equity, StrategyKind::Fixed);
        assert_eq!(best.lowest_interest, StrategyKind::VariableFixedPayment);
        assert_eq!(best.lowest_total_payments, StrategyKind::VariableFixedPayment);
    }

    #[test]
    fn test_ties_keep_first() {
        let a = summary(StrategyKind::Fixed, 5.0, 100.0, 200.0);
        let b = summary(StrategyKind::Split, 5.0, 100.0, 200.0);
        let best = BestStrategies::from_summaries(&[&a, &b]).unwrap();
        assert_eq!(best.highest_equity, StrategyKind::Fixed);
        assert_eq!(best.lowest_interest, StrategyKind::Fixed);
        assert!(BestStrategies::from_summaries(&[]).is_none());
    }

    #[test]
    fn test_summary_from_ledger() {
        let rows = vec![
            LedgerRow {
                annual_rate: Some(0.04),
                payment: 1_000.0,
                interest: 300.0,
                principal: 700.0,
                prepayment: 500.0,
                ending_balance: 8_800.0,
                ..LedgerRow::new(1)
            },
            LedgerRow {
                annual_rate: Some(0.03),
                payment: 1_000.0,
                interest: 250.0,
                principal: 750.0,
                ending_balance: 8_050.0,
                ..LedgerRow::new(2)
            },
        ];
        let ledger = Ledger { rows };
        let s = StrategySummary::from_ledger(StrategyKind::Fixed, "Full Fixed".into(), &ledger, 10_000.0);

        assert_abs_diff_eq!(s.total_payments, 2_500.0);
        assert_abs_diff_eq!(s.total_interest, 550.0);
        assert_abs_diff_eq!(s.total_principal, 1_950.0);
        assert_abs_diff_eq!(s.equity_built, 1_950.0);
        assert_abs_diff_eq!(s.equity_built_pct, 19.5, epsilon = 1e-12);
        assert_abs_diff_eq!(s.average_rate, 0.035, epsilon = 1e-12);
        assert_abs_diff_eq!(s.min_rate, 0.03);
        assert_abs_diff_eq!(s.max_rate, 0.04);
    }
}
