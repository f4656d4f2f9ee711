//! Strategy runner: one amortization per repayment strategy, summarized side by side

mod split;
mod summary;

pub use split::{combine, run_split, SplitLedgers};
pub use summary::{BestStrategies, StrategySummary};

use log::info;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, Ledger, LoanTerms, PaymentPolicy};
use crate::config::Configuration;
use crate::error::{MortgageError, Result};
use crate::rates::{PrepaymentPolicy, RateSchedule};

/// Repayment strategies compared by the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    Fixed,
    /// Variable rate, installment frozen between renewals
    VariableFixedPayment,
    /// Variable rate, installment recomputed at every rate change
    VariableRecalcPayment,
    /// Fixed and variable portions amortized side by side
    Split,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Fixed,
        StrategyKind::VariableFixedPayment,
        StrategyKind::VariableRecalcPayment,
        StrategyKind::Split,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::Fixed => "Full Fixed",
            StrategyKind::VariableFixedPayment => "Variable (Fixed Payment)",
            StrategyKind::VariableRecalcPayment => "Variable (Recalc Payment)",
            StrategyKind::Split => "Split",
        }
    }

    /// Stem used for exported file names
    pub fn file_stem(&self) -> &'static str {
        match self {
            StrategyKind::Fixed => "fixed_mortgage",
            StrategyKind::VariableFixedPayment => "variable_fixed_payment",
            StrategyKind::VariableRecalcPayment => "variable_recalc_payment",
            StrategyKind::Split => "split_mortgage",
        }
    }

    /// Display name, with the split ratio spelled out for split mortgages
    pub fn display_name(&self, config: &Configuration) -> String {
        match self {
            StrategyKind::Split => format!(
                "{:.0}/{:.0} Split",
                config.split_ratio * 100.0,
                (1.0 - config.split_ratio) * 100.0
            ),
            other => other.label().to_string(),
        }
    }
}

/// Ledger and summary of one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub summary: StrategySummary,
    pub ledger: Ledger,
}

impl StrategyResult {
    pub fn strategy(&self) -> StrategyKind {
        self.summary.strategy
    }
}

/// Output of a full strategy comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub strategies: Vec<StrategyResult>,
    pub best: BestStrategies,
}

impl SimulationResult {
    pub fn get(&self, strategy: StrategyKind) -> Option<&StrategyResult> {
        self.strategies.iter().find(|r| r.strategy() == strategy)
    }

    pub fn summaries(&self) -> impl Iterator<Item = &StrategySummary> {
        self.strategies.iter().map(|r| &r.summary)
    }

    /// Balance at the horizon for every strategy, in run order
    pub fn ending_balances(&self) -> Vec<(StrategyKind, f64)> {
        self.strategies
            .iter()
            .map(|r| (r.strategy(), r.ledger.ending_balance()))
            .collect()
    }
}

/// Amortize a single strategy over the configured horizon (configuration assumed valid)
pub fn run_strategy(config: &Configuration, strategy: StrategyKind) -> Ledger {
    let terms = LoanTerms::from_config(config);
    let prepayments = PrepaymentPolicy::new(config.prepayment.clone(), config.periods_per_year());

    match strategy {
        StrategyKind::Fixed => {
            AmortizationEngine::new(terms, RateSchedule::fixed(config), PaymentPolicy::Frozen)
                .with_prepayments(prepayments)
                .run()
        }
        StrategyKind::VariableFixedPayment => {
            AmortizationEngine::new(terms, RateSchedule::variable(config), PaymentPolicy::Frozen)
                .with_prepayments(prepayments)
                .run()
        }
        StrategyKind::VariableRecalcPayment => AmortizationEngine::new(
            terms,
            RateSchedule::variable(config),
            PaymentPolicy::Recalculate,
        )
        .with_prepayments(prepayments)
        .run(),
        StrategyKind::Split => run_split(config).combined,
    }
}

/// Validate the configuration, then run and summarize every strategy
pub fn run_strategies(config: &Configuration) -> Result<SimulationResult> {
    config.validate()?;

    let strategies: Vec<StrategyResult> = StrategyKind::ALL
        .iter()
        .map(|&strategy| {
            let ledger = run_strategy(config, strategy);
            let summary = StrategySummary::from_ledger(
                strategy,
                strategy.display_name(config),
                &ledger,
                config.principal,
            );
            info!(
                "{}: {} periods, ending balance {:.2}, interest {:.2}",
                summary.name, summary.periods, summary.ending_balance, summary.total_interest
            );
            StrategyResult { summary, ledger }
        })
        .collect();

    let summaries: Vec<&StrategySummary> = strategies.iter().map(|r| &r.summary).collect();
    let best = BestStrategies::from_summaries(&summaries)
        .ok_or_else(|| MortgageError::invalid("strategies", "no strategies to compare"))?;

    Ok(SimulationResult { strategies, best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::config::{PaymentFrequency, PrepaymentMode, PrepaymentPlan, RateCutPlan};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn variable_scenario() -> Configuration {
        let mut config = sample_config();
        config.variable.prime_rate = 0.0495;
        config.variable.discount = 0.0085;
        config.rate_cuts = RateCutPlan::uniform(&[6, 12, 18, 24], 0.0025);
        config.horizon_periods = 36;
        config
    }

    #[test]
    fn test_runs_all_strategies() {
        let result = run_strategies(&sample_config()).unwrap();
        assert_eq!(result.strategies.len(), 4);
        for kind in StrategyKind::ALL {
            assert_eq!(result.get(kind).unwrap().ledger.len(), 36);
        }
        assert_eq!(result.get(StrategyKind::Split).unwrap().summary.name, "50/50 Split");
    }

    #[test]
    fn test_fixed_scenario_equity_matches_balance() {
        let result = run_strategies(&sample_config()).unwrap();
        let fixed = result.get(StrategyKind::Fixed).unwrap();
        let final_balance = fixed.ledger.ending_balance();

        assert!(final_balance < 672_000.0);
        assert!(fixed.summary.total_interest > 0.0);
        assert_abs_diff_eq!(
            fixed.summary.equity_built_pct,
            (672_000.0 - final_balance) / 672_000.0 * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_variable_fixed_payment_holds_payment_through_cuts() {
        let config = variable_scenario();
        let ledger = run_strategy(&config, StrategyKind::VariableFixedPayment);

        let first = ledger.row(1).unwrap();
        assert_eq!(first.payment, ledger.row(5).unwrap().payment);
        assert!(ledger.row(25).unwrap().interest < first.interest);
        assert!(ledger.rows.iter().all(|r| r.payment == first.payment));
    }

    #[test]
    fn test_variable_recalc_payment_moves_at_each_cut() {
        let config = variable_scenario();
        let ledger = run_strategy(&config, StrategyKind::VariableRecalcPayment);

        for cut in [6u32, 12, 18, 24] {
            let before = ledger.row(cut - 1).unwrap().payment;
            let after = ledger.row(cut).unwrap().payment;
            assert!(after < before, "payment should drop at period {cut}");
        }
        assert_eq!(ledger.row(7).unwrap().payment, ledger.row(11).unwrap().payment);
    }

    #[test]
    fn test_one_time_prepayment_lowers_balance_by_amount() {
        let baseline_config = sample_config();
        let mut prepay_config = sample_config();
        prepay_config.prepayment = PrepaymentPlan::one_time(5_000.0, 12);

        for kind in StrategyKind::ALL {
            let baseline = run_strategy(&baseline_config, kind);
            let prepaid = run_strategy(&prepay_config, kind);

            assert_eq!(baseline.row(11), prepaid.row(11), "{kind:?} diverged before prepayment");
            let diff =
                baseline.row(12).unwrap().ending_balance - prepaid.row(12).unwrap().ending_balance;
            assert_abs_diff_eq!(diff, 5_000.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_invalid_configuration_runs_nothing() {
        let mut config = sample_config();
        config.split_ratio = -0.1;
        assert!(matches!(
            run_strategies(&config),
            Err(MortgageError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_best_strategies_are_members() {
        let result = run_strategies(&sample_config()).unwrap();
        let interest_winner = result.get(result.best.lowest_interest).unwrap();
        for s in result.summaries() {
            assert!(interest_winner.summary.total_interest <= s.total_interest);
        }
        let equity_winner = result.get(result.best.highest_equity).unwrap();
        for s in result.summaries() {
            assert!(equity_winner.summary.equity_built_pct >= s.equity_built_pct);
        }
    }

    fn frequency_strategy() -> impl Strategy<Value = PaymentFrequency> {
        prop_oneof![
            Just(PaymentFrequency::Monthly),
            Just(PaymentFrequency::Biweekly),
            Just(PaymentFrequency::AcceleratedBiweekly),
            Just(PaymentFrequency::AcceleratedMonthly),
        ]
    }

    fn prepayment_strategy() -> impl Strategy<Value = PrepaymentPlan> {
        let mode = prop_oneof![
            Just(PrepaymentMode::OneTime),
            Just(PrepaymentMode::Monthly),
            Just(PrepaymentMode::Annual),
        ];
        prop_oneof![
            Just(PrepaymentPlan::none()),
            (mode, 500u32..200_000, 1u32..120).prop_map(|(mode, amount, start_period)| {
                PrepaymentPlan {
                    mode,
                    amount: amount as f64,
                    start_period,
                }
            }),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn generated_config(
        principal: u32,
        amortization_years: u32,
        frequency: PaymentFrequency,
        fixed_bp: u32,
        renewal_bp: u32,
        prime_bp: u32,
        discount_bp: u32,
        split_pct: u32,
    ) -> Configuration {
        let mut config = sample_config();
        config.principal = principal as f64;
        config.frequency = frequency;
        config.amortization_periods = amortization_years * frequency.periods_per_year();
        config.horizon_periods = config.amortization_periods;
        config.fixed.initial_rate = fixed_bp as f64 / 10_000.0;
        config.fixed.renewal_rate = renewal_bp as f64 / 10_000.0;
        config.variable.prime_rate = prime_bp as f64 / 10_000.0;
        config.variable.discount = discount_bp as f64 / 10_000.0;
        config.split_ratio = split_pct as f64 / 100.0;
        config
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_every_strategy_amortizes_fully_and_conserves_principal(
            principal in 50_000u32..1_500_000,
            amortization_years in 5u32..31,
            frequency in frequency_strategy(),
            fixed_bp in 100u32..900,
            renewal_bp in 100u32..900,
            prime_bp in 200u32..900,
            discount_bp in 0u32..150,
            split_pct in 0u32..101,
            prepayment in prepayment_strategy()
        ) {
            let mut config = generated_config(
                principal,
                amortization_years,
                frequency,
                fixed_bp,
                renewal_bp,
                prime_bp,
                discount_bp,
                split_pct,
            );
            config.prepayment = prepayment;
            let result = run_strategies(&config).unwrap();

            for strategy in &result.strategies {
                let ledger = &strategy.ledger;
                prop_assert_eq!(ledger.len() as u32, config.horizon_periods);
                prop_assert_eq!(ledger.ending_balance(), 0.0);

                let repaid = ledger.total_principal() + ledger.total_prepayments();
                prop_assert!(
                    (repaid - config.principal).abs() < 0.01,
                    "{}: repaid {}",
                    strategy.summary.name,
                    repaid
                );

                let mut previous = config.principal;
                for row in &ledger.rows {
                    prop_assert!(row.ending_balance <= previous + 1e-9);
                    prop_assert!(!row.negative_amortization);
                    let parts = row.interest + row.principal + row.prepayment;
                    prop_assert!((row.total_paid() - parts).abs() < 0.01);
                    previous = row.ending_balance;
                }
            }
        }

        #[test]
        fn prop_runs_are_deterministic(
            principal in 50_000u32..1_500_000,
            frequency in frequency_strategy(),
            split_pct in 0u32..101,
            prepayment in 0u32..20_000
        ) {
            let mut config =
                generated_config(principal, 25, frequency, 399, 320, 495, 85, split_pct);
            config.horizon_periods = 5 * frequency.periods_per_year();
            if prepayment > 0 {
                config.prepayment = PrepaymentPlan::one_time(prepayment as f64, 7);
            }

            let first = run_strategies(&config).unwrap();
            let second = run_strategies(&config).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
