//! Split mortgage: fixed and variable portions amortized side by side, then combined

use crate::amortization::{AmortizationEngine, Ledger, LedgerRow, LoanTerms, PaymentPolicy};
use crate::config::Configuration;
use crate::rates::{PrepaymentPolicy, RatePath, RateSchedule};

/// Ledgers of both portions plus the combined view
#[derive(Debug, Clone)]
pub struct SplitLedgers {
    pub fixed: Ledger,
    pub variable: Ledger,
    pub combined: Ledger,
}

/// Run both portions in lockstep so a shared prepayment can be reallocated
/// when one portion has less balance left than its share
pub fn run_split(config: &Configuration) -> SplitLedgers {
    let ratio = config.split_ratio;
    let terms = LoanTerms::from_config(config);
    let prepayments = PrepaymentPolicy::new(config.prepayment.clone(), config.periods_per_year());

    let fixed_engine = AmortizationEngine::new(
        terms.with_principal(config.principal * ratio),
        RateSchedule::fixed(config),
        PaymentPolicy::Frozen,
    );
    let variable_policy = if config.variable.fixed_payment {
        PaymentPolicy::Frozen
    } else {
        PaymentPolicy::Recalculate
    };
    let variable_engine = AmortizationEngine::new(
        terms.with_principal(config.principal * (1.0 - ratio)),
        RateSchedule::variable(config),
        variable_policy,
    );

    let mut fixed = Ledger::with_capacity(config.horizon_periods);
    let mut variable = Ledger::with_capacity(config.horizon_periods);
    let mut fixed_state = fixed_engine.start();
    let mut variable_state = variable_engine.start();

    for _period in 1..=config.horizon_periods {
        let fixed_row = fixed_engine.open_period(&mut fixed_state);
        let variable_row = variable_engine.open_period(&mut variable_state);

        let (fixed_prepayment, variable_prepayment) = allocate_prepayment(
            prepayments.prepayment_for(fixed_row.period),
            ratio,
            fixed_row.ending_balance.max(0.0),
            variable_row.ending_balance.max(0.0),
        );

        fixed.add_row(fixed_engine.close_period(&mut fixed_state, fixed_row, fixed_prepayment));
        variable.add_row(variable_engine.close_period(
            &mut variable_state,
            variable_row,
            variable_prepayment,
        ));
    }

    let combined = combine(&fixed, &variable, &RateSchedule::split(config));
    SplitLedgers {
        fixed,
        variable,
        combined,
    }
}

/// Divide a prepayment by the split ratio, then move whatever one portion cannot
/// absorb to the other. Returns (fixed, variable) amounts, each at most its room.
fn allocate_prepayment(
    scheduled: f64,
    ratio: f64,
    fixed_room: f64,
    variable_room: f64,
) -> (f64, f64) {
    if scheduled <= 0.0 {
        return (0.0, 0.0);
    }

    let mut fixed = (scheduled * ratio).min(fixed_room);
    let mut variable = (scheduled * (1.0 - ratio)).min(variable_room);
    let mut spare = scheduled - fixed - variable;

    for (amount, room) in [(&mut fixed, fixed_room), (&mut variable, variable_room)] {
        if spare <= 0.0 {
            break;
        }
        let headroom = room - *amount;
        if spare >= headroom {
            // Exactly the room, so the portion closes at zero
            *amount = room;
            spare -= headroom;
        } else {
            *amount += spare;
            spare = 0.0;
        }
    }

    (fixed, variable)
}

/// Sum two portion ledgers row by row, reporting the blended rate
pub fn combine(fixed: &Ledger, variable: &Ledger, blended: &impl RatePath) -> Ledger {
    let mut ledger = Ledger::with_capacity(fixed.len() as u32);

    for (f, v) in fixed.rows.iter().zip(&variable.rows) {
        let period = f.period;
        if f.is_paid_off() && v.is_paid_off() {
            ledger.add_row(LedgerRow::paid_off(period));
            continue;
        }

        ledger.add_row(LedgerRow {
            period,
            annual_rate: Some(blended.rate_at(period)),
            payment: f.payment + v.payment,
            interest: f.interest + v.interest,
            principal: f.principal + v.principal,
            prepayment: f.prepayment + v.prepayment,
            ending_balance: f.ending_balance + v.ending_balance,
            negative_amortization: f.negative_amortization || v.negative_amortization,
        });
    }

    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::config::{PrepaymentMode, PrepaymentPlan, RateCutPlan};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_portions_sum_to_combined() {
        let split = run_split(&sample_config());
        assert_eq!(split.combined.len(), 36);

        for ((f, v), c) in split
            .fixed
            .rows
            .iter()
            .zip(&split.variable.rows)
            .zip(&split.combined.rows)
        {
            assert_abs_diff_eq!(
                c.ending_balance,
                f.ending_balance + v.ending_balance,
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(c.payment, f.payment + v.payment, epsilon = 1e-9);
        }
        let first = &split.fixed.rows[0];
        assert_abs_diff_eq!(first.ending_balance + first.principal, 336_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_blended_rate_weights_portions() {
        let split = run_split(&sample_config());
        let row = split.combined.row(30).unwrap();
        assert_abs_diff_eq!(row.annual_rate.unwrap(), 0.5 * 0.0399 + 0.5 * 0.031, epsilon = 1e-12);
    }

    #[test]
    fn test_all_fixed_split_matches_fixed_strategy() {
        let mut config = sample_config();
        config.split_ratio = 1.0;
        let split = run_split(&config);

        let fixed = AmortizationEngine::new(
            LoanTerms::from_config(&config),
            RateSchedule::fixed(&config),
            PaymentPolicy::Frozen,
        )
        .run();

        assert!(split.variable.rows.iter().all(LedgerRow::is_paid_off));
        assert_abs_diff_eq!(
            split.combined.ending_balance(),
            fixed.ending_balance(),
            epsilon = 1e-9
        );
        let first_rate = split.combined.row(1).unwrap().annual_rate.unwrap();
        assert_abs_diff_eq!(first_rate, 0.0399, epsilon = 1e-12);
    }

    #[test]
    fn test_allocation_moves_excess_to_portion_with_balance() {
        assert_eq!(allocate_prepayment(1_000.0, 0.5, 100.0, 5_000.0), (100.0, 900.0));
        assert_eq!(allocate_prepayment(1_000.0, 0.5, 5_000.0, 100.0), (900.0, 100.0));
        assert_eq!(allocate_prepayment(1_000.0, 0.3, 5_000.0, 5_000.0), (300.0, 700.0));
        assert_eq!(allocate_prepayment(0.0, 0.5, 100.0, 100.0), (0.0, 0.0));

        // More than both balances: each portion takes exactly its room
        assert_eq!(allocate_prepayment(10_000.0, 0.5, 1_234.5, 6_789.1), (1_234.5, 6_789.1));
    }

    #[test]
    fn test_prepayment_covering_loan_retires_both_portions() {
        let mut config = sample_config();
        config.split_ratio = 0.3;
        config.variable.prime_rate = 0.09;
        config.rate_cuts = RateCutPlan::none();

        let before = run_split(&config).combined.row(11).unwrap().ending_balance;
        config.prepayment = PrepaymentPlan::one_time(before, 12);
        let split = run_split(&config);

        let payoff = split.combined.row(12).unwrap();
        assert_eq!(payoff.ending_balance, 0.0);
        assert_eq!(split.fixed.row(12).unwrap().ending_balance, 0.0);
        assert_eq!(split.variable.row(12).unwrap().ending_balance, 0.0);
        assert_abs_diff_eq!(payoff.principal + payoff.prepayment, before, epsilon = 1e-6);
        assert!(payoff.prepayment < before);

        for row in &split.combined.rows[12..] {
            assert!(row.is_paid_off());
        }
    }

    #[test]
    fn test_recurring_prepayment_is_never_dropped() {
        let mut config = sample_config();
        config.split_ratio = 0.1;
        config.horizon_periods = 120;
        config.prepayment = PrepaymentPlan {
            mode: PrepaymentMode::Monthly,
            amount: 10_000.0,
            start_period: 1,
        };
        let split = run_split(&config);

        // The full amount lands every period until the final payoff row
        for row in split.combined.rows.iter().filter(|r| !r.is_paid_off()) {
            if row.ending_balance > 0.0 {
                assert_abs_diff_eq!(row.prepayment, 10_000.0, epsilon = 1e-6);
            }
        }

        assert_eq!(split.combined.ending_balance(), 0.0);
        assert!(split.combined.rows.last().unwrap().is_paid_off());
        let repaid = split.combined.total_principal() + split.combined.total_prepayments();
        assert_abs_diff_eq!(repaid, config.principal, epsilon = 1e-6);
    }
}
