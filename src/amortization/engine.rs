//! Period-by-period amortization engine

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::ledger::{Ledger, LedgerRow};
use super::state::AmortizationState;
use crate::config::{Configuration, PaymentFrequency};
use crate::rates::{periodic_payment, periodic_rate, PrepaymentPolicy, RatePath};

/// How the installment reacts to rate changes within a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPolicy {
    /// Installment set at origination and at renewal only
    Frozen,
    /// Installment recomputed whenever the rate moves, keeping the payoff date
    Recalculate,
}

/// Size and length of the loan being amortized
#[derive(Debug, Clone, PartialEq)]
pub struct LoanTerms {
    pub principal: f64,
    pub amortization_periods: u32,
    pub horizon_periods: u32,
    pub frequency: PaymentFrequency,
}

impl LoanTerms {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            principal: config.principal,
            amortization_periods: config.amortization_periods,
            horizon_periods: config.horizon_periods,
            frequency: config.frequency,
        }
    }

    /// Same schedule, different principal (one portion of a split mortgage)
    pub fn with_principal(&self, principal: f64) -> Self {
        Self {
            principal,
            ..self.clone()
        }
    }
}

/// Drives one loan through its horizon
pub struct AmortizationEngine<R: RatePath> {
    terms: LoanTerms,
    rates: R,
    payment_policy: PaymentPolicy,
    prepayments: PrepaymentPolicy,
}

impl<R: RatePath> AmortizationEngine<R> {
    pub fn new(terms: LoanTerms, rates: R, payment_policy: PaymentPolicy) -> Self {
        Self {
            terms,
            rates,
            payment_policy,
            prepayments: PrepaymentPolicy::none(),
        }
    }

    pub fn with_prepayments(mut self, prepayments: PrepaymentPolicy) -> Self {
        self.prepayments = prepayments;
        self
    }

    /// State before the first period
    pub fn start(&self) -> AmortizationState {
        AmortizationState::new(self.terms.principal)
    }

    /// Simulate every period of the horizon. Periods after payoff are reported
    /// as empty rows so every ledger has exactly `horizon_periods` rows.
    pub fn run(&self) -> Ledger {
        let mut ledger = Ledger::with_capacity(self.terms.horizon_periods);
        let mut state = self.start();

        for _period in 1..=self.terms.horizon_periods {
            let row = self.open_period(&mut state);
            let scheduled = self.prepayments.prepayment_for(row.period);
            ledger.add_row(self.close_period(&mut state, row, scheduled));
        }

        ledger
    }

    /// Advance one period and settle the installment.
    ///
    /// The returned row carries the balance after the installment in
    /// `ending_balance`; that is the most a prepayment can retire this period.
    /// The state balance is left untouched until [`close_period`](Self::close_period).
    pub fn open_period(&self, state: &mut AmortizationState) -> LedgerRow {
        state.advance();
        let period = state.period;
        if state.is_paid_off() {
            return LedgerRow::paid_off(period);
        }

        let frequency = self.terms.frequency;
        let mut row = LedgerRow::new(period);

        let rate = self.rates.rate_at(period);
        row.annual_rate = Some(rate);
        if rate <= 0.0 && !state.zero_rate_seen {
            warn!("Period {}: effective rate is zero, repaying straight-line", period);
            state.zero_rate_seen = true;
        }

        let renewal = self.rates.is_renewal(period);
        let recalc_on_change = self.payment_policy == PaymentPolicy::Recalculate;
        if let Some(reset) = state.payment_reset(rate, renewal, recalc_on_change) {
            let remaining = state.remaining_periods(self.terms.amortization_periods);
            state.payment = periodic_payment(state.balance, rate, remaining, frequency);
            debug!(
                "Period {}: payment reset ({:?}) to {:.2} at {:.4}% over {} periods",
                period,
                reset,
                state.payment,
                rate * 100.0,
                remaining
            );
        }

        let interest = state.balance * periodic_rate(rate, frequency);
        let owed = state.balance + interest;

        // Last scheduled period, or an installment that would overshoot, retires the loan
        let final_period = period >= self.terms.amortization_periods;
        let (payment, principal) = if final_period || state.payment >= owed {
            (owed, state.balance)
        } else {
            (state.payment, state.payment - interest)
        };
        row.payment = payment;
        row.interest = interest;
        row.principal = principal;
        row.ending_balance = state.balance - principal;

        if principal < 0.0 {
            row.negative_amortization = true;
            warn!(
                "Period {}: payment {:.2} below interest {:.2}, balance grows by {:.2}",
                period, payment, interest, -principal
            );
        }

        row
    }

    /// Apply a scheduled prepayment to an opened row and carry the balance forward.
    /// A prepayment at or above the remaining balance retires the loan exactly.
    pub fn close_period(
        &self,
        state: &mut AmortizationState,
        mut row: LedgerRow,
        scheduled: f64,
    ) -> LedgerRow {
        if row.is_paid_off() {
            return row;
        }

        let room = row.ending_balance.max(0.0);
        row.prepayment = scheduled.min(room);
        row.ending_balance = if scheduled > 0.0 && scheduled >= room {
            0.0
        } else {
            row.ending_balance - row.prepayment
        };

        state.balance = row.ending_balance;
        state.last_rate = row.annual_rate;

        row
    }
}
