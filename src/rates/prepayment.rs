//! Extra principal payments per period

use crate::config::{PrepaymentMode, PrepaymentPlan};

/// Resolves the scheduled prepayment for each period of a run
#[derive(Debug, Clone, PartialEq)]
pub struct PrepaymentPolicy {
    plan: PrepaymentPlan,
    periods_per_year: u32,
}

impl PrepaymentPolicy {
    pub fn new(plan: PrepaymentPlan, periods_per_year: u32) -> Self {
        Self {
            plan,
            periods_per_year,
        }
    }

    pub fn none() -> Self {
        Self::new(PrepaymentPlan::none(), 12)
    }

    /// Scheduled prepayment for a period, before clamping to the balance
    pub fn prepayment_for(&self, period: u32) -> f64 {
        let start = self.plan.start_period;
        let applies = match self.plan.mode {
            PrepaymentMode::None => false,
            PrepaymentMode::OneTime => period == start,
            PrepaymentMode::Monthly => period >= start,
            PrepaymentMode::Annual => {
                period >= start && (period - start) % self.periods_per_year == 0
            }
        };
        if applies {
            self.plan.amount
        } else {
            0.0
        }
    }
}
