//! Running state of a single amortization

/// What caused the installment to be resized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentReset {
    Origination,
    Renewal,
    RateChange,
}

/// Balance and payment carried from one period to the next
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Last completed period (0 before the first payment)
    pub period: u32,

    /// Outstanding principal at the start of the next period
    pub balance: f64,

    /// Current contractual installment
    pub payment: f64,

    /// Rate charged in the last completed period
    pub last_rate: Option<f64>,

    /// Whether the rate has already been reported as floored at zero
    pub zero_rate_seen: bool,
}

impl AmortizationState {
    pub fn new(principal: f64) -> Self {
        Self {
            period: 0,
            balance: principal.max(0.0),
            payment: 0.0,
            last_rate: None,
            zero_rate_seen: false,
        }
    }

    pub fn advance(&mut self) {
        self.period += 1;
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }

    /// Periods left in the amortization, counting the current one
    pub fn remaining_periods(&self, amortization_periods: u32) -> u32 {
        amortization_periods.saturating_sub(self.period - 1)
    }

    /// Decide whether the installment must be recomputed this period
    pub fn payment_reset(&self, rate: f64, renewal: bool, recalc_on_rate_change: bool) -> Option<PaymentReset> {
        match self.last_rate {
            None => Some(PaymentReset::Origination),
            Some(_) if renewal => Some(PaymentReset::Renewal),
            Some(last) if recalc_on_rate_change && (rate - last).abs() > 1e-12 => {
                Some(PaymentReset::RateChange)
            }
            Some(_) => None,
        }
    }
}
