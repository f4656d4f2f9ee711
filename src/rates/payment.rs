//! Periodic payment under the Canadian semi-annual compounding convention
//!
//! A quoted annual rate compounds semi-annually. The equivalent rate for a
//! payment period is `(1 + r/2)^(2/n) - 1` for `n` payments a year, not `r/n`.

use crate::config::PaymentFrequency;

/// Effective rate per payment period for a quoted annual nominal rate
pub fn periodic_rate(annual_rate: f64, frequency: PaymentFrequency) -> f64 {
    if annual_rate <= 0.0 {
        return 0.0;
    }
    let ppy = frequency.periods_per_year() as f64;
    (1.0 + annual_rate / 2.0).powf(2.0 / ppy) - 1.0
}

/// Level payment that retires `principal` over `periods` at `rate` per period.
/// Falls back to straight-line repayment when the rate is not positive.
pub fn annuity_payment(principal: f64, rate: f64, periods: f64) -> f64 {
    if periods <= 0.0 {
        return principal;
    }
    if rate <= 0.0 {
        return principal / periods;
    }
    principal * rate / (1.0 - (1.0 + rate).powf(-periods))
}

/// Payment per period for the given frequency.
///
/// `remaining_periods` is counted in the frequency's own periods. Accelerated
/// frequencies start from the monthly payment over the same calendar span:
/// accelerated biweekly pays half of it 26 times a year, accelerated monthly
/// pays 13/12 of it 12 times a year.
pub fn periodic_payment(
    principal: f64,
    annual_rate: f64,
    remaining_periods: u32,
    frequency: PaymentFrequency,
) -> f64 {
    if principal <= 0.0 {
        return 0.0;
    }
    let periods = remaining_periods as f64;
    match frequency {
        PaymentFrequency::Monthly | PaymentFrequency::Biweekly => {
            annuity_payment(principal, periodic_rate(annual_rate, frequency), periods)
        }
        PaymentFrequency::AcceleratedBiweekly => {
            let months = periods * 12.0 / 26.0;
            monthly_payment(principal, annual_rate, months) / 2.0
        }
        PaymentFrequency::AcceleratedMonthly => {
            monthly_payment(principal, annual_rate, periods) * 13.0 / 12.0
        }
    }
}

fn monthly_payment(principal: f64, annual_rate: f64, months: f64) -> f64 {
    annuity_payment(
        principal,
        periodic_rate(annual_rate, PaymentFrequency::Monthly),
        months,
    )
}
