//! Effective annual rate per period for each rate track

use serde::{Deserialize, Serialize};

use crate::config::{Configuration, PaymentFrequency, RateCutPlan};

/// Source of the effective annual rate driving an amortization run
pub trait RatePath {
    /// Annual nominal rate in effect for a 1-based payment period
    fn rate_at(&self, period: u32) -> f64;

    /// Whether the mortgage renews (new term, new payment) at the start of this period
    fn is_renewal(&self, period: u32) -> bool;
}

/// Rate track for one mortgage or one portion of a split mortgage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateTrack {
    /// Initial rate for the term, then one renewal rate
    Fixed {
        initial_rate: f64,
        renewal_rate: f64,
        term_periods: u32,
    },
    /// Prime minus discount, moved by cumulative cuts
    Variable {
        prime_rate: f64,
        discount: f64,
        renewal_discount: f64,
        term_periods: u32,
        cuts: RateCutPlan,
    },
    /// Principal-weighted blend of a fixed and a variable track
    Split {
        ratio: f64,
        fixed: Box<RateTrack>,
        variable: Box<RateTrack>,
    },
}

/// Rate schedule bound to a payment frequency, so rate cuts keyed by month
/// can be located in biweekly periods
#[derive(Debug, Clone, PartialEq)]
pub struct RateSchedule {
    track: RateTrack,
    frequency: PaymentFrequency,
}

impl RateSchedule {
    pub fn new(track: RateTrack, frequency: PaymentFrequency) -> Self {
        Self { track, frequency }
    }

    pub fn fixed(config: &Configuration) -> Self {
        Self::new(
            RateTrack::Fixed {
                initial_rate: config.fixed.initial_rate,
                renewal_rate: config.fixed.renewal_rate,
                term_periods: config.fixed_term_periods(),
            },
            config.frequency,
        )
    }

    pub fn variable(config: &Configuration) -> Self {
        Self::new(
            RateTrack::Variable {
                prime_rate: config.variable.prime_rate,
                discount: config.variable.discount,
                renewal_discount: config.variable.renewal_discount,
                term_periods: config.variable_term_periods(),
                cuts: config.rate_cuts.clone(),
            },
            config.frequency,
        )
    }

    pub fn split(config: &Configuration) -> Self {
        Self::new(
            RateTrack::Split {
                ratio: config.split_ratio,
                fixed: Box::new(Self::fixed(config).track),
                variable: Box::new(Self::variable(config).track),
            },
            config.frequency,
        )
    }

    fn track_rate(&self, track: &RateTrack, period: u32) -> f64 {
        match track {
            RateTrack::Fixed {
                initial_rate,
                renewal_rate,
                term_periods,
            } => {
                if period <= *term_periods {
                    *initial_rate
                } else {
                    *renewal_rate
                }
            }
            RateTrack::Variable {
                prime_rate,
                discount,
                renewal_discount,
                term_periods,
                cuts,
            } => {
                let discount = if period <= *term_periods {
                    *discount
                } else {
                    *renewal_discount
                };
                let month = self.frequency.month_of_period(period);
                // Cuts below zero leave nothing to charge
                (prime_rate + cuts.cumulative_delta(month) - discount).max(0.0)
            }
            RateTrack::Split {
                ratio,
                fixed,
                variable,
            } => {
                ratio * self.track_rate(fixed, period)
                    + (1.0 - ratio) * self.track_rate(variable, period)
            }
        }
    }
}

impl RatePath for RateSchedule {
    fn rate_at(&self, period: u32) -> f64 {
        self.track_rate(&self.track, period)
    }

    fn is_renewal(&self, period: u32) -> bool {
        match &self.track {
            RateTrack::Fixed { term_periods, .. } | RateTrack::Variable { term_periods, .. } => {
                period == term_periods + 1
            }
            RateTrack::Split { .. } => false,
        }
    }
}
