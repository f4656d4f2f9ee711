//! Simulation configuration: loan terms, rate parameters, rate cuts, prepayments, property

pub mod loader;

pub use loader::{ScenarioFile, PRESET_NAMES};

use serde::{Deserialize, Serialize};

use crate::error::{MortgageError, Result};

/// How often payments are made
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Biweekly,
    /// Half the monthly payment, paid 26 times a year
    AcceleratedBiweekly,
    /// Monthly payment scaled by 13/12
    AcceleratedMonthly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly | PaymentFrequency::AcceleratedMonthly => 12,
            PaymentFrequency::Biweekly | PaymentFrequency::AcceleratedBiweekly => 26,
        }
    }

    /// Calendar month (1-based) that a payment period falls in
    pub fn month_of_period(&self, period: u32) -> u32 {
        let ppy = self.periods_per_year();
        if ppy == 12 {
            period
        } else {
            (period * 12).div_ceil(ppy)
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::AcceleratedBiweekly => "accelerated-biweekly",
            PaymentFrequency::AcceleratedMonthly => "accelerated-monthly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "monthly" => Some(PaymentFrequency::Monthly),
            "biweekly" => Some(PaymentFrequency::Biweekly),
            "accelerated-biweekly" => Some(PaymentFrequency::AcceleratedBiweekly),
            "accelerated-monthly" => Some(PaymentFrequency::AcceleratedMonthly),
            _ => None,
        }
    }
}

/// Fixed-rate mortgage parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedRateParams {
    /// Annual nominal rate for the initial term
    pub initial_rate: f64,

    /// Length of the initial term in years
    pub term_years: u32,

    /// Annual nominal rate after renewal
    pub renewal_rate: f64,
}

/// Variable-rate mortgage parameters (prime minus discount)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRateParams {
    pub prime_rate: f64,

    /// Discount off prime for the initial term
    pub discount: f64,

    pub term_years: u32,

    /// Discount off prime after renewal
    pub renewal_discount: f64,

    /// Payment mode used for the variable portion of a split mortgage
    pub fixed_payment: bool,
}

/// A scheduled change to prime, applied from `month` onward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCut {
    pub month: u32,
    /// Annual rate change, strictly negative
    pub delta: f64,
}

/// Ordered set of scheduled rate cuts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCutPlan {
    pub cuts: Vec<RateCut>,
}

impl RateCutPlan {
    pub fn none() -> Self {
        Self { cuts: Vec::new() }
    }

    /// Equal-sized cuts at each scheduled month
    pub fn uniform(months: &[u32], amount: f64) -> Self {
        Self {
            cuts: months
                .iter()
                .map(|&month| RateCut {
                    month,
                    delta: -amount.abs(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Sum of all cut deltas scheduled at or before `month`
    pub fn cumulative_delta(&self, month: u32) -> f64 {
        self.cuts
            .iter()
            .filter(|cut| cut.month <= month)
            .map(|cut| cut.delta)
            .sum()
    }

    fn validate(&self) -> Result<()> {
        let mut previous_month = 0;
        for (i, cut) in self.cuts.iter().enumerate() {
            if !cut.delta.is_finite() || cut.delta >= 0.0 {
                return Err(MortgageError::invalid(
                    format!("rate_cuts[{}].delta", i),
                    format!("must be a finite negative rate change, got {}", cut.delta),
                ));
            }
            if cut.month < previous_month {
                return Err(MortgageError::invalid(
                    format!("rate_cuts[{}].month", i),
                    format!(
                        "cuts must be ordered by month, {} follows {}",
                        cut.month, previous_month
                    ),
                ));
            }
            previous_month = cut.month;
        }
        Ok(())
    }
}

/// When extra principal is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrepaymentMode {
    None,
    /// Single lump sum at the start period
    OneTime,
    /// Every payment period from the start period
    Monthly,
    /// Once a year from the start period
    Annual,
}

/// Extra principal payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentPlan {
    pub mode: PrepaymentMode,
    pub amount: f64,
    pub start_period: u32,
}

impl PrepaymentPlan {
    pub fn none() -> Self {
        Self {
            mode: PrepaymentMode::None,
            amount: 0.0,
            start_period: 1,
        }
    }

    pub fn one_time(amount: f64, period: u32) -> Self {
        Self {
            mode: PrepaymentMode::OneTime,
            amount,
            start_period: period,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.mode == PrepaymentMode::None {
            return Ok(());
        }
        if self.start_period == 0 {
            return Err(MortgageError::invalid(
                "prepayment.start_period",
                "must be at least 1",
            ));
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(MortgageError::invalid(
                "prepayment.amount",
                format!("must be positive, got {}", self.amount),
            ));
        }
        Ok(())
    }
}

impl Default for PrepaymentPlan {
    fn default() -> Self {
        Self::none()
    }
}

/// Purchase and sale assumptions for the underlying property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAssumptions {
    pub purchase_price: f64,
    pub down_payment: f64,
    /// Annual fractional growth in home value
    pub appreciation: f64,
    /// Closing costs on purchase, fraction of purchase price
    pub purchase_cost_rate: f64,
    /// Closing costs on sale, fraction of sale price
    pub sale_cost_rate: f64,
}

impl PropertyAssumptions {
    /// Derive the purchase from a loan amount and a down payment fraction
    pub fn from_loan(
        principal: f64,
        down_payment_fraction: f64,
        appreciation: f64,
        purchase_cost_rate: f64,
        sale_cost_rate: f64,
    ) -> Self {
        let purchase_price = principal / (1.0 - down_payment_fraction);
        Self {
            purchase_price,
            down_payment: purchase_price - principal,
            appreciation,
            purchase_cost_rate,
            sale_cost_rate,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.purchase_price.is_finite() || self.purchase_price <= 0.0 {
            return Err(MortgageError::invalid(
                "property.purchase_price",
                format!("must be positive, got {}", self.purchase_price),
            ));
        }
        if !self.down_payment.is_finite() || self.down_payment < 0.0 {
            return Err(MortgageError::invalid(
                "property.down_payment",
                format!("must not be negative, got {}", self.down_payment),
            ));
        }
        if !self.appreciation.is_finite() || self.appreciation <= -1.0 {
            return Err(MortgageError::invalid(
                "property.appreciation",
                format!("must be greater than -1, got {}", self.appreciation),
            ));
        }
        for (field, rate) in [
            ("property.purchase_cost_rate", self.purchase_cost_rate),
            ("property.sale_cost_rate", self.sale_cost_rate),
        ] {
            if !(0.0..1.0).contains(&rate) {
                return Err(MortgageError::invalid(
                    field,
                    format!("must be in [0, 1), got {}", rate),
                ));
            }
        }
        Ok(())
    }
}

/// Complete, immutable input to a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Original loan amount
    pub principal: f64,

    /// Full amortization length, in payment periods
    pub amortization_periods: u32,

    /// Number of periods simulated and reported
    pub horizon_periods: u32,

    pub frequency: PaymentFrequency,

    pub fixed: FixedRateParams,

    pub variable: VariableRateParams,

    /// Fraction of principal placed in the fixed portion of a split mortgage
    pub split_ratio: f64,

    #[serde(default)]
    pub rate_cuts: RateCutPlan,

    #[serde(default)]
    pub prepayment: PrepaymentPlan,

    pub property: PropertyAssumptions,
}

impl Configuration {
    /// Check every input constraint; the first violation is reported
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(MortgageError::invalid(
                "principal",
                format!("must be positive, got {}", self.principal),
            ));
        }
        if self.amortization_periods == 0 {
            return Err(MortgageError::invalid(
                "amortization_periods",
                "must be at least 1",
            ));
        }
        if self.horizon_periods == 0 {
            return Err(MortgageError::invalid("horizon_periods", "must be at least 1"));
        }
        if self.horizon_periods > self.amortization_periods {
            return Err(MortgageError::invalid(
                "horizon_periods",
                format!(
                    "{} exceeds amortization_periods {}",
                    self.horizon_periods, self.amortization_periods
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.split_ratio) {
            return Err(MortgageError::invalid(
                "split_ratio",
                format!("must be in [0, 1], got {}", self.split_ratio),
            ));
        }

        for (field, rate) in [
            ("fixed.initial_rate", self.fixed.initial_rate),
            ("fixed.renewal_rate", self.fixed.renewal_rate),
            ("variable.prime_rate", self.variable.prime_rate),
            ("variable.discount", self.variable.discount),
            ("variable.renewal_discount", self.variable.renewal_discount),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(MortgageError::invalid(
                    field,
                    format!("must be a non-negative rate, got {}", rate),
                ));
            }
        }
        if self.fixed.term_years == 0 {
            return Err(MortgageError::invalid("fixed.term_years", "must be at least 1"));
        }
        if self.variable.term_years == 0 {
            return Err(MortgageError::invalid("variable.term_years", "must be at least 1"));
        }

        self.rate_cuts.validate()?;
        self.prepayment.validate()?;
        self.property.validate()?;
        Ok(())
    }

    pub fn periods_per_year(&self) -> u32 {
        self.frequency.periods_per_year()
    }

    /// Whole years covered by the horizon
    pub fn horizon_years(&self) -> u32 {
        self.horizon_periods / self.periods_per_year()
    }

    pub fn fixed_term_periods(&self) -> u32 {
        self.fixed.term_years * self.periods_per_year()
    }

    pub fn variable_term_periods(&self) -> u32 {
        self.variable.term_years * self.periods_per_year()
    }
}
