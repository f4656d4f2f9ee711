//! Scenario files, environment overrides and named presets
//!
//! Scenario inputs are expressed in user units (years, annual decimal rates, a month list of
//! equal-sized cuts) and converted into a validated [`Configuration`].

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{
    Configuration, FixedRateParams, PaymentFrequency, PrepaymentMode, PrepaymentPlan,
    PropertyAssumptions, RateCutPlan, VariableRateParams,
};
use crate::error::{MortgageError, Result};

/// Names accepted by [`ScenarioFile::preset`]
pub const PRESET_NAMES: [&str; 3] = ["conservative", "aggressive", "high_loan"];

/// Scenario as written in a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default = "default_loan_amount")]
    pub loan_amount: f64,

    #[serde(default = "default_amortization_years")]
    pub amortization_years: u32,

    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,

    #[serde(default)]
    pub payment_frequency: PaymentFrequency,

    #[serde(default = "default_fixed_initial_rate")]
    pub fixed_initial_rate: f64,

    #[serde(default = "default_fixed_term_years")]
    pub fixed_term_years: u32,

    #[serde(default = "default_fixed_renewal_rate")]
    pub fixed_renewal_rate: f64,

    #[serde(default = "default_prime_rate")]
    pub prime_rate: f64,

    #[serde(default = "default_variable_discount")]
    pub variable_discount_initial: f64,

    #[serde(default = "default_variable_term_years")]
    pub variable_term_years: u32,

    #[serde(default = "default_variable_renewal_discount")]
    pub variable_renewal_discount: f64,

    #[serde(default = "default_true")]
    pub variable_fixed_payment: bool,

    #[serde(default = "default_true")]
    pub use_rate_cuts: bool,

    #[serde(default = "default_rate_cut_amount")]
    pub rate_cut_amount: f64,

    #[serde(default = "default_cut_schedule")]
    pub cut_schedule: Vec<u32>,

    #[serde(default = "default_split_ratio")]
    pub split_ratio: f64,

    #[serde(default = "default_prepayment_mode")]
    pub prepayment_mode: PrepaymentMode,

    #[serde(default)]
    pub prepayment_amount: f64,

    #[serde(default = "default_prepayment_start")]
    pub prepayment_start_period: u32,

    /// Defaults to loan / (1 - down payment) when absent
    #[serde(default)]
    pub purchase_price: Option<f64>,

    #[serde(default = "default_down_payment_percent")]
    pub down_payment_percent: f64,

    #[serde(default = "default_appreciation")]
    pub annual_appreciation: f64,

    #[serde(default = "default_buying_costs")]
    pub buying_closing_costs_rate: f64,

    #[serde(default = "default_selling_costs")]
    pub selling_closing_costs_rate: f64,
}

fn default_loan_amount() -> f64 {
    672_000.0
}

fn default_amortization_years() -> u32 {
    30
}

fn default_horizon_years() -> u32 {
    3
}

fn default_fixed_initial_rate() -> f64 {
    0.0389
}

fn default_fixed_term_years() -> u32 {
    3
}

fn default_fixed_renewal_rate() -> f64 {
    0.032
}

fn default_prime_rate() -> f64 {
    0.0495
}

fn default_variable_discount() -> f64 {
    0.0085
}

fn default_variable_term_years() -> u32 {
    5
}

fn default_variable_renewal_discount() -> f64 {
    0.005
}

fn default_true() -> bool {
    true
}

fn default_rate_cut_amount() -> f64 {
    0.0025
}

fn default_cut_schedule() -> Vec<u32> {
    vec![6, 12, 18, 24]
}

fn default_split_ratio() -> f64 {
    0.5
}

fn default_prepayment_mode() -> PrepaymentMode {
    PrepaymentMode::None
}

fn default_prepayment_start() -> u32 {
    1
}

fn default_down_payment_percent() -> f64 {
    20.0
}

fn default_appreciation() -> f64 {
    0.05
}

fn default_buying_costs() -> f64 {
    0.015
}

fn default_selling_costs() -> f64 {
    0.05
}

impl Default for ScenarioFile {
    fn default() -> Self {
        Self {
            loan_amount: default_loan_amount(),
            amortization_years: default_amortization_years(),
            horizon_years: default_horizon_years(),
            payment_frequency: PaymentFrequency::default(),
            fixed_initial_rate: default_fixed_initial_rate(),
            fixed_term_years: default_fixed_term_years(),
            fixed_renewal_rate: default_fixed_renewal_rate(),
            prime_rate: default_prime_rate(),
            variable_discount_initial: default_variable_discount(),
            variable_term_years: default_variable_term_years(),
            variable_renewal_discount: default_variable_renewal_discount(),
            variable_fixed_payment: true,
            use_rate_cuts: true,
            rate_cut_amount: default_rate_cut_amount(),
            cut_schedule: default_cut_schedule(),
            split_ratio: default_split_ratio(),
            prepayment_mode: PrepaymentMode::None,
            prepayment_amount: 0.0,
            prepayment_start_period: default_prepayment_start(),
            purchase_price: None,
            down_payment_percent: default_down_payment_percent(),
            annual_appreciation: default_appreciation(),
            buying_closing_costs_rate: default_buying_costs(),
            selling_closing_costs_rate: default_selling_costs(),
        }
    }
}

impl ScenarioFile {
    /// Load a scenario from a JSON file; missing keys take their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let scenario = serde_json::from_reader(BufReader::new(file))?;
        info!("Loaded scenario from {}", path.as_ref().display());
        Ok(scenario)
    }

    /// Built-in scenario by name
    pub fn preset(name: &str) -> Result<Self> {
        let base = Self::default();
        match name {
            // Two gradual cuts
            "conservative" => Ok(Self {
                cut_schedule: vec![12, 24],
                ..base
            }),
            // Four front-loaded cuts
            "aggressive" => Ok(Self {
                cut_schedule: vec![3, 6, 9, 12],
                ..base
            }),
            "high_loan" => Ok(Self {
                loan_amount: 1_000_000.0,
                horizon_years: 5,
                ..base
            }),
            other => Err(MortgageError::UnknownPreset(other.to_string())),
        }
    }

    /// Override fields from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    /// Override fields from any key lookup (environment, test maps)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_with(&lookup, "LOAN_AMOUNT", &mut self.loan_amount, parse_num)?;
        override_with(&lookup, "AMORTIZATION_YEARS", &mut self.amortization_years, parse_num)?;
        override_with(&lookup, "HORIZON_YEARS", &mut self.horizon_years, parse_num)?;
        override_with(&lookup, "FIXED_INITIAL_RATE", &mut self.fixed_initial_rate, parse_num)?;
        override_with(&lookup, "FIXED_TERM_YEARS", &mut self.fixed_term_years, parse_num)?;
        override_with(&lookup, "FIXED_RENEWAL_RATE", &mut self.fixed_renewal_rate, parse_num)?;
        override_with(&lookup, "PRIME_RATE", &mut self.prime_rate, parse_num)?;
        override_with(
            &lookup,
            "VARIABLE_DISCOUNT_INITIAL",
            &mut self.variable_discount_initial,
            parse_num,
        )?;
        override_with(&lookup, "VARIABLE_TERM_YEARS", &mut self.variable_term_years, parse_num)?;
        override_with(
            &lookup,
            "VARIABLE_RENEWAL_DISCOUNT",
            &mut self.variable_renewal_discount,
            parse_num,
        )?;
        override_with(
            &lookup,
            "VARIABLE_FIXED_PAYMENT",
            &mut self.variable_fixed_payment,
            parse_bool,
        )?;
        override_with(&lookup, "USE_RATE_CUTS", &mut self.use_rate_cuts, parse_bool)?;
        override_with(&lookup, "RATE_CUT_AMOUNT", &mut self.rate_cut_amount, parse_num)?;
        override_with(&lookup, "CUT_SCHEDULE", &mut self.cut_schedule, parse_list)?;
        override_with(&lookup, "SPLIT_RATIO", &mut self.split_ratio, parse_num)?;
        override_with(&lookup, "ANNUAL_APPRECIATION", &mut self.annual_appreciation, parse_num)?;
        override_with(
            &lookup,
            "PAYMENT_FREQUENCY",
            &mut self.payment_frequency,
            parse_frequency,
        )?;
        Ok(())
    }

    /// Convert to periods, build the property assumptions, and validate
    pub fn into_configuration(self) -> Result<Configuration> {
        let ppy = self.payment_frequency.periods_per_year();

        let rate_cuts = if self.use_rate_cuts {
            let mut months = self.cut_schedule.clone();
            months.sort_unstable();
            RateCutPlan::uniform(&months, self.rate_cut_amount)
        } else {
            RateCutPlan::none()
        };

        let down_fraction = self.down_payment_percent / 100.0;
        if !(0.0..1.0).contains(&down_fraction) {
            return Err(MortgageError::invalid(
                "down_payment_percent",
                format!("must be in [0, 100), got {}", self.down_payment_percent),
            ));
        }
        let property = match self.purchase_price {
            Some(price) => PropertyAssumptions {
                purchase_price: price,
                down_payment: price - self.loan_amount,
                appreciation: self.annual_appreciation,
                purchase_cost_rate: self.buying_closing_costs_rate,
                sale_cost_rate: self.selling_closing_costs_rate,
            },
            None => PropertyAssumptions::from_loan(
                self.loan_amount,
                down_fraction,
                self.annual_appreciation,
                self.buying_closing_costs_rate,
                self.selling_closing_costs_rate,
            ),
        };

        let config = Configuration {
            principal: self.loan_amount,
            amortization_periods: self.amortization_years * ppy,
            horizon_periods: self.horizon_years * ppy,
            frequency: self.payment_frequency,
            fixed: FixedRateParams {
                initial_rate: self.fixed_initial_rate,
                term_years: self.fixed_term_years,
                renewal_rate: self.fixed_renewal_rate,
            },
            variable: VariableRateParams {
                prime_rate: self.prime_rate,
                discount: self.variable_discount_initial,
                term_years: self.variable_term_years,
                renewal_discount: self.variable_renewal_discount,
                fixed_payment: self.variable_fixed_payment,
            },
            split_ratio: self.split_ratio,
            rate_cuts,
            prepayment: PrepaymentPlan {
                mode: self.prepayment_mode,
                amount: self.prepayment_amount,
                start_period: self.prepayment_start_period,
            },
            property,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| MortgageError::EnvVar {
        name: name.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Replace `target` when the lookup has a value for `name`
fn override_with<T, F, P>(lookup: &F, name: &str, target: &mut T, parse: P) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str, &str) -> Result<T>,
{
    if let Some(value) = lookup(name) {
        *target = parse(name, &value)?;
    }
    Ok(())
}

fn parse_bool(_name: &str, value: &str) -> Result<bool> {
    Ok(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    ))
}

fn parse_frequency(name: &str, value: &str) -> Result<PaymentFrequency> {
    PaymentFrequency::parse(value).ok_or_else(|| MortgageError::EnvVar {
        name: name.to_string(),
        value: value.to_string(),
        reason: "expected monthly, biweekly, accelerated-biweekly or accelerated-monthly"
            .to_string(),
    })
}

fn parse_list(name: &str, value: &str) -> Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_num(name, s))
        .collect()
}
