//! Mortgage Simulator - period-by-period comparison of Canadian mortgage strategies
//!
//! This library provides:
//! - Semi-annually compounded payment math for monthly, biweekly and accelerated schedules
//! - Fixed, variable and blended rate paths with scheduled rate cuts
//! - An amortization engine with frozen or recalculated payments, renewals and prepayments
//! - Strategy comparison (fixed, variable, split) with summary statistics
//! - Home value and net-proceeds projection at the end of the horizon
//! - CSV and text report export

pub mod amortization;
pub mod config;
pub mod error;
pub mod export;
pub mod home_value;
pub mod rates;
pub mod scenario;
pub mod strategy;

// Re-export commonly used types
pub use amortization::{AmortizationEngine, Ledger, LedgerRow, LoanTerms, PaymentPolicy};
pub use config::{Configuration, PaymentFrequency, PrepaymentPlan, RateCutPlan, ScenarioFile};
pub use error::{MortgageError, Result};
pub use home_value::{project_home_values, HomeValueResult};
pub use rates::{RatePath, RateSchedule};
pub use scenario::{simulate, ScenarioResult, ScenarioRunner};
pub use strategy::{run_strategies, SimulationResult, StrategyKind, StrategySummary};
