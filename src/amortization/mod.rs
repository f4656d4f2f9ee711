//! Amortization engine for a single loan or loan portion

mod state;
mod engine;
mod ledger;

pub use state::{AmortizationState, PaymentReset};
pub use engine::{AmortizationEngine, LoanTerms, PaymentPolicy};
pub use ledger::{Ledger, LedgerRow};
