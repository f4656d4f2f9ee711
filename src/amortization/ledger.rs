//! Ledger output structures for amortization runs

use serde::{Deserialize, Serialize};

/// One payment period of an amortization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// 1-based payment period
    pub period: u32,

    /// Effective annual rate, `None` once the loan is paid off
    pub annual_rate: Option<f64>,

    /// Installment paid this period (capped at balance plus interest on payoff)
    pub payment: f64,

    pub interest: f64,

    /// Principal repaid by the installment; negative under negative amortization
    pub principal: f64,

    /// Extra principal paid on top of the installment
    pub prepayment: f64,

    pub ending_balance: f64,

    /// Installment did not cover interest, so the balance grew
    pub negative_amortization: bool,
}

impl LedgerRow {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            annual_rate: None,
            payment: 0.0,
            interest: 0.0,
            principal: 0.0,
            prepayment: 0.0,
            ending_balance: 0.0,
            negative_amortization: false,
        }
    }

    /// Row emitted for periods after the loan has been retired
    pub fn paid_off(period: u32) -> Self {
        Self::new(period)
    }

    /// Installment plus prepayment
    pub fn total_paid(&self) -> f64 {
        self.payment + self.prepayment
    }

    pub fn is_paid_off(&self) -> bool {
        self.annual_rate.is_none()
    }
}

/// Ordered rows of one amortization run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub rows: Vec<LedgerRow>,
}

impl Ledger {
    pub fn with_capacity(periods: u32) -> Self {
        Self {
            rows: Vec::with_capacity(periods as usize),
        }
    }

    pub fn add_row(&mut self, row: LedgerRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Balance after the last reported period
    pub fn ending_balance(&self) -> f64 {
        self.rows.last().map(|r| r.ending_balance).unwrap_or(0.0)
    }

    pub fn row(&self, period: u32) -> Option<&LedgerRow> {
        period
            .checked_sub(1)
            .and_then(|idx| self.rows.get(idx as usize))
    }

    pub fn total_payments(&self) -> f64 {
        self.rows.iter().map(LedgerRow::total_paid).sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|r| r.interest).sum()
    }

    pub fn total_principal(&self) -> f64 {
        self.rows.iter().map(|r| r.principal).sum()
    }

    pub fn total_prepayments(&self) -> f64 {
        self.rows.iter().map(|r| r.prepayment).sum()
    }

    /// Periods where the rate differs from the previous period, starting with period 1
    pub fn rate_progression(&self) -> Vec<(u32, f64)> {
        let mut points: Vec<(u32, f64)> = Vec::new();
        for row in &self.rows {
            let Some(rate) = row.annual_rate else { continue };
            match points.last() {
                Some(&(_, last)) if (rate - last).abs() < 1e-12 => {}
                _ => points.push((row.period, rate)),
            }
        }
        points
    }

    pub fn negative_amortization_periods(&self) -> Vec<u32> {
        self.rows
            .iter()
            .filter(|r| r.negative_amortization)
            .map(|r| r.period)
            .collect()
    }
}
