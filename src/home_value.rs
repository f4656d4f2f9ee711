//! Projected sale of the property at the end of the analysis horizon
//!
//! Appreciation compounds annually over whole horizon years, independent of the
//! payment cadence. Each strategy's figures differ only through its ending balance.

use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::error::{MortgageError, Result};
use crate::strategy::StrategyKind;

/// Sale-scenario figures for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeValueResult {
    pub strategy: StrategyKind,
    pub name: String,
    pub horizon_years: u32,

    pub home_value: f64,
    /// Sale price net of selling costs, before paying off the mortgage
    pub gross_proceeds: f64,
    pub selling_costs: f64,
    pub remaining_balance: f64,
    pub net_cash_on_sale: f64,

    pub down_payment: f64,
    pub buying_costs: f64,
    pub initial_investment: f64,

    pub total_return: f64,
    pub roi_pct: f64,

    pub appreciation_gain: f64,
    pub equity_built_through_payments: f64,
}

/// Value the property at the horizon and net out each strategy's remaining balance
pub fn project_home_values(
    config: &Configuration,
    ending_balances: &[(StrategyKind, f64)],
) -> Result<Vec<HomeValueResult>> {
    config.validate()?;

    let property = &config.property;
    let horizon_years = config.horizon_years();
    let home_value = property.purchase_price * (1.0 + property.appreciation).powi(horizon_years as i32);
    let selling_costs = home_value * property.sale_cost_rate;
    let gross_proceeds = home_value - selling_costs;
    let buying_costs = property.purchase_price * property.purchase_cost_rate;
    let initial_investment = property.down_payment + buying_costs;

    ending_balances
        .iter()
        .map(|&(strategy, remaining_balance)| {
            if !remaining_balance.is_finite() || remaining_balance < 0.0 {
                return Err(MortgageError::invalid(
                    "ending_balance",
                    format!("{} balance must be non-negative, got {}", strategy.label(), remaining_balance),
                ));
            }

            let net_cash_on_sale = gross_proceeds - remaining_balance;
            let total_return = net_cash_on_sale - initial_investment;
            let roi_pct = if initial_investment > 0.0 {
                total_return / initial_investment * 100.0
            } else {
                0.0
            };

            Ok(HomeValueResult {
                strategy,
                name: strategy.display_name(config),
                horizon_years,
                home_value,
                gross_proceeds,
                selling_costs,
                remaining_balance,
                net_cash_on_sale,
                down_payment: property.down_payment,
                buying_costs,
                initial_investment,
                total_return,
                roi_pct,
                appreciation_gain: home_value - property.purchase_price,
                equity_built_through_payments: config.principal - remaining_balance,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_three_year_projection() {
        let config = sample_config();
        let results = project_home_values(&config, &[(StrategyKind::Fixed, 620_000.0)]).unwrap();
        let r = &results[0];

        // 672k loan at 20% down: 840k purchase, 168k down
        assert_eq!(r.horizon_years, 3);
        assert_abs_diff_eq!(r.home_value, 840_000.0 * 1.05f64.powi(3), epsilon = 1e-6);
        assert_abs_diff_eq!(r.selling_costs, r.home_value * 0.05, epsilon = 1e-6);
        assert_abs_diff_eq!(r.gross_proceeds, r.home_value * 0.95, epsilon = 1e-6);
        assert_abs_diff_eq!(r.net_cash_on_sale, r.home_value * 0.95 - 620_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.initial_investment, 168_000.0 + 840_000.0 * 0.015, epsilon = 1e-6);
        assert_abs_diff_eq!(r.total_return, r.net_cash_on_sale - r.initial_investment, epsilon = 1e-9);
        assert_abs_diff_eq!(r.roi_pct, r.total_return / r.initial_investment * 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.equity_built_through_payments, 52_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_only_balance_differs_between_strategies() {
        let config = sample_config();
        let results = project_home_values(
            &config,
            &[(StrategyKind::Fixed, 600_000.0), (StrategyKind::Split, 610_000.0)],
        )
        .unwrap();

        assert_eq!(results[0].home_value, results[1].home_value);
        assert_abs_diff_eq!(results[0].net_cash_on_sale - results[1].net_cash_on_sale, 10_000.0, epsilon = 1e-6);
        assert_eq!(results[1].name, "50/50 Split");
    }

    #[test]
    fn test_partial_years_do_not_appreciate() {
        let mut config = sample_config();
        config.horizon_periods = 35;
        let results = project_home_values(&config, &[(StrategyKind::Fixed, 0.0)]).unwrap();
        assert_eq!(results[0].horizon_years, 2);
        assert_abs_diff_eq!(results[0].home_value, config.property.purchase_price * 1.05f64.powi(2), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_initial_investment_reports_zero_roi() {
        let mut config = sample_config();
        config.property.down_payment = 0.0;
        config.property.purchase_cost_rate = 0.0;
        let results = project_home_values(&config, &[(StrategyKind::Fixed, 600_000.0)]).unwrap();
        assert_eq!(results[0].initial_investment, 0.0);
        assert_eq!(results[0].roi_pct, 0.0);
    }

    #[test]
    fn test_rejects_negative_balance() {
        let config = sample_config();
        assert!(project_home_values(&config, &[(StrategyKind::Fixed, -1.0)]).is_err());
    }
}
