//! Scenario runner: strategy comparison plus home-value projection in one call
//!
//! Holds a validated base configuration so callers can run it, tweak it, or fan a
//! batch of variants out across threads.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{Configuration, ScenarioFile};
use crate::error::Result;
use crate::home_value::{project_home_values, HomeValueResult};
use crate::strategy::{run_strategies, SimulationResult};

/// Everything produced for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub config: Configuration,
    pub simulation: SimulationResult,
    pub home_values: Vec<HomeValueResult>,
}

impl ScenarioResult {
    /// Strategy with the largest net cash on sale, first on ties
    pub fn best_net_cash(&self) -> Option<&HomeValueResult> {
        self.home_values
            .iter()
            .reduce(|best, r| if r.net_cash_on_sale > best.net_cash_on_sale { r } else { best })
    }
}

/// Run every strategy and project the sale for one configuration
pub fn simulate(config: &Configuration) -> Result<ScenarioResult> {
    let simulation = run_strategies(config)?;
    let home_values = project_home_values(config, &simulation.ending_balances())?;

    Ok(ScenarioResult {
        config: config.clone(),
        simulation,
        home_values,
    })
}

/// Pre-validated scenario runner
///
/// # Example
/// ```ignore
/// let mut runner = ScenarioRunner::from_preset("conservative")?;
/// let base = runner.run()?;
///
/// runner.base_mut().split_ratio = 0.7;
/// let tilted = runner.run()?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: Configuration,
}

impl ScenarioRunner {
    pub fn new(base: Configuration) -> Result<Self> {
        base.validate()?;
        Ok(Self { base })
    }

    /// Runner for a named preset
    pub fn from_preset(name: &str) -> Result<Self> {
        Self::new(ScenarioFile::preset(name)?.into_configuration()?)
    }

    pub fn run(&self) -> Result<ScenarioResult> {
        simulate(&self.base)
    }

    /// Run variants of the base configuration, one per input value
    pub fn run_variants<T, F>(&self, values: &[T], apply: F) -> Vec<Result<ScenarioResult>>
    where
        T: Sync,
        F: Fn(&mut Configuration, &T) + Sync,
    {
        let configs: Vec<Configuration> = values
            .iter()
            .map(|value| {
                let mut config = self.base.clone();
                apply(&mut config, value);
                config
            })
            .collect();
        Self::run_batch(&configs)
    }

    /// Run independent configurations in parallel; results keep input order
    pub fn run_batch(configs: &[Configuration]) -> Vec<Result<ScenarioResult>> {
        info!("Running {} scenarios", configs.len());
        configs.par_iter().map(simulate).collect()
    }

    pub fn base(&self) -> &Configuration {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut Configuration {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::sample_config;
    use crate::strategy::StrategyKind;

    #[test]
    fn test_simulate_joins_balances() {
        let result = simulate(&sample_config()).unwrap();
        assert_eq!(result.home_values.len(), 4);

        for hv in &result.home_values {
            let ledger = &result.simulation.get(hv.strategy).unwrap().ledger;
            assert_eq!(hv.remaining_balance, ledger.ending_balance());
        }
        assert!(result.best_net_cash().is_some());
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        let mut config = sample_config();
        config.horizon_periods = 0;
        assert!(ScenarioRunner::new(config).is_err());
    }

    #[test]
    fn test_split_ratio_variants() {
        let runner = ScenarioRunner::new(sample_config()).unwrap();
        let results = runner.run_variants(&[0.0, 0.5, 1.0], |config, &ratio| config.split_ratio = ratio);

        assert_eq!(results.len(), 3);
        let names: Vec<String> = results
            .iter()
            .map(|r| r.as_ref().unwrap().simulation.get(StrategyKind::Split).unwrap().summary.name.clone())
            .collect();
        assert_eq!(names, vec!["0/100 Split", "50/50 Split", "100/0 Split"]);
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let good = sample_config();
        let mut bad = sample_config();
        bad.principal = -1.0;
        let mut longer = sample_config();
        longer.horizon_periods = 60;

        let results = ScenarioRunner::run_batch(&[good, bad, longer]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        let longer = results[2].as_ref().unwrap();
        assert_eq!(longer.simulation.get(StrategyKind::Fixed).unwrap().ledger.len(), 60);
    }

    #[test]
    fn test_presets_run() {
        for name in crate::config::PRESET_NAMES {
            let result = ScenarioRunner::from_preset(name).unwrap().run().unwrap();
            assert_eq!(result.simulation.strategies.len(), 4);
        }
        assert!(ScenarioRunner::from_preset("nonexistent").is_err());
    }
}
