//! Sizing evaluation: lifetime simulation followed by the cost roll-up.

use crate::error::AppResult;
use hs_economics::{Component, ComponentSizes, EconomicsConfig, LcoreBreakdown, component_sizes, lcore};
use hs_lifetime::{LifetimeRun, run_lifetime};
use hs_sim::{PlantConstants, PlantSizing, SearchSpace, SimOptions, TimeSeries};
use tracing::{debug, warn};

/// Everything needed to price one sizing. Holds no mutable state, so a
/// shared reference can be evaluated from many threads at once.
#[derive(Clone, Debug)]
pub struct Evaluator {
    pub series: TimeSeries,
    pub constants: PlantConstants,
    pub options: SimOptions,
    pub search: SearchSpace,
    pub economics: EconomicsConfig,
}

/// Full outcome of evaluating one sizing.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub sizing: PlantSizing,
    pub run: LifetimeRun,
    pub sizes: ComponentSizes,
    pub lcore: LcoreBreakdown,
}

impl Evaluator {
    pub fn evaluate_sizing(&self, sizing: &PlantSizing) -> AppResult<Evaluation> {
        let horizon = self.economics.horizon_years as usize;
        let run = run_lifetime(&self.series, sizing, &self.constants, &self.options, horizon)?;

        let sizes = component_sizes(&run.first_year, &self.constants);
        let lifetimes = run.projection.lifetimes;
        let extrapolated_lives = [
            (Component::Battery, lifetimes.battery as u32),
            (Component::Electrolyzer, lifetimes.electrolyzer as u32),
            (Component::FuelCell, lifetimes.fuel_cell as u32),
        ];
        let annual_load_mwh = run.first_year.energy.load;
        let inputs = self
            .economics
            .lcore_inputs(&sizes, &extrapolated_lives, annual_load_mwh)?;

        let unmet: Vec<f64> = run.rows.iter().map(|row| row.energy.deficit).collect();
        let breakdown = lcore(&inputs, &unmet)?;

        Ok(Evaluation {
            sizing: *sizing,
            run,
            sizes,
            lcore: breakdown,
        })
    }

    /// LCORE of a raw decision vector.
    pub fn lcore_of(&self, x: &[i64]) -> AppResult<f64> {
        let sizing = self.search.decode(x)?;
        Ok(self.evaluate_sizing(&sizing)?.lcore.lcore)
    }

    /// Objective seen by the optimizer: any failure is an infinite cost.
    pub fn objective(&self, x: &[i64]) -> f64 {
        match self.lcore_of(x) {
            Ok(value) if value.is_finite() => {
                debug!(config = ?x, lcore = value, "evaluation");
                value
            }
            Ok(value) => {
                warn!(config = ?x, lcore = value, "non-finite LCORE, treated as infeasible");
                f64::INFINITY
            }
            Err(e) => {
                warn!(config = ?x, error = %e, "evaluation failed, treated as infeasible");
                f64::INFINITY
            }
        }
    }
}
