//! Per-year battery capacity and conversion factors over the horizon.

use crate::battery_fade::fit_battery_fade;
use crate::conversion_fade::{
    ELECTROLYZER_SOH_SENSITIVITY, electrolyzer_trajectory, fuel_cell_trajectory,
    nominal_trajectories,
};
use crate::error::{LifetimeError, LifetimeResult};
use crate::horizon::cycle_to_horizon;
use hs_sim::SimulationResults;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Useful life found by each trajectory [years].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLifetimes {
    pub battery: usize,
    pub electrolyzer: usize,
    pub fuel_cell: usize,
}

/// Index `i` describes project year `i + 1`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub horizon_years: usize,
    pub lifetimes: ComponentLifetimes,
    /// Year-average usable capacity [kWh]
    pub battery_capacity_kwh: Vec<f64>,
    /// Year-average factors [kg/MWh]
    pub electrolyzer_factor_kg_per_mwh: Vec<f64>,
    pub fuel_cell_factor_kg_per_mwh: Vec<f64>,
    /// Hydrogen units lacked first-year data; fresh factors are used
    pub nominal_factors: bool,
}

pub fn project(first: &SimulationResults, horizon_years: usize) -> LifetimeResult<Projection> {
    if horizon_years == 0 {
        return Err(LifetimeError::InvalidArg {
            what: "horizon must be at least one year",
        });
    }
    let battery_kwh = first.sizing.battery_kwh;
    let fade = fit_battery_fade(first.final_soh, battery_kwh)?;
    let soh = cycle_to_horizon(&fade.yearly_soh, horizon_years)?;
    let battery_capacity_kwh: Vec<f64> = cycle_to_horizon(&fade.year_average_soh, horizon_years)?
        .into_iter()
        .map(|s| s * battery_kwh)
        .collect();

    let first_year_units = match (first.electrolyzer, first.fuel_cell) {
        (Some(el), Some(fc)) if el.ran() && fc.ran() => Some((el, fc)),
        _ => None,
    };

    let (lifetimes, electrolyzer_factor_kg_per_mwh, fuel_cell_factor_kg_per_mwh, nominal_factors) =
        match first_year_units {
            Some((el, fc)) => {
                let el_traj = electrolyzer_trajectory(el.end_factor_kg_per_mwh)?;
                let el_end = cycle_to_horizon(&el_traj.yearly_factor_kg_per_mwh, horizon_years)?;
                let temperature_gap = el.end_factor_kg_per_mwh - el.mean_factor_kg_per_mwh;
                let el_avg: Vec<f64> = el_end
                    .iter()
                    .zip(&soh)
                    .map(|(end, s)| {
                        end - (ELECTROLYZER_SOH_SENSITIVITY * (s - first.final_soh) + temperature_gap)
                    })
                    .collect();

                let fc_traj = fuel_cell_trajectory(fc.mean_factor_kg_per_mwh, battery_kwh);
                let fc_avg = cycle_to_horizon(&fc_traj.yearly_factor_kg_per_mwh, horizon_years)?;
                let lifetimes = ComponentLifetimes {
                    battery: fade.life_years(),
                    electrolyzer: el_traj.life_years(),
                    fuel_cell: fc_traj.life_years(),
                };
                (lifetimes, el_avg, fc_avg, false)
            }
            None => {
                let (el_traj, fc_traj) = nominal_trajectories();
                let lifetimes = ComponentLifetimes {
                    battery: fade.life_years(),
                    electrolyzer: el_traj.life_years(),
                    fuel_cell: fc_traj.life_years(),
                };
                (
                    lifetimes,
                    cycle_to_horizon(&el_traj.yearly_factor_kg_per_mwh, horizon_years)?,
                    cycle_to_horizon(&fc_traj.yearly_factor_kg_per_mwh, horizon_years)?,
                    true,
                )
            }
        };

    let projection = Projection {
        horizon_years,
        lifetimes,
        battery_capacity_kwh,
        electrolyzer_factor_kg_per_mwh,
        fuel_cell_factor_kg_per_mwh,
        nominal_factors,
    };
    for year in 0..horizon_years {
        debug!(
            year = year + 1,
            capacity_kwh = projection.battery_capacity_kwh[year],
            el_kg_per_mwh = projection.electrolyzer_factor_kg_per_mwh[year],
            fc_kg_per_mwh = projection.fuel_cell_factor_kg_per_mwh[year],
            "projected year"
        );
    }
    Ok(projection)
}
