//! Reduced-fidelity annual run used for the years after the first.

use crate::dispatch::{Dispatcher, HydrogenSystem, UnitRating};
use crate::error::{SimError, SimResult};
use crate::full::{check_inputs, tank_bank};
use crate::options::SimOptions;
use crate::results::{AnnualRow, EnergyBalance};
use crate::sizing::{PlantConstants, PlantSizing};
use crate::timeseries::TimeSeries;
use hs_battery::ConstantEfficiencyBattery;
use hs_hydrogen::{ELECTROLYZER, FUEL_CELL, FixedFactor, UnitParams};
use serde::{Deserialize, Serialize};

/// Year-specific state carried into a reduced run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReducedYearInputs {
    /// Capacity after the year's fade [kWh]
    pub battery_capacity_kwh: f64,
    pub electrolyzer_factor_kg_per_kwh: f64,
    pub fuel_cell_factor_kg_per_kwh: f64,
}

fn rating(params: &UnitParams, units: u32) -> UnitRating {
    let nominal_kw = units as f64 * params.power_per_unit_kw;
    UnitRating {
        nominal_kw,
        min_kw: params.min_power_fraction * nominal_kw,
    }
}

/// Constant-efficiency battery and fixed conversion factors; no
/// degradation is tracked within the year.
pub fn run_reduced_year(
    series: &TimeSeries,
    sizing: &PlantSizing,
    constants: &PlantConstants,
    options: &SimOptions,
    inputs: &ReducedYearInputs,
    year: u32,
) -> SimResult<AnnualRow> {
    check_inputs(series, sizing, options)?;
    if !(inputs.electrolyzer_factor_kg_per_kwh.is_finite()
        && inputs.fuel_cell_factor_kg_per_kwh.is_finite()
        && inputs.electrolyzer_factor_kg_per_kwh >= 0.0
        && inputs.fuel_cell_factor_kg_per_kwh >= 0.0)
    {
        return Err(SimError::NonPhysical {
            what: "conversion factors must be finite and non-negative",
        });
    }
    let tph = options.timestep_per_hour;

    let battery = ConstantEfficiencyBattery::new(inputs.battery_capacity_kwh, options.initial_soc, tph)?;
    let hydrogen = if sizing.hydrogen_enabled() {
        let (tanks, compressor_kw) = tank_bank(sizing, options)?;
        Some(HydrogenSystem::new(
            FixedFactor {
                factor_kg_per_kwh: inputs.electrolyzer_factor_kg_per_kwh,
            },
            rating(&ELECTROLYZER, sizing.electrolyzer_cells),
            FixedFactor {
                factor_kg_per_kwh: inputs.fuel_cell_factor_kg_per_kwh,
            },
            rating(&FUEL_CELL, sizing.fuel_cell_stacks),
            tanks,
            compressor_kw,
        ))
    } else {
        None
    };

    let mut dispatcher = Dispatcher::new(battery, hydrogen, tph, constants.pv_factor(sizing.pv_increments));
    dispatcher.run(series, false);
    let totals = dispatcher.totals();

    Ok(AnnualRow {
        year,
        battery_capacity_kwh: inputs.battery_capacity_kwh,
        soh: 1.0,
        electrolyzer_factor_kg_per_mwh: inputs.electrolyzer_factor_kg_per_kwh * 1000.0,
        fuel_cell_factor_kg_per_mwh: inputs.fuel_cell_factor_kg_per_kwh * 1000.0,
        hydrogen_produced_kg: totals.hydrogen_produced_kg,
        hydrogen_compressed_kg: totals.hydrogen_compressed_kg,
        energy: EnergyBalance::from_totals(totals, tph),
    })
}
