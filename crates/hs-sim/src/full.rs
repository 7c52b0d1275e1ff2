//! Full-fidelity first-year simulation.

use crate::dispatch::{Dispatcher, HydrogenSystem, UnitRating};
use crate::error::{SimError, SimResult};
use crate::options::SimOptions;
use crate::results::{EnergyBalance, HydrogenSummary, SimulationResults, UnitSummary};
use crate::sizing::{PlantConstants, PlantSizing};
use crate::timeseries::TimeSeries;
use hs_battery::Battery;
use hs_hydrogen::{ElectroThermalUnit, TankBank};
use tracing::debug;

/// Tank bank and compressor draw for a sizing.
pub(crate) fn tank_bank(sizing: &PlantSizing, options: &SimOptions) -> SimResult<(TankBank, f64)> {
    let tanks = TankBank::new(
        &options.storage,
        sizing.high_pressure_tank_kg,
        options.timestep_per_hour,
    )?;
    let compressor_kw = options.compressor.specific_work_kwh_per_kg()
        * tanks.transfer_per_step_kg()
        * options.timestep_per_hour as f64;
    Ok((tanks, compressor_kw))
}

pub(crate) fn check_inputs(series: &TimeSeries, sizing: &PlantSizing, options: &SimOptions) -> SimResult<()> {
    options.validate()?;
    sizing.validate()?;
    series.validate()?;
    if series.is_empty() {
        return Err(SimError::InvalidArg {
            what: "time series is empty",
        });
    }
    Ok(())
}

fn rating(unit: &ElectroThermalUnit) -> UnitRating {
    UnitRating {
        nominal_kw: unit.nominal_power_kw(),
        min_kw: unit.min_power_kw(),
    }
}

/// Simulate one year at full fidelity: degrading battery and
/// electro-thermal conversion units.
pub fn run_full_year(
    series: &TimeSeries,
    sizing: &PlantSizing,
    constants: &PlantConstants,
    options: &SimOptions,
) -> SimResult<SimulationResults> {
    check_inputs(series, sizing, options)?;
    let tph = options.timestep_per_hour;

    let battery = Battery::new(
        sizing.battery_kwh,
        options.initial_soc,
        tph,
        options.cycle_count_cadence,
    )?;

    let hydrogen = if sizing.hydrogen_enabled() {
        let electrolyzer = ElectroThermalUnit::electrolyzer(sizing.electrolyzer_cells, tph)?;
        let fuel_cell = ElectroThermalUnit::fuel_cell(sizing.fuel_cell_stacks, tph)?;
        let (tanks, compressor_kw) = tank_bank(sizing, options)?;
        let (electrolyzer_rating, fuel_cell_rating) = (rating(&electrolyzer), rating(&fuel_cell));
        Some(HydrogenSystem::new(
            electrolyzer,
            electrolyzer_rating,
            fuel_cell,
            fuel_cell_rating,
            tanks,
            compressor_kw,
        ))
    } else {
        None
    };

    let mut dispatcher = Dispatcher::new(battery, hydrogen, tph, constants.pv_factor(sizing.pv_increments));
    let trace = dispatcher.run(series, options.record_trace);
    let totals = dispatcher.totals().clone();
    let final_soh = dispatcher.battery.state().soh;

    let (electrolyzer, fuel_cell, tanks) = match &dispatcher.hydrogen {
        Some(h) => {
            let el = UnitSummary::new(
                &totals.electrolyzer_factor,
                h.electrolyzer.params().initial_factor_kg_per_kwh,
                h.electrolyzer.factor_at_nominal_temperature(),
                h.electrolyzer.working_hours(),
            );
            let fc = UnitSummary::new(
                &totals.fuel_cell_factor,
                h.fuel_cell.params().initial_factor_kg_per_kwh,
                h.fuel_cell.factor_at_nominal_temperature(),
                h.fuel_cell.working_hours(),
            );
            (Some(el), Some(fc), Some(&h.tanks))
        }
        None => (None, None, None),
    };

    let hydrogen = HydrogenSummary {
        produced_kg: totals.hydrogen_produced_kg,
        compressed_kg: totals.hydrogen_compressed_kg,
        consumed_kg: totals.hydrogen_consumed_kg,
        final_low_pressure_kg: tanks.map_or(0.0, |t| t.low_pressure_kg()),
        final_high_pressure_kg: tanks.map_or(0.0, |t| t.high_pressure_kg()),
        compressor_batches: totals.compressor_batches,
    };

    let results = SimulationResults {
        sizing: *sizing,
        pv_kwp: constants.pv_kwp(sizing.pv_increments),
        low_pressure_tank_kg: options.storage.low_pressure_capacity_kg,
        final_soh,
        electrolyzer,
        fuel_cell,
        hydrogen,
        energy: EnergyBalance::from_totals(&totals, tph),
        trace,
    };
    debug!(
        soh = results.final_soh,
        deficit_mwh = results.energy.deficit,
        produced_kg = results.hydrogen.produced_kg,
        "full-fidelity year finished"
    );
    Ok(results)
}
