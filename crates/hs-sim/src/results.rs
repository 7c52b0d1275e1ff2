//! Records returned by value from a simulation run.

use crate::dispatch::{ActiveFactor, DispatchTotals};
use crate::sizing::PlantSizing;
use hs_core::{energy_over, hours, kw, to_mwh};
use serde::{Deserialize, Serialize};

/// One dispatch step, kept only when tracing is requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: usize,
    pub renewable_kw: f64,
    pub load_kw: f64,
    /// Load plus compressor draw
    pub requested_kw: f64,
    pub after_battery_kw: f64,
    pub soc: f64,
    pub soh: f64,
    pub electrolyzer_kw: f64,
    pub hydrogen_produced_kg: f64,
    pub compressor_kw: f64,
    pub compressed_kg: f64,
    pub fuel_cell_kw: f64,
    pub hydrogen_consumed_kg: f64,
    pub low_pressure_kg: f64,
    pub high_pressure_kg: f64,
    pub excess_kw: f64,
    pub deficit_kw: f64,
}

/// Annual energy flows [MWh].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalance {
    pub renewable: f64,
    pub load: f64,
    pub excess_renewable: f64,
    pub deficit_renewable: f64,
    pub excess_after_battery: f64,
    pub deficit_after_battery: f64,
    pub to_hydrogen: f64,
    pub compressor: f64,
    pub from_fuel_cell: f64,
    /// Unmet load after every storage stage
    pub deficit: f64,
    /// Surplus absorbed by nothing
    pub excess: f64,
}

fn self_consumption(load: f64, deficit: f64) -> f64 {
    if load > 0.0 {
        (load - deficit) / load * 100.0
    } else {
        100.0
    }
}

impl EnergyBalance {
    pub fn from_totals(totals: &DispatchTotals, timestep_per_hour: u32) -> Self {
        let step = hours(1.0 / timestep_per_hour as f64);
        let mwh = |sum_kw: f64| to_mwh(energy_over(kw(sum_kw), step));
        Self {
            renewable: mwh(totals.renewable_kw),
            load: mwh(totals.load_kw),
            excess_renewable: mwh(totals.excess_renewable_kw),
            deficit_renewable: mwh(totals.deficit_renewable_kw),
            excess_after_battery: mwh(totals.excess_after_battery_kw),
            deficit_after_battery: mwh(totals.deficit_after_battery_kw),
            to_hydrogen: mwh(totals.to_hydrogen_kw),
            compressor: mwh(totals.compressor_kw),
            from_fuel_cell: mwh(totals.fuel_cell_kw),
            deficit: mwh(totals.deficit_kw),
            excess: mwh(totals.excess_kw),
        }
    }

    /// Share of the load covered by renewables alone [%].
    pub fn renewable_self_consumption(&self) -> f64 {
        self_consumption(self.load, self.deficit_renewable)
    }

    /// Share of the load covered by renewables and battery [%].
    pub fn battery_self_consumption(&self) -> f64 {
        self_consumption(self.load, self.deficit_after_battery)
    }

    /// Share of the load covered by the whole plant [%].
    pub fn hydrogen_self_consumption(&self) -> f64 {
        self_consumption(self.load, self.deficit)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitSummary {
    /// Mean factor over active steps, or the initial factor if idle all year
    pub mean_factor_kg_per_mwh: f64,
    /// Factor at nominal temperature with the year's wear
    pub end_factor_kg_per_mwh: f64,
    pub working_hours: f64,
    pub active_steps: usize,
}

impl UnitSummary {
    pub fn new(active: &ActiveFactor, initial_kg_per_kwh: f64, end_kg_per_kwh: f64, working_hours: f64) -> Self {
        Self {
            mean_factor_kg_per_mwh: active.mean().unwrap_or(initial_kg_per_kwh) * 1000.0,
            end_factor_kg_per_mwh: end_kg_per_kwh * 1000.0,
            working_hours,
            active_steps: active.steps,
        }
    }

    pub fn ran(&self) -> bool {
        self.active_steps > 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HydrogenSummary {
    pub produced_kg: f64,
    pub compressed_kg: f64,
    pub consumed_kg: f64,
    pub final_low_pressure_kg: f64,
    pub final_high_pressure_kg: f64,
    pub compressor_batches: u32,
}

/// Outcome of a full-fidelity year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResults {
    pub sizing: PlantSizing,
    pub pv_kwp: f64,
    pub low_pressure_tank_kg: f64,
    pub final_soh: f64,
    /// Absent when the hydrogen path is disabled
    pub electrolyzer: Option<UnitSummary>,
    pub fuel_cell: Option<UnitSummary>,
    pub hydrogen: HydrogenSummary,
    pub energy: EnergyBalance,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<StepRecord>,
}

impl SimulationResults {
    /// Both conversion units carried hydrogen at least once.
    pub fn hydrogen_units_ran(&self) -> bool {
        matches!(
            (&self.electrolyzer, &self.fuel_cell),
            (Some(el), Some(fc)) if el.ran() && fc.ran()
        )
    }

    pub fn annual_row(&self, year: u32) -> AnnualRow {
        AnnualRow {
            year,
            battery_capacity_kwh: self.sizing.battery_kwh,
            soh: self.final_soh,
            electrolyzer_factor_kg_per_mwh: self
                .electrolyzer
                .map_or(0.0, |u| u.mean_factor_kg_per_mwh),
            fuel_cell_factor_kg_per_mwh: self.fuel_cell.map_or(0.0, |u| u.mean_factor_kg_per_mwh),
            hydrogen_produced_kg: self.hydrogen.produced_kg,
            hydrogen_compressed_kg: self.hydrogen.compressed_kg,
            energy: self.energy,
        }
    }
}

/// Energy balance of one project year, the input of the cost roll-up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnualRow {
    pub year: u32,
    pub battery_capacity_kwh: f64,
    pub soh: f64,
    pub electrolyzer_factor_kg_per_mwh: f64,
    pub fuel_cell_factor_kg_per_mwh: f64,
    pub hydrogen_produced_kg: f64,
    pub hydrogen_compressed_kg: f64,
    pub energy: EnergyBalance,
}
