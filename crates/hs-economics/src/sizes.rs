//! Installed component sizes, in the unit each technology is priced in.

use crate::prices::Technology;
use hs_hydrogen::{ELECTROLYZER, FUEL_CELL};
use hs_sim::{PlantConstants, SimulationResults};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Electrolyzer,
    FuelCell,
    Battery,
    HighPressureTank,
    LowPressureTank,
    Pv,
    Wind,
    Compressor,
}

impl Component {
    pub const ALL: [Component; 8] = [
        Component::Electrolyzer,
        Component::FuelCell,
        Component::Battery,
        Component::HighPressureTank,
        Component::LowPressureTank,
        Component::Pv,
        Component::Wind,
        Component::Compressor,
    ];

    /// Price-table entry; the compressor carries a fixed unit cost instead.
    pub fn technology(self) -> Option<Technology> {
        match self {
            Component::Electrolyzer => Some(Technology::Electrolyzer),
            Component::FuelCell => Some(Technology::FuelCell),
            Component::Battery => Some(Technology::Battery),
            Component::HighPressureTank | Component::LowPressureTank => Some(Technology::HydrogenTank),
            Component::Pv => Some(Technology::Pv),
            Component::Wind => Some(Technology::Wind),
            Component::Compressor => None,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Electrolyzer => "electrolyzer",
            Component::FuelCell => "fuel cell",
            Component::Battery => "battery",
            Component::HighPressureTank => "high-pressure tank",
            Component::LowPressureTank => "low-pressure tank",
            Component::Pv => "PV",
            Component::Wind => "wind turbine",
            Component::Compressor => "compressor",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentSizes {
    pub electrolyzer_kw: f64,
    pub fuel_cell_kw: f64,
    pub battery_mwh: f64,
    pub high_pressure_tank_kg: f64,
    pub low_pressure_tank_kg: f64,
    pub pv_kwp: f64,
    pub wind_kw: f64,
    /// 1 when both hydrogen units ran in the first year, else 0
    pub compressor_units: f64,
}

impl ComponentSizes {
    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Electrolyzer => self.electrolyzer_kw,
            Component::FuelCell => self.fuel_cell_kw,
            Component::Battery => self.battery_mwh,
            Component::HighPressureTank => self.high_pressure_tank_kg,
            Component::LowPressureTank => self.low_pressure_tank_kg,
            Component::Pv => self.pv_kwp,
            Component::Wind => self.wind_kw,
            Component::Compressor => self.compressor_units,
        }
    }
}

/// Sizes to be priced for a first-year simulation.
pub fn component_sizes(first_year: &SimulationResults, constants: &PlantConstants) -> ComponentSizes {
    let sizing = &first_year.sizing;
    ComponentSizes {
        electrolyzer_kw: sizing.electrolyzer_cells as f64 * ELECTROLYZER.power_per_unit_kw,
        fuel_cell_kw: sizing.fuel_cell_stacks as f64 * FUEL_CELL.power_per_unit_kw,
        battery_mwh: sizing.battery_kwh / 1000.0,
        high_pressure_tank_kg: sizing.high_pressure_tank_kg,
        low_pressure_tank_kg: first_year.low_pressure_tank_kg,
        pv_kwp: first_year.pv_kwp,
        wind_kw: constants.wind_kw,
        compressor_units: if first_year.hydrogen_units_ran() { 1.0 } else { 0.0 },
    }
}
