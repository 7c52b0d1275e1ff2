//! Project schema definitions.

use hs_battery::CycleCountCadence;
use hs_economics::EconomicsConfig;
use hs_hydrogen::StorageParams;
use hs_sim::{PlantConstants, SearchSpace, SimOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectFile {
    pub version: u32,
    pub name: String,
    pub timeseries: TimeSeriesDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    #[serde(default)]
    pub plant: PlantConstants,
    #[serde(default)]
    pub search: SearchSpace,
    #[serde(default)]
    pub economics: EconomicsConfig,
    #[serde(default)]
    pub optimizer: OptimizerDef,
}

impl ProjectFile {
    /// A current-version project with every section at its default.
    pub fn new(name: impl Into<String>, timeseries: impl Into<PathBuf>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            timeseries: TimeSeriesDef {
                path: timeseries.into(),
            },
            simulation: SimulationDef::default(),
            plant: PlantConstants::default(),
            search: SearchSpace::default(),
            economics: EconomicsConfig::default(),
            optimizer: OptimizerDef::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesDef {
    /// CSV input, relative to the project file unless absolute
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationDef {
    pub timestep_per_hour: u32,
    pub initial_soc: f64,
    pub cycle_count_cadence: CycleCountCadence,
    pub low_pressure_tank_kg: f64,
    pub compression_rate_kg_per_hour: f64,
    pub initial_high_pressure_fill: f64,
    /// Version 0 files gave the compression rate per minute.
    #[serde(skip_serializing)]
    pub compression_rate_kg_per_min: Option<f64>,
}

impl Default for SimulationDef {
    fn default() -> Self {
        let storage = StorageParams::default();
        Self {
            timestep_per_hour: 60,
            initial_soc: 0.4,
            cycle_count_cadence: CycleCountCadence::default(),
            low_pressure_tank_kg: storage.low_pressure_capacity_kg,
            compression_rate_kg_per_hour: storage.compression_rate_kg_per_h,
            initial_high_pressure_fill: storage.initial_high_pressure_fraction,
            compression_rate_kg_per_min: None,
        }
    }
}

impl SimulationDef {
    pub fn to_sim_options(&self) -> SimOptions {
        SimOptions {
            timestep_per_hour: self.timestep_per_hour,
            initial_soc: self.initial_soc,
            cycle_count_cadence: self.cycle_count_cadence,
            storage: StorageParams {
                low_pressure_capacity_kg: self.low_pressure_tank_kg,
                compression_rate_kg_per_h: self.compression_rate_kg_per_hour,
                initial_high_pressure_fraction: self.initial_high_pressure_fill,
                ..StorageParams::default()
            },
            ..SimOptions::default()
        }
    }
}

/// Differential-evolution settings as written in the project file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerDef {
    /// Population is this multiple of the number of decision variables
    pub population_multiplier: usize,
    pub max_generations: usize,
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
    pub mutation: (f64, f64),
    pub recombination: f64,
    pub seed: u64,
    /// Rayon pool size; all cores when absent
    pub workers: Option<usize>,
}

impl Default for OptimizerDef {
    fn default() -> Self {
        Self {
            population_multiplier: 15,
            max_generations: 1000,
            relative_tolerance: 0.01,
            absolute_tolerance: 0.0,
            mutation: (0.5, 1.0),
            recombination: 0.7,
            seed: 1,
            workers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_carry_storage_fields() {
        let def = SimulationDef {
            low_pressure_tank_kg: 20.0,
            compression_rate_kg_per_hour: 30.0,
            initial_high_pressure_fill: 0.5,
            ..SimulationDef::default()
        };
        let opts = def.to_sim_options();
        assert_eq!(opts.storage.low_pressure_capacity_kg, 20.0);
        assert_eq!(opts.storage.compression_rate_kg_per_h, 30.0);
        assert_eq!(opts.storage.initial_high_pressure_fraction, 0.5);
        assert_eq!(opts.storage.arm_fraction, StorageParams::default().arm_fraction);
    }

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = "version: 1\nname: site\ntimeseries:\n  path: data.csv\n";
        let project: ProjectFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(project.simulation, SimulationDef::default());
        assert_eq!(project.search, SearchSpace::default());
        assert_eq!(project.optimizer.population_multiplier, 15);
    }
}
