//! Run options shared by the full and reduced loops.

use crate::error::{SimError, SimResult};
use hs_battery::{BatteryLimits, CycleCountCadence};
use hs_hydrogen::{CompressorParams, StorageParams};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    pub timestep_per_hour: u32,
    pub initial_soc: f64,
    pub cycle_count_cadence: CycleCountCadence,
    pub storage: StorageParams,
    #[serde(skip)]
    pub compressor: CompressorParams,
    /// Keep a per-step record of the dispatch
    pub record_trace: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            timestep_per_hour: 60,
            initial_soc: 0.4,
            cycle_count_cadence: CycleCountCadence::default(),
            storage: StorageParams::default(),
            compressor: CompressorParams::default(),
            record_trace: false,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if self.timestep_per_hour == 0 {
            return Err(SimError::InvalidArg {
                what: "timestep_per_hour must be positive",
            });
        }
        // Timestamps carry whole seconds, so a step must too.
        if 3600 % self.timestep_per_hour != 0 {
            return Err(SimError::InvalidArg {
                what: "timestep_per_hour must divide the hour into whole seconds",
            });
        }
        let limits = BatteryLimits::default();
        if !(limits.soc_min..=limits.soc_max).contains(&self.initial_soc) {
            return Err(SimError::InvalidArg {
                what: "initial SOC must lie inside the battery operating window",
            });
        }
        self.compressor.validate()?;
        Ok(())
    }

    pub fn step_hours(&self) -> f64 {
        1.0 / self.timestep_per_hour as f64
    }
}
