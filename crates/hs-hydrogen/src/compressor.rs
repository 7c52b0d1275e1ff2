//! Multi-stage polytropic hydrogen compressor.

use crate::error::{HydrogenError, HydrogenResult};
use hs_core::constants::{J_PER_KWH, h2_specific_gas_constant};
use hs_core::{Pressure, Ratio, Temperature, bar, degc};
use uom::si::ratio::ratio;
use uom::si::thermodynamic_temperature::kelvin;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressorParams {
    pub inlet_pressure: Pressure,
    pub outlet_pressure: Pressure,
    pub inlet_temperature: Temperature,
    pub stages: u32,
    /// Polytropic exponent of hydrogen
    pub polytropic_index: f64,
    pub efficiency: f64,
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            inlet_pressure: bar(30.0),
            outlet_pressure: bar(350.0),
            inlet_temperature: degc(25.0),
            stages: 3,
            polytropic_index: 1.43,
            efficiency: 0.75,
        }
    }
}

impl CompressorParams {
    pub fn validate(&self) -> HydrogenResult<()> {
        let overall: Ratio = self.outlet_pressure / self.inlet_pressure;
        if !(overall.get::<ratio>() > 1.0) {
            return Err(HydrogenError::InvalidArg {
                what: "compressor outlet pressure must exceed inlet pressure",
            });
        }
        if self.stages == 0 {
            return Err(HydrogenError::InvalidArg {
                what: "compressor needs at least one stage",
            });
        }
        if !(self.polytropic_index > 1.0) {
            return Err(HydrogenError::InvalidArg {
                what: "polytropic index must exceed 1",
            });
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(HydrogenError::InvalidArg {
                what: "compressor efficiency must lie in (0, 1]",
            });
        }
        Ok(())
    }

    /// Per-stage pressure ratio with equal stage ratios.
    pub fn stage_ratio(&self) -> f64 {
        let overall: Ratio = self.outlet_pressure / self.inlet_pressure;
        overall.get::<ratio>().powf(1.0 / self.stages as f64)
    }

    /// Electrical work per kilogram compressed [kWh/kg].
    pub fn specific_work_kwh_per_kg(&self) -> f64 {
        let k = self.polytropic_index;
        let n = self.stages as f64;
        let t1 = self.inlet_temperature.get::<kelvin>();
        let ideal = n * k / (k - 1.0)
            * h2_specific_gas_constant()
            * t1
            * (self.stage_ratio().powf((k - 1.0) / k) - 1.0);
        ideal / self.efficiency / J_PER_KWH
    }
}
