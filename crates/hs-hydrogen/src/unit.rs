//! Electro-thermal unit state machine shared by electrolyzer and fuel cell.

use crate::error::{HydrogenError, HydrogenResult};
use crate::params::{ELECTROLYZER, FUEL_CELL, UnitParams};
use crate::polarization::{ConversionModel, conversion_factor};
use crate::thermal::{ThermalNetwork, heat_gain_w};
use tracing::{debug, warn};

/// Source of the power/hydrogen conversion factor during dispatch.
pub trait HydrogenConverter {
    /// Conversion factor for the coming step [kg/kWh].
    fn conversion_factor(&mut self) -> f64;

    /// Close the step with the hydrogen mass handled [kg] and ambient temperature.
    fn finish_step(&mut self, hydrogen_kg: f64, ambient_c: f64);
}

/// Converter with a constant factor, for reduced-fidelity years.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedFactor {
    pub factor_kg_per_kwh: f64,
}

impl HydrogenConverter for FixedFactor {
    fn conversion_factor(&mut self) -> f64 {
        self.factor_kg_per_kwh
    }

    fn finish_step(&mut self, _hydrogen_kg: f64, _ambient_c: f64) {}
}

#[derive(Clone, Debug)]
pub struct ElectroThermalUnit {
    params: &'static UnitParams,
    units: u32,
    timestep_per_hour: u32,
    model: ConversionModel,
    /// Temperature and hours the maps were last built for (bit patterns)
    model_key: (u64, u64),
    thermal: ThermalNetwork,
    temperature_c: f64,
    working_hours: f64,
    end_of_life_flagged: bool,
}

impl ElectroThermalUnit {
    pub fn new(params: &'static UnitParams, units: u32, timestep_per_hour: u32) -> HydrogenResult<Self> {
        if units == 0 {
            return Err(HydrogenError::InvalidArg {
                what: "unit count must be positive",
            });
        }
        let model = ConversionModel::new(params, units, timestep_per_hour)?;
        let thermal = ThermalNetwork::for_unit(params, units, timestep_per_hour)?;
        let temperature_c = params.nominal_temperature_c;
        Ok(Self {
            params,
            units,
            timestep_per_hour,
            model,
            model_key: (temperature_c.to_bits(), 0f64.to_bits()),
            thermal,
            temperature_c,
            working_hours: 0.0,
            end_of_life_flagged: false,
        })
    }

    pub fn electrolyzer(cells: u32, timestep_per_hour: u32) -> HydrogenResult<Self> {
        Self::new(&ELECTROLYZER, cells, timestep_per_hour)
    }

    pub fn fuel_cell(stacks: u32, timestep_per_hour: u32) -> HydrogenResult<Self> {
        Self::new(&FUEL_CELL, stacks, timestep_per_hour)
    }

    pub fn params(&self) -> &'static UnitParams {
        self.params
    }

    pub fn units(&self) -> u32 {
        self.units
    }

    pub fn nominal_power_kw(&self) -> f64 {
        self.units as f64 * self.params.power_per_unit_kw
    }

    pub fn min_power_kw(&self) -> f64 {
        self.params.min_power_fraction * self.nominal_power_kw()
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn working_hours(&self) -> f64 {
        self.working_hours
    }

    pub fn model(&self) -> &ConversionModel {
        &self.model
    }

    pub fn thermal(&self) -> &ThermalNetwork {
        &self.thermal
    }

    /// Factor at nominal temperature for the current wear [kg/kWh].
    pub fn factor_at_nominal_temperature(&self) -> f64 {
        conversion_factor(
            self.params,
            self.units,
            self.params.nominal_temperature_c,
            self.working_hours,
        )
    }

    /// Bring the maps up to date with temperature and wear; returns the factor.
    pub fn refresh(&mut self) -> f64 {
        let key = (self.temperature_c.to_bits(), self.working_hours.to_bits());
        if key != self.model_key {
            self.model
                .update(self.params, self.units, self.temperature_c, self.working_hours);
            self.model_key = key;
        }

        if self.params.end_of_life_reached(self.working_hours) {
            if self.end_of_life_flagged {
                debug!(unit = self.params.name, hours = self.working_hours, "unit past end of life");
            } else {
                warn!(
                    unit = self.params.name,
                    hours = self.working_hours,
                    voltage = self.params.rated_voltage_after(self.working_hours),
                    "rated voltage beyond end-of-life bound, unit replacement needed"
                );
                self.end_of_life_flagged = true;
            }
        }
        self.model.conversion_factor()
    }

    /// Temperature after a step at the given hydrogen flow.
    pub fn thermal_step(&self, hydrogen_kg: f64, ambient_c: f64) -> f64 {
        let gain = (hydrogen_kg > 0.0)
            .then(|| heat_gain_w(self.params, &self.model, hydrogen_kg, self.units));
        self.thermal.step(self.temperature_c, ambient_c, gain)
    }

    /// Apply the thermal step and count working time while hydrogen flows.
    pub fn advance(&mut self, hydrogen_kg: f64, ambient_c: f64) {
        self.temperature_c = self.thermal_step(hydrogen_kg, ambient_c);
        if hydrogen_kg > 0.0 {
            self.working_hours += 1.0 / self.timestep_per_hour as f64;
        }
    }
}

impl HydrogenConverter for ElectroThermalUnit {
    fn conversion_factor(&mut self) -> f64 {
        self.refresh()
    }

    fn finish_step(&mut self, hydrogen_kg: f64, ambient_c: f64) {
        self.advance(hydrogen_kg, ambient_c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominal_and_minimum_power() {
        let el = ElectroThermalUnit::electrolyzer(20, 60).unwrap();
        assert!((el.nominal_power_kw() - 189.0).abs() < 1e-9);
        assert!((el.min_power_kw() - 37.8).abs() < 1e-9);
        let fc = ElectroThermalUnit::fuel_cell(10, 60).unwrap();
        assert!((fc.nominal_power_kw() - 135.7).abs() < 1e-9);
        assert!((fc.min_power_kw() - 1.357).abs() < 1e-9);
    }

    #[test]
    fn working_hours_count_only_while_active() {
        let mut el = ElectroThermalUnit::electrolyzer(20, 60).unwrap();
        for _ in 0..30 {
            el.advance(0.0, 20.0);
        }
        assert_eq!(el.working_hours(), 0.0);
        for _ in 0..60 {
            el.refresh();
            el.advance(0.01, 20.0);
        }
        assert!((el.working_hours() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn idle_cooling_lowers_electrolyzer_factor() {
        let mut el = ElectroThermalUnit::electrolyzer(20, 60).unwrap();
        let cf0 = el.refresh();
        for _ in 0..600 {
            el.advance(0.0, 0.0);
        }
        assert!(el.temperature_c() < 71.0);
        assert!(el.refresh() < cf0);
        assert!((el.factor_at_nominal_temperature() - cf0).abs() < 1e-15);
    }

    #[test]
    fn operating_temperature_never_exceeds_nominal() {
        let mut fc = ElectroThermalUnit::fuel_cell(10, 60).unwrap();
        let flow = fc.model().max_flow_per_step();
        for _ in 0..500 {
            fc.refresh();
            fc.advance(flow, 35.0);
            assert!(fc.temperature_c() <= 60.0);
        }
    }

    #[test]
    fn refresh_is_cached_on_unchanged_state() {
        let mut el = ElectroThermalUnit::electrolyzer(10, 60).unwrap();
        let a = el.refresh();
        let b = el.refresh();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn fixed_factor_is_constant() {
        let mut f = FixedFactor {
            factor_kg_per_kwh: 0.02,
        };
        f.finish_step(1.0, 10.0);
        assert_eq!(f.conversion_factor(), 0.02);
    }
}
