//! Degraded polarization curve and power to hydrogen conversion.

use crate::error::{HydrogenError, HydrogenResult};
use crate::params::{HydrogenCurve, UnitParams};
use hs_core::Interp1D;

/// Uniform voltage shift from wear and from running below nominal temperature.
fn voltage_shift(params: &UnitParams, temperature_c: f64, working_hours: f64) -> f64 {
    params.role.voltage_sign()
        * (params.voltage_drift_per_hour * working_hours
            + params.voltage_per_kelvin * (params.nominal_temperature_c - temperature_c))
}

/// Hydrogen flow at each polarization point for `units` installed units [kg/h].
fn point_flows_kg_per_h(params: &UnitParams, units: u32) -> Vec<f64> {
    let n = units as f64;
    match params.hydrogen {
        HydrogenCurve::Rated {
            design_flow_kg_per_h,
        } => {
            let max_flow = design_flow_kg_per_h * n / params.design_units;
            let i0 = params.current[0];
            let span = params.current[params.current.len() - 1] - i0;
            params
                .current
                .iter()
                .map(|i| max_flow * (i - i0) / span)
                .collect()
        }
        HydrogenCurve::IdealPower { factor_kg_per_kwh } => params
            .current
            .iter()
            .zip(params.ideal_voltage)
            .map(|(i, v)| i * v * n * params.kw_per_volt_current * factor_kg_per_kwh)
            .collect(),
    }
}

/// Hydrogen per unit of electrical energy at the rated point [kg/kWh].
pub fn conversion_factor(
    params: &UnitParams,
    units: u32,
    temperature_c: f64,
    working_hours: f64,
) -> f64 {
    let n = units as f64;
    let last = params.current.len() - 1;
    let v_rated = params.ideal_voltage[last] + voltage_shift(params, temperature_c, working_hours);
    let flow_rated = point_flows_kg_per_h(params, units)[last];
    flow_rated / (n * params.current[last] * v_rated * params.kw_per_volt_current)
}

/// Interpolation maps of one unit for the current temperature and wear.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionModel {
    conversion_factor: f64,
    current_to_voltage: Interp1D,
    hydrogen_to_current: Interp1D,
}

impl ConversionModel {
    /// Maps for a fresh unit at nominal temperature. Hydrogen is per timestep.
    pub fn new(params: &UnitParams, units: u32, timestep_per_hour: u32) -> HydrogenResult<Self> {
        if units == 0 {
            return Err(HydrogenError::InvalidArg {
                what: "unit count must be positive",
            });
        }
        if timestep_per_hour == 0 {
            return Err(HydrogenError::InvalidArg {
                what: "timestep_per_hour must be positive",
            });
        }
        let per_step: Vec<f64> = point_flows_kg_per_h(params, units)
            .into_iter()
            .map(|f| f / timestep_per_hour as f64)
            .collect();
        let hydrogen_to_current = Interp1D::new(per_step, params.current.to_vec())?;
        let current_to_voltage =
            Interp1D::new(params.current.to_vec(), params.ideal_voltage.to_vec())?;

        let mut model = Self {
            conversion_factor: 0.0,
            current_to_voltage,
            hydrogen_to_current,
        };
        model.update(params, units, params.nominal_temperature_c, 0.0);
        Ok(model)
    }

    /// Shift the polarization curve to a new temperature and wear state.
    pub fn update(&mut self, params: &UnitParams, units: u32, temperature_c: f64, working_hours: f64) {
        let shift = voltage_shift(params, temperature_c, working_hours);
        for (v, ideal) in self
            .current_to_voltage
            .values_mut()
            .iter_mut()
            .zip(params.ideal_voltage)
        {
            *v = ideal + shift;
        }
        self.conversion_factor = conversion_factor(params, units, temperature_c, working_hours);
    }

    /// [kg/kWh]
    pub fn conversion_factor(&self) -> f64 {
        self.conversion_factor
    }

    pub fn voltage_curve(&self) -> &[f64] {
        self.current_to_voltage.y()
    }

    pub fn current_for_flow(&self, hydrogen_kg_per_step: f64) -> f64 {
        self.hydrogen_to_current.eval(hydrogen_kg_per_step)
    }

    pub fn voltage_at(&self, current: f64) -> f64 {
        self.current_to_voltage.eval(current)
    }

    /// Largest tabulated hydrogen flow [kg/step]
    pub fn max_flow_per_step(&self) -> f64 {
        self.hydrogen_to_current.x_max()
    }
}

/// Maps and conversion factor for a unit at the given temperature and wear.
pub fn conversion_model(
    params: &UnitParams,
    temperature_c: f64,
    working_hours: f64,
    units: u32,
    timestep_per_hour: u32,
) -> HydrogenResult<ConversionModel> {
    let mut model = ConversionModel::new(params, units, timestep_per_hour)?;
    model.update(params, units, temperature_c, working_hours);
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ELECTROLYZER, FUEL_CELL};

    #[test]
    fn fresh_electrolyzer_factor() {
        let cf = conversion_factor(&ELECTROLYZER, 20, 71.0, 0.0);
        let expected = (18.0 / 106.0) / (5.0 * 1.9);
        assert!((cf - expected).abs() < 1e-12);
        // independent of size
        let cf50 = conversion_factor(&ELECTROLYZER, 50, 71.0, 0.0);
        assert!((cf - cf50).abs() < 1e-12);
    }

    #[test]
    fn fresh_fuel_cell_factor_matches_nominal() {
        let cf = conversion_factor(&FUEL_CELL, 10, 60.0, 0.0);
        assert!((cf - 0.059).abs() < 1e-12);
    }

    #[test]
    fn wear_and_cold_move_factors_the_right_way() {
        let el_new = conversion_factor(&ELECTROLYZER, 10, 71.0, 0.0);
        assert!(conversion_factor(&ELECTROLYZER, 10, 71.0, 5000.0) < el_new);
        assert!(conversion_factor(&ELECTROLYZER, 10, 40.0, 0.0) < el_new);

        let fc_new = conversion_factor(&FUEL_CELL, 10, 60.0, 0.0);
        assert!(conversion_factor(&FUEL_CELL, 10, 60.0, 5000.0) > fc_new);
        assert!(conversion_factor(&FUEL_CELL, 10, 30.0, 0.0) > fc_new);
    }

    #[test]
    fn voltage_curve_is_shifted_uniformly() {
        let m = conversion_model(&ELECTROLYZER, 61.0, 1000.0, 10, 60).unwrap();
        let shift = 3e-6 * 1000.0 + 5e-3 * 10.0;
        assert!((m.voltage_curve()[0] - (1.64 + shift)).abs() < 1e-12);
        assert!((m.voltage_curve()[1] - (1.9 + shift)).abs() < 1e-12);
    }

    #[test]
    fn electrolyzer_flow_maps_onto_current_range() {
        let m = ConversionModel::new(&ELECTROLYZER, 106, 60).unwrap();
        assert!((m.max_flow_per_step() - 18.0 / 60.0).abs() < 1e-12);
        assert_eq!(m.current_for_flow(0.0), 1.0);
        assert!((m.current_for_flow(0.15) - 3.0).abs() < 1e-12);
        assert_eq!(m.current_for_flow(10.0), 5.0);
    }

    #[test]
    fn fuel_cell_tables_follow_datasheet() {
        let m = ConversionModel::new(&FUEL_CELL, 1, 60).unwrap();
        assert_eq!(m.voltage_at(0.0), 94.0);
        assert_eq!(m.voltage_at(250.0), 57.0);
        let flow = 200.0 * 62.0 * 1e-3 * 0.059 / 60.0;
        assert!((m.current_for_flow(flow) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_empty_units() {
        assert!(ConversionModel::new(&ELECTROLYZER, 0, 60).is_err());
        assert!(ConversionModel::new(&FUEL_CELL, 4, 0).is_err());
    }
}
