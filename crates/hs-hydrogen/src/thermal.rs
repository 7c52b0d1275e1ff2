//! Lumped-capacitance thermal model behind a series resistance network.

use crate::error::{HydrogenError, HydrogenResult};
use crate::params::{LengthScaling, ThermalParams, UnitParams};
use crate::polarization::ConversionModel;
use hs_core::constants::{SECONDS_PER_HOUR, THERMONEUTRAL_VOLTAGE};
use std::f64::consts::PI;

/// Thermal network of one sized unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalNetwork {
    /// Total resistance from working medium to ambient [K/W]
    pub resistance_k_per_w: f64,
    /// Thermal mass times specific heat [J/K]
    pub heat_capacity_j_per_k: f64,
    /// Temperature ceiling while operating [°C]
    pub max_temperature_c: f64,
    /// Step length [s]
    pub dt_s: f64,
}

impl ThermalNetwork {
    pub fn new(
        params: &ThermalParams,
        scale: f64,
        max_temperature_c: f64,
        timestep_per_hour: u32,
    ) -> HydrogenResult<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(HydrogenError::InvalidArg {
                what: "thermal scale factor must be positive",
            });
        }
        if timestep_per_hour == 0 {
            return Err(HydrogenError::InvalidArg {
                what: "timestep_per_hour must be positive",
            });
        }

        let length = match params.length_scaling {
            LengthScaling::CubeRoot => params.length_m * scale.cbrt(),
            LengthScaling::Linear => params.length_m * scale,
        };
        let r1 = if params.scale_radius {
            params.radius_m * scale.cbrt()
        } else {
            params.radius_m
        };
        let r2 = r1 + params.shell_thickness_m;
        let r3 = params.container_radius_m;
        let r4 = r3 + params.insulation_thickness_m;

        let convection = |h: f64, r: f64| 1.0 / (h * 2.0 * PI * r * length);
        let conduction = |k: f64, r_in: f64, r_out: f64| (r_out / r_in).ln() / (k * 2.0 * PI * length);

        let mut resistance = conduction(params.k_shell, r1, r2)
            + convection(params.h_gap, r2)
            + convection(params.h_gap, r3)
            + conduction(params.k_insulation, r3, r4)
            + convection(params.h_external, r4);
        if let Some(h) = params.h_internal {
            resistance += convection(h, r1);
        }

        let mass = length * r1 * r1 * PI * params.fill_density_kg_m3;

        Ok(Self {
            resistance_k_per_w: resistance,
            heat_capacity_j_per_k: mass * params.specific_heat,
            max_temperature_c,
            dt_s: SECONDS_PER_HOUR / timestep_per_hour as f64,
        })
    }

    /// Network of a unit with `units` installed units.
    pub fn for_unit(params: &UnitParams, units: u32, timestep_per_hour: u32) -> HydrogenResult<Self> {
        Self::new(
            &params.thermal,
            units as f64 / params.design_units,
            params.nominal_temperature_c,
            timestep_per_hour,
        )
    }

    /// [W]
    pub fn heat_loss_w(&self, temperature_c: f64, ambient_c: f64) -> f64 {
        (temperature_c - ambient_c) / self.resistance_k_per_w
    }

    /// Temperature after one step. `heat_gain_w` is `Some` while the unit operates.
    pub fn step(&self, temperature_c: f64, ambient_c: f64, heat_gain_w: Option<f64>) -> f64 {
        let q_lost = self.heat_loss_w(temperature_c, ambient_c);
        let k = self.dt_s / self.heat_capacity_j_per_k;
        match heat_gain_w {
            Some(q_gain) => (temperature_c + k * (q_gain - q_lost)).min(self.max_temperature_c),
            None => temperature_c - k * q_lost,
        }
    }
}

/// Heat released by electrochemical losses at a given hydrogen flow [W].
pub fn heat_gain_w(
    params: &UnitParams,
    model: &ConversionModel,
    hydrogen_kg_per_step: f64,
    units: u32,
) -> f64 {
    let current = model.current_for_flow(hydrogen_kg_per_step);
    let v_cell = model.voltage_at(current) / params.cells_per_unit;
    let cells = units as f64 * params.cells_per_unit;
    cells * (v_cell - THERMONEUTRAL_VOLTAGE).abs() * current * params.current_to_amps
}

/// One thermal step of a unit at the given flow, building the network on the fly.
pub fn thermal_step(
    params: &UnitParams,
    hydrogen_kg_per_step: f64,
    model: &ConversionModel,
    temperature_c: f64,
    units: u32,
    ambient_c: f64,
    timestep_per_hour: u32,
) -> HydrogenResult<f64> {
    let network = ThermalNetwork::for_unit(params, units, timestep_per_hour)?;
    let gain = (hydrogen_kg_per_step > 0.0)
        .then(|| heat_gain_w(params, model, hydrogen_kg_per_step, units));
    Ok(network.step(temperature_c, ambient_c, gain))
}
