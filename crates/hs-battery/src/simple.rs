//! Constant-efficiency battery without degradation tracking.

use crate::battery::{BatteryLimits, power_balance};
use crate::error::{BatteryError, BatteryResult};
use crate::StorageModel;

pub const CONSTANT_CHARGE_EFFICIENCY: f64 = 0.995;
pub const CONSTANT_DISCHARGE_EFFICIENCY: f64 = 0.995;

#[derive(Clone, Debug)]
pub struct ConstantEfficiencyBattery {
    capacity_kwh: f64,
    soc: f64,
    limits: BatteryLimits,
    timestep_per_hour: u32,
    eta_charge: f64,
    eta_discharge: f64,
}

impl ConstantEfficiencyBattery {
    pub fn new(capacity_kwh: f64, initial_soc: f64, timestep_per_hour: u32) -> BatteryResult<Self> {
        if !capacity_kwh.is_finite() || capacity_kwh < 0.0 {
            return Err(BatteryError::InvalidArg {
                what: "battery capacity must be finite and non-negative",
            });
        }
        if !(0.0..=1.0).contains(&initial_soc) {
            return Err(BatteryError::InvalidArg {
                what: "initial SOC must lie in [0, 1]",
            });
        }
        if timestep_per_hour == 0 {
            return Err(BatteryError::InvalidArg {
                what: "timestep_per_hour must be positive",
            });
        }
        Ok(Self {
            capacity_kwh,
            soc: initial_soc,
            limits: BatteryLimits::default(),
            timestep_per_hour,
            eta_charge: CONSTANT_CHARGE_EFFICIENCY,
            eta_discharge: CONSTANT_DISCHARGE_EFFICIENCY,
        })
    }

    pub fn capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }
}

impl StorageModel for ConstantEfficiencyBattery {
    fn dispatch(&mut self, available_kw: f64, requested_kw: f64, _step: usize) -> f64 {
        let (eta_c, eta_d) = (self.eta_charge, self.eta_discharge);
        let balance = power_balance(
            available_kw,
            requested_kw,
            self.capacity_kwh,
            self.soc,
            &self.limits,
            self.timestep_per_hour as f64,
            |_, _| eta_c,
            |_, _| eta_d,
        );
        self.soc = balance.soc;
        balance.delivered_kw
    }

    fn soc(&self) -> f64 {
        self.soc
    }

    fn soh(&self) -> f64 {
        1.0
    }
}
