//! Detailed battery: SOC/C-rate dependent efficiency and cycle-damage fade.

use crate::degradation::{daily_damage, state_of_health};
use crate::efficiency::{CHARGE, DISCHARGE, efficiency};
use crate::error::{BatteryError, BatteryResult};
use crate::StorageModel;
use serde::{Deserialize, Serialize};

/// When the accumulated SOC trace is turned into cycle damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleCountCadence {
    /// Every 24 simulated hours.
    #[default]
    Daily,
    /// Every simulated hour, i.e. `((i + 1) % steps_per_hour) * 24 == 0`.
    Hourly,
}

impl CycleCountCadence {
    /// True when step `step` (0-based) closes a counting window.
    pub fn is_boundary(self, step: usize, timestep_per_hour: u32) -> bool {
        let per_hour = timestep_per_hour.max(1) as usize;
        match self {
            CycleCountCadence::Daily => (step + 1) % (per_hour * 24) == 0,
            CycleCountCadence::Hourly => ((step + 1) % per_hour) * 24 == 0,
        }
    }
}

/// Operating window of the battery.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatteryLimits {
    pub soc_min: f64,
    pub soc_max: f64,
    /// Maximum charge power per kWh of actual capacity [1/h]
    pub c_rate_charge_max: f64,
    /// Maximum discharge power per kWh of actual capacity [1/h]
    pub c_rate_discharge_max: f64,
}

impl Default for BatteryLimits {
    fn default() -> Self {
        Self {
            soc_min: 0.15,
            soc_max: 0.95,
            c_rate_charge_max: 1.0,
            c_rate_discharge_max: 3.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatteryState {
    pub soc: f64,
    pub soh: f64,
    /// Accumulated Miner's-rule damage
    pub damage: f64,
    /// SOC samples of the current counting window
    pub day_trace: Vec<f64>,
}

impl BatteryState {
    pub fn new(initial_soc: f64) -> Self {
        Self {
            soc: initial_soc,
            soh: 1.0,
            damage: 0.0,
            day_trace: vec![initial_soc],
        }
    }
}

/// Outcome of one dispatch step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatteryStep {
    /// Power left after the battery acted [kW]
    pub delivered_kw: f64,
    pub soc: f64,
    pub soh: f64,
    pub damage: f64,
    pub c_rate_charge: f64,
    pub c_rate_discharge: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PowerBalance {
    pub delivered_kw: f64,
    pub soc: f64,
    pub c_rate_charge: f64,
    pub c_rate_discharge: f64,
}

/// Greedy charge/discharge of one step against the limits.
///
/// The SOC update is clamped to the window; when clamping binds, the
/// exchanged power is recomputed from the clamped SOC change.
#[allow(clippy::too_many_arguments)]
pub(crate) fn power_balance<C, D>(
    available_kw: f64,
    requested_kw: f64,
    capacity_kwh: f64,
    soc: f64,
    limits: &BatteryLimits,
    timestep_per_hour: f64,
    eta_charge: C,
    eta_discharge: D,
) -> PowerBalance
where
    C: Fn(f64, f64) -> f64,
    D: Fn(f64, f64) -> f64,
{
    if capacity_kwh <= 0.0 {
        return PowerBalance {
            delivered_kw: available_kw,
            soc,
            c_rate_charge: 0.0,
            c_rate_discharge: 0.0,
        };
    }

    let target = available_kw - requested_kw;
    if target > 0.0 {
        let p_max_c_rate = limits.c_rate_charge_max * capacity_kwh;
        let p_max_soc = ((limits.soc_max - soc)
            * capacity_kwh
            * timestep_per_hour
            * eta_charge(soc, limits.c_rate_charge_max))
        .max(0.0);
        let mut p = target.min(p_max_c_rate).min(p_max_soc);
        let eta = eta_charge(soc, p / capacity_kwh);
        let mut soc_new = soc + p / timestep_per_hour / capacity_kwh * eta;
        if soc_new > limits.soc_max {
            soc_new = limits.soc_max.max(soc);
            p = (soc_new - soc) * capacity_kwh * timestep_per_hour / eta;
        }
        PowerBalance {
            delivered_kw: available_kw - p,
            soc: soc_new,
            c_rate_charge: p / capacity_kwh,
            c_rate_discharge: 0.0,
        }
    } else {
        let p_max_c_rate = limits.c_rate_discharge_max * capacity_kwh;
        let p_max_soc = ((soc - limits.soc_min) * capacity_kwh * timestep_per_hour
            / eta_discharge(soc, limits.c_rate_discharge_max))
        .max(0.0);
        let mut p = (-target).min(p_max_c_rate).min(p_max_soc);
        let eta = eta_discharge(soc, p / capacity_kwh);
        let mut soc_new = soc - p / timestep_per_hour / capacity_kwh / eta;
        if soc_new < limits.soc_min {
            soc_new = limits.soc_min.min(soc);
            p = (soc - soc_new) * capacity_kwh * timestep_per_hour * eta;
        }
        PowerBalance {
            delivered_kw: available_kw + p,
            soc: soc_new,
            c_rate_charge: 0.0,
            c_rate_discharge: p / capacity_kwh,
        }
    }
}

/// Lithium NMC battery with cycle-counting degradation.
#[derive(Clone, Debug)]
pub struct Battery {
    capacity_kwh: f64,
    limits: BatteryLimits,
    cadence: CycleCountCadence,
    timestep_per_hour: u32,
    state: BatteryState,
}

impl Battery {
    pub fn new(
        capacity_kwh: f64,
        initial_soc: f64,
        timestep_per_hour: u32,
        cadence: CycleCountCadence,
    ) -> BatteryResult<Self> {
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
            limits: BatteryLimits::default(),
            cadence,
            timestep_per_hour,
            state: BatteryState::new(initial_soc),
        })
    }

    pub fn with_limits(mut self, limits: BatteryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn state(&self) -> &BatteryState {
        &self.state
    }

    pub fn limits(&self) -> &BatteryLimits {
        &self.limits
    }

    pub fn nominal_capacity_kwh(&self) -> f64 {
        self.capacity_kwh
    }

    /// Nominal capacity scaled by state of health [kWh]
    pub fn actual_capacity_kwh(&self) -> f64 {
        self.capacity_kwh * self.state.soh
    }

    /// Advance one timestep; `step` is the 0-based index used for the
    /// cycle-counting cadence.
    pub fn step(&mut self, available_kw: f64, requested_kw: f64, step: usize) -> BatteryStep {
        let balance = power_balance(
            available_kw,
            requested_kw,
            self.actual_capacity_kwh(),
            self.state.soc,
            &self.limits,
            self.timestep_per_hour as f64,
            |soc, c| efficiency(soc, c, &CHARGE),
            |soc, c| efficiency(soc, c, &DISCHARGE),
        );

        self.state.soc = balance.soc;

        // The window closes on the samples before this step; the closing
        // step's SOC belongs to neither window.
        if self.cadence.is_boundary(step, self.timestep_per_hour) {
            self.state.damage += daily_damage(&self.state.day_trace);
            self.state.soh = state_of_health(self.state.damage);
            self.state.day_trace.clear();
        } else {
            self.state.day_trace.push(balance.soc);
        }

        BatteryStep {
            delivered_kw: balance.delivered_kw,
            soc: self.state.soc,
            soh: self.state.soh,
            damage: self.state.damage,
            c_rate_charge: balance.c_rate_charge,
            c_rate_discharge: balance.c_rate_discharge,
        }
    }
}

impl StorageModel for Battery {
    fn dispatch(&mut self, available_kw: f64, requested_kw: f64, step: usize) -> f64 {
        self.step(available_kw, requested_kw, step).delivered_kw
    }

    fn soc(&self) -> f64 {
        self.state.soc
    }

    fn soh(&self) -> f64 {
        self.state.soh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battery(capacity: f64) -> Battery {
        Battery::new(capacity, 0.4, 60, CycleCountCadence::Daily).unwrap()
    }

    #[test]
    fn cadence_boundaries() {
        let daily: Vec<usize> = (0..3000)
            .filter(|i| CycleCountCadence::Daily.is_boundary(*i, 60))
            .collect();
        assert_eq!(daily, vec![1439, 2879]);

        let hourly = (0..1440)
            .filter(|i| CycleCountCadence::Hourly.is_boundary(*i, 60))
            .count();
        assert_eq!(hourly, 24);
        assert!(CycleCountCadence::Hourly.is_boundary(59, 60));
    }

    #[test]
    fn surplus_charges_within_c_rate() {
        let mut b = battery(100.0);
        let s = b.step(1000.0, 0.0, 0);
        // Charge is capped at 1C = 100 kW.
        assert!((s.delivered_kw - 900.0).abs() < 1e-9);
        assert!((s.c_rate_charge - 1.0).abs() < 1e-12);
        assert_eq!(s.c_rate_discharge, 0.0);
        assert!(s.soc > 0.4);
    }

    #[test]
    fn deficit_discharges_and_stops_at_floor() {
        let mut b = battery(100.0);
        for i in 0..600 {
            let s = b.step(0.0, 200.0, i);
            assert!(s.soc >= 0.15 - 1e-12, "step {i}: soc {}", s.soc);
            assert!(s.delivered_kw <= 200.0 + 1e-9);
        }
        assert!((b.state().soc - 0.15).abs() < 1e-9);
        let s = b.step(0.0, 200.0, 600);
        assert!(s.delivered_kw.abs() < 1e-9);
    }

    #[test]
    fn small_surplus_is_fully_absorbed() {
        let mut b = battery(100.0);
        let s = b.step(30.0, 10.0, 0);
        assert!((s.delivered_kw - 10.0).abs() < 1e-12);
    }

    #[test]
    fn zero_capacity_passes_through() {
        let mut b = battery(0.0);
        let s = b.step(50.0, 80.0, 0);
        assert_eq!(s.delivered_kw, 50.0);
        assert_eq!(s.soc, 0.4);
    }

    #[test]
    fn daily_counting_updates_soh() {
        let mut b = battery(100.0);
        // Charge for 6 h, discharge for 6 h, idle the rest of the day.
        for i in 0..1440 {
            let (res, load) = match i {
                0..=359 => (60.0, 0.0),
                360..=719 => (0.0, 60.0),
                _ => (0.0, 0.0),
            };
            b.step(res, load, i);
        }
        let st = b.state();
        assert!(st.damage > 0.0);
        assert!(st.soh < 1.0);
        assert!(st.day_trace.is_empty());
    }

    #[test]
    fn window_closes_before_the_boundary_sample() {
        // Hourly steps: the daily window closes at step 23.
        let mut b = Battery::new(100.0, 0.4, 1, CycleCountCadence::Daily).unwrap();
        let mut window = vec![0.4];
        for i in 0..23 {
            let (res, load) = if (i / 4) % 2 == 0 { (60.0, 0.0) } else { (0.0, 60.0) };
            window.push(b.step(res, load, i).soc);
        }
        assert_eq!(b.state().day_trace, window);

        let closing = b.step(0.0, 60.0, 23);
        let expected = daily_damage(&window);
        assert!(expected > 0.0);
        assert_eq!(b.state().damage, expected);
        assert_eq!(closing.soh, state_of_health(expected));
        assert!(b.state().day_trace.is_empty());

        let next = b.step(60.0, 0.0, 24);
        assert_eq!(b.state().day_trace, vec![next.soc]);
    }

    #[test]
    fn rejects_bad_construction() {
        assert!(Battery::new(-1.0, 0.4, 60, CycleCountCadence::Daily).is_err());
        assert!(Battery::new(10.0, 1.4, 60, CycleCountCadence::Daily).is_err());
        assert!(Battery::new(10.0, 0.4, 0, CycleCountCadence::Daily).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn soc_stays_in_window(
                capacity in 1.0f64..5000.0,
                flows in proptest::collection::vec((0.0f64..3000.0, 0.0f64..3000.0), 1..400),
            ) {
                let mut b = Battery::new(capacity, 0.4, 60, CycleCountCadence::Hourly).unwrap();
                for (i, (res, load)) in flows.iter().enumerate() {
                    let s = b.step(*res, *load, i);
                    prop_assert!(s.soc >= 0.15 - 1e-12 && s.soc <= 0.95 + 1e-12);
                    prop_assert!(s.soh > 0.0 && s.soh <= 1.0);
                }
            }
        }
    }
}
