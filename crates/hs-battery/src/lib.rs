//! Battery energy storage models.
//!
//! Provides:
//! - SOC/C-rate dependent charge and discharge efficiency surface
//! - Single-step dispatch with SOC window and C-rate limits
//! - Rainflow cycle counting and cycle-damage capacity fade
//! - Constant-efficiency battery for reduced-fidelity runs

pub mod battery;
pub mod degradation;
pub mod efficiency;
pub mod error;
pub mod rainflow;
pub mod simple;

pub use battery::{Battery, BatteryLimits, BatteryState, BatteryStep, CycleCountCadence};
pub use degradation::{cycles_to_end_of_life, daily_damage, state_of_health};
pub use efficiency::{CHARGE, DISCHARGE, EfficiencyCoefficients, efficiency};
pub use error::{BatteryError, BatteryResult};
pub use simple::ConstantEfficiencyBattery;

/// Common face of the detailed and the constant-efficiency battery.
pub trait StorageModel {
    /// Dispatch one timestep and return the power left for the rest of the plant.
    fn dispatch(&mut self, available_kw: f64, requested_kw: f64, step: usize) -> f64;

    /// Current state of charge.
    fn soc(&self) -> f64;

    /// Current state of health.
    fn soh(&self) -> f64;
}
