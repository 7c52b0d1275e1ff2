//! Multi-year degradation extrapolation.
//!
//! Provides:
//! - Levenberg-Marquardt least squares with finite-difference Jacobians
//! - Battery capacity-fade and conversion-factor trajectories fitted from
//!   the first simulated year
//! - Cycling of a component's useful-life trajectory over the economic horizon
//! - The multi-year runner: one full year plus reduced later years

pub mod battery_fade;
pub mod conversion_fade;
pub mod error;
pub mod horizon;
pub mod lsq;
pub mod projection;
pub mod runner;

pub use battery_fade::{BatteryFade, fit_battery_fade};
pub use conversion_fade::{
    ConversionTrajectory, electrolyzer_trajectory, fuel_cell_trajectory, nominal_trajectories,
};
pub use error::{LifetimeError, LifetimeResult};
pub use horizon::{DEFAULT_HORIZON_YEARS, cycle_to_horizon};
pub use lsq::{LmConfig, LmReport, curve_fit, finite_difference_jacobian, levenberg_marquardt};
pub use projection::{ComponentLifetimes, Projection, project};
pub use runner::{LifetimeRun, run_lifetime};
