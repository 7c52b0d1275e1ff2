//! Error types for simulation runs.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid sizing: {what}")]
    InvalidSizing { what: String },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<hs_battery::BatteryError> for SimError {
    fn from(e: hs_battery::BatteryError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<hs_hydrogen::HydrogenError> for SimError {
    fn from(e: hs_hydrogen::HydrogenError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<hs_core::HsError> for SimError {
    fn from(e: hs_core::HsError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
