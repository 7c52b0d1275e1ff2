//! Error types for battery models.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatteryError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },
}

pub type BatteryResult<T> = Result<T, BatteryError>;

impl From<hs_core::HsError> for BatteryError {
    fn from(e: hs_core::HsError) -> Self {
        match e {
            hs_core::HsError::InvalidArg { what } => BatteryError::InvalidArg { what },
        }
    }
}
