//! Error types for hydrogen path models.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydrogenError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type HydrogenResult<T> = Result<T, HydrogenError>;

impl From<hs_core::HsError> for HydrogenError {
    fn from(e: hs_core::HsError) -> Self {
        HydrogenError::Backend {
            message: e.to_string(),
        }
    }
}
