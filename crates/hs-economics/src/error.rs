//! Error types for the cost roll-up.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconomicsError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("No {technology} price for projection year {year}")]
    MissingPrice { technology: String, year: u32 },

    #[error("Unsupported projection year {0}")]
    UnsupportedYear(u32),

    #[error("Invalid cost data: {what}")]
    InvalidCost { what: String },
}

pub type EconomicsResult<T> = Result<T, EconomicsError>;
