//! Error types for multi-year extrapolation.

use hs_sim::SimError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LifetimeError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Degenerate trajectory: {what}")]
    Degenerate { what: &'static str },

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),
}

pub type LifetimeResult<T> = Result<T, LifetimeError>;
