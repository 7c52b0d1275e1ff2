//! Error types for the hs-app service layer.

use std::path::PathBuf;

/// Unified error of the service layer, shared by every frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Lifetime extrapolation error: {0}")]
    Lifetime(String),

    #[error("Economics error: {0}")]
    Economics(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Optimizer error: {message}")]
    Optimizer { message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<hs_project::ProjectError> for AppError {
    fn from(err: hs_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<hs_sim::SimError> for AppError {
    fn from(err: hs_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<hs_lifetime::LifetimeError> for AppError {
    fn from(err: hs_lifetime::LifetimeError) -> Self {
        AppError::Lifetime(err.to_string())
    }
}

impl From<hs_economics::EconomicsError> for AppError {
    fn from(err: hs_economics::EconomicsError) -> Self {
        AppError::Economics(err.to_string())
    }
}

impl From<hs_results::ResultsError> for AppError {
    fn from(err: hs_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for AppError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        AppError::Optimizer {
            message: err.to_string(),
        }
    }
}
