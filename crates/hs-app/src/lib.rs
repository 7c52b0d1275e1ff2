//! Shared application service layer for hybrid plant sizing.
//!
//! Provides a single interface for command-line frontends: project loading,
//! the sizing objective, the differential-evolution search and run
//! execution with a content-addressed result cache.

pub mod error;
pub mod objective;
pub mod optimizer;
pub mod progress;
pub mod project_service;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use objective::{Evaluation, Evaluator};
pub use optimizer::{DeConfig, DeOutcome, GenerationEvent, differential_evolution};
pub use progress::{OptimizerProgress, RunProgressEvent, RunStage};
pub use project_service::{LoadedProject, ProjectSummary, load_project, load_project_file, summarize};
pub use run_service::{
    RunMode, RunOptions, RunRequest, RunResponse, ensure_run, ensure_run_with_progress, list_runs,
    load_run,
};
