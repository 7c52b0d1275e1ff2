//! hs-results: run records and their CSV/JSON storage.

pub mod hash;
pub mod store;
pub mod summary;
pub mod types;

pub use hash::compute_run_id;
pub use store::RunStore;
pub use summary::{SUMMARY_DELIMITER, SummaryRecord, append_summary, read_summaries, write_annual_rows, write_trace};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
