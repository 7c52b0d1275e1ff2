//! hs-project: project file format, validation and input loading.

pub mod migrate;
pub mod schema;
pub mod timeseries;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use timeseries::{LoadedSeries, TIMESTAMP_FORMATS, load_timeseries_csv, parse_timestamp, read_timeseries};
pub use validate::{ValidationError, validate_project};

use std::path::{Path, PathBuf};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Time series error at row {row}: {what}")]
    TimeSeries { row: usize, what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<ProjectFile> {
    let content = std::fs::read_to_string(path)?;
    let mut project: ProjectFile = serde_yaml::from_str(&content)?;
    project = migrate_to_latest(project)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &ProjectFile) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ProjectFile> {
    let content = std::fs::read_to_string(path)?;
    let mut project: ProjectFile = serde_json::from_str(&content)?;
    project = migrate_to_latest(project)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &Path, project: &ProjectFile) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Time-series path with relative entries resolved against the project file.
pub fn resolve_timeseries_path(project_path: &Path, project: &ProjectFile) -> PathBuf {
    let path = &project.timeseries.path;
    if path.is_absolute() {
        return path.clone();
    }
    project_path
        .parent()
        .map_or_else(|| path.clone(), |dir| dir.join(path))
}

/// Loads the project's time series at its configured resolution.
pub fn load_project_series(project_path: &Path, project: &ProjectFile) -> ProjectResult<LoadedSeries> {
    let path = resolve_timeseries_path(project_path, project);
    load_timeseries_csv(&path, project.simulation.timestep_per_hour)
}
