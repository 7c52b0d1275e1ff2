//! Project loading and validation.

use crate::error::{AppError, AppResult};
use crate::objective::Evaluator;
use hs_project::{LoadedSeries, ProjectFile};
use std::path::{Path, PathBuf};

/// A validated project together with its input profiles.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub path: PathBuf,
    pub project: ProjectFile,
    pub series: LoadedSeries,
}

impl LoadedProject {
    pub fn evaluator(&self) -> Evaluator {
        Evaluator {
            series: self.series.series.clone(),
            constants: self.project.plant,
            options: self.project.simulation.to_sim_options(),
            search: self.project.search,
            economics: self.project.economics.clone(),
        }
    }
}

/// Load, migrate and validate a project file.
pub fn load_project_file(path: &Path) -> AppResult<ProjectFile> {
    if !path.exists() {
        return Err(AppError::ProjectFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    let project = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => hs_project::load_json(path)?,
        _ => hs_project::load_yaml(path)?,
    };
    Ok(project)
}

/// Load a project and its time series.
pub fn load_project(path: &Path) -> AppResult<LoadedProject> {
    let project = load_project_file(path)?;
    let series = hs_project::load_project_series(path, &project)?;
    Ok(LoadedProject {
        path: path.to_path_buf(),
        project,
        series,
    })
}

/// Short description of a validated project.
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub steps: usize,
    pub timestep_per_hour: u32,
    pub first_timestamp: Option<String>,
    pub search_points: u128,
}

pub fn summarize(loaded: &LoadedProject) -> ProjectSummary {
    let search_points = loaded
        .project
        .search
        .bounds()
        .iter()
        .map(|(lo, hi)| (hi - lo + 1).max(0) as u128)
        .product();
    ProjectSummary {
        name: loaded.project.name.clone(),
        steps: loaded.series.series.len(),
        timestep_per_hour: loaded.project.simulation.timestep_per_hour,
        first_timestamp: loaded.series.timestamps.first().map(|t| t.to_string()),
        search_points,
    }
}
