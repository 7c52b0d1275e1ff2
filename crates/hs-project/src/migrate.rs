//! Schema migration framework.

use crate::ProjectError;
use crate::schema::ProjectFile;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: ProjectFile) -> Result<ProjectFile, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: ProjectFile) -> Result<ProjectFile, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 stated the compressor rate per minute.
fn migrate_v0_to_v1(mut project: ProjectFile) -> Result<ProjectFile, ProjectError> {
    if let Some(per_min) = project.simulation.compression_rate_kg_per_min.take() {
        if !per_min.is_finite() {
            return Err(ProjectError::Migration {
                what: format!("compression rate {} kg/min is not finite", per_min),
            });
        }
        project.simulation.compression_rate_kg_per_hour = per_min * 60.0;
    }
    project.version = 1;
    Ok(project)
}
