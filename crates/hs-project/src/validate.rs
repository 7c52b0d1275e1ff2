//! Project validation logic.

use crate::schema::{OptimizerDef, ProjectFile, SimulationDef};
use hs_economics::EconomicsError;
use hs_sim::{PlantConstants, SimError};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid simulation setup: {0}")]
    Simulation(#[from] SimError),

    #[error("Invalid economics: {0}")]
    Economics(#[from] EconomicsError),
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

pub fn validate_project(project: &ProjectFile) -> Result<(), ValidationError> {
    if project.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if project.timeseries.path.as_os_str().is_empty() {
        return Err(invalid("timeseries.path", "", "must name a CSV file"));
    }

    validate_simulation(&project.simulation)?;
    validate_plant(&project.plant)?;
    project.search.validate()?;
    project.economics.validate()?;
    validate_optimizer(&project.optimizer)?;
    Ok(())
}

fn validate_simulation(sim: &SimulationDef) -> Result<(), ValidationError> {
    if sim.timestep_per_hour == 0 {
        return Err(invalid("simulation.timestep_per_hour", 0, "must be positive"));
    }
    if !(sim.initial_soc > 0.0 && sim.initial_soc < 1.0) {
        return Err(invalid("simulation.initial_soc", sim.initial_soc, "must lie in (0, 1)"));
    }
    positive("simulation.low_pressure_tank_kg", sim.low_pressure_tank_kg)?;
    positive(
        "simulation.compression_rate_kg_per_hour",
        sim.compression_rate_kg_per_hour,
    )?;
    if !(0.0..=1.0).contains(&sim.initial_high_pressure_fill) {
        return Err(invalid(
            "simulation.initial_high_pressure_fill",
            sim.initial_high_pressure_fill,
            "must lie in [0, 1]",
        ));
    }
    // Battery window and compressor checks live with the run options.
    sim.to_sim_options().validate()?;
    Ok(())
}

fn validate_plant(plant: &PlantConstants) -> Result<(), ValidationError> {
    if !(plant.wind_kw.is_finite() && plant.wind_kw >= 0.0) {
        return Err(invalid("plant.wind_kw", plant.wind_kw, "must be non-negative"));
    }
    positive("plant.pv_base_kwp", plant.pv_base_kwp)?;
    positive("plant.pv_increments_per_base", plant.pv_increments_per_base)?;
    Ok(())
}

fn validate_optimizer(opt: &OptimizerDef) -> Result<(), ValidationError> {
    if opt.population_multiplier == 0 {
        return Err(invalid("optimizer.population_multiplier", 0, "must be positive"));
    }
    if opt.max_generations == 0 {
        return Err(invalid("optimizer.max_generations", 0, "must be positive"));
    }
    if !(opt.relative_tolerance.is_finite() && opt.relative_tolerance >= 0.0) {
        return Err(invalid(
            "optimizer.relative_tolerance",
            opt.relative_tolerance,
            "must be non-negative",
        ));
    }
    if !(opt.absolute_tolerance.is_finite() && opt.absolute_tolerance >= 0.0) {
        return Err(invalid(
            "optimizer.absolute_tolerance",
            opt.absolute_tolerance,
            "must be non-negative",
        ));
    }
    let (lo, hi) = opt.mutation;
    if !(0.0 <= lo && lo <= hi && hi <= 2.0) {
        return Err(invalid(
            "optimizer.mutation",
            format!("({lo}, {hi})"),
            "dither range must satisfy 0 <= lo <= hi <= 2",
        ));
    }
    if !(0.0..=1.0).contains(&opt.recombination) {
        return Err(invalid(
            "optimizer.recombination",
            opt.recombination,
            "must lie in [0, 1]",
        ));
    }
    if opt.workers == Some(0) {
        return Err(invalid("optimizer.workers", 0, "must be positive when given"));
    }
    Ok(())
}
