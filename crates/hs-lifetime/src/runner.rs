//! One full-fidelity year followed by reduced-fidelity later years.

use crate::error::LifetimeResult;
use crate::projection::{Projection, project};
use hs_sim::{
    AnnualRow, PlantConstants, PlantSizing, ReducedYearInputs, SimOptions, SimulationResults,
    TimeSeries, run_full_year, run_reduced_year,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifetimeRun {
    pub first_year: SimulationResults,
    pub projection: Projection,
    /// Year 1 from the full run, then one reduced row per later year
    pub rows: Vec<AnnualRow>,
}

pub fn run_lifetime(
    series: &TimeSeries,
    sizing: &PlantSizing,
    constants: &PlantConstants,
    options: &SimOptions,
    horizon_years: usize,
) -> LifetimeResult<LifetimeRun> {
    let first_year = run_full_year(series, sizing, constants, options)?;
    let projection = project(&first_year, horizon_years)?;

    let reduced_options = SimOptions {
        record_trace: false,
        ..options.clone()
    };
    let mut rows = Vec::with_capacity(horizon_years);
    rows.push(first_year.annual_row(1));
    for i in 1..horizon_years {
        let inputs = ReducedYearInputs {
            battery_capacity_kwh: projection.battery_capacity_kwh[i],
            electrolyzer_factor_kg_per_kwh: projection.electrolyzer_factor_kg_per_mwh[i] / 1000.0,
            fuel_cell_factor_kg_per_kwh: projection.fuel_cell_factor_kg_per_mwh[i] / 1000.0,
        };
        let row = run_reduced_year(series, sizing, constants, &reduced_options, &inputs, i as u32 + 1)?;
        debug!(
            year = row.year,
            deficit_mwh = row.energy.deficit,
            produced_kg = row.hydrogen_produced_kg,
            "reduced year finished"
        );
        rows.push(row);
    }

    Ok(LifetimeRun {
        first_year,
        projection,
        rows,
    })
}
