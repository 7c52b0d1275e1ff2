//! Result data types.

use hs_economics::LcoreBreakdown;
use hs_lifetime::Projection;
use hs_sim::{AnnualRow, PlantSizing, SimulationResults};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub project_name: String,
    pub timestamp: String,
    pub run_kind: RunKind,
    pub sizing: PlantSizing,
    pub crate_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn new(run_id: RunId, project_name: impl Into<String>, run_kind: RunKind, sizing: PlantSizing) -> Self {
        Self {
            run_id,
            project_name: project_name.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            run_kind,
            sizing,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunKind {
    /// One full-fidelity year
    Simulate,
    /// Lifetime run and cost roll-up of a fixed sizing
    Evaluate { horizon_years: usize },
    /// Best sizing found by the optimizer
    Optimize {
        generations: usize,
        evaluations: usize,
        elapsed_s: f64,
    },
}

/// Everything one run produced, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub first_year: SimulationResults,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<AnnualRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcore: Option<LcoreBreakdown>,
}

impl RunReport {
    pub fn lcore_per_mwh(&self) -> Option<f64> {
        self.lcore.as_ref().map(|b| b.lcore)
    }
}

/// Flat CSV layout of [`AnnualRow`]; energies in MWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnualCsvRow {
    pub year: u32,
    pub battery_capacity_kwh: f64,
    pub soh: f64,
    pub el_factor_kg_per_mwh: f64,
    pub fc_factor_kg_per_mwh: f64,
    pub h2_produced_kg: f64,
    pub h2_compressed_kg: f64,
    pub e_res: f64,
    pub e_load: f64,
    pub e_excess_res: f64,
    pub e_deficit_res: f64,
    pub e_excess_bess: f64,
    pub e_deficit_bess: f64,
    pub e_to_h2: f64,
    pub e_compressor: f64,
    pub e_from_fc: f64,
    pub e_excess: f64,
    pub e_deficit: f64,
    pub self_consumption_res_pct: f64,
    pub self_consumption_bess_pct: f64,
    pub self_consumption_h2_pct: f64,
}

impl From<&AnnualRow> for AnnualCsvRow {
    fn from(row: &AnnualRow) -> Self {
        let e = &row.energy;
        Self {
            year: row.year,
            battery_capacity_kwh: row.battery_capacity_kwh,
            soh: row.soh,
            el_factor_kg_per_mwh: row.electrolyzer_factor_kg_per_mwh,
            fc_factor_kg_per_mwh: row.fuel_cell_factor_kg_per_mwh,
            h2_produced_kg: row.hydrogen_produced_kg,
            h2_compressed_kg: row.hydrogen_compressed_kg,
            e_res: e.renewable,
            e_load: e.load,
            e_excess_res: e.excess_renewable,
            e_deficit_res: e.deficit_renewable,
            e_excess_bess: e.excess_after_battery,
            e_deficit_bess: e.deficit_after_battery,
            e_to_h2: e.to_hydrogen,
            e_compressor: e.compressor,
            e_from_fc: e.from_fuel_cell,
            e_excess: e.excess,
            e_deficit: e.deficit,
            self_consumption_res_pct: e.renewable_self_consumption(),
            self_consumption_bess_pct: e.battery_self_consumption(),
            self_consumption_h2_pct: e.hydrogen_self_consumption(),
        }
    }
}
