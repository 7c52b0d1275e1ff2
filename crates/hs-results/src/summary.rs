//! CSV writers: the optimization summary, annual rows and dispatch traces.

use crate::ResultsResult;
use crate::types::AnnualCsvRow;
use hs_sim::{AnnualRow, PlantConstants, PlantSizing, StepRecord};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

pub const SUMMARY_DELIMITER: u8 = b';';

/// One line of the sizing summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "EL")]
    pub electrolyzer_cells: u32,
    #[serde(rename = "FC")]
    pub fuel_cell_stacks: u32,
    #[serde(rename = "BESS")]
    pub battery_kwh: f64,
    #[serde(rename = "Tank")]
    pub high_pressure_tank_kg: f64,
    #[serde(rename = "PV")]
    pub pv_kwp: f64,
    #[serde(rename = "LCORE")]
    pub lcore: f64,
    /// Wall-clock seconds
    #[serde(rename = "time")]
    pub elapsed_s: f64,
}

impl SummaryRecord {
    pub fn new(sizing: &PlantSizing, constants: &PlantConstants, lcore: f64, elapsed_s: f64) -> Self {
        Self {
            electrolyzer_cells: sizing.electrolyzer_cells,
            fuel_cell_stacks: sizing.fuel_cell_stacks,
            battery_kwh: sizing.battery_kwh,
            high_pressure_tank_kg: sizing.high_pressure_tank_kg,
            pv_kwp: constants.pv_kwp(sizing.pv_increments),
            lcore,
            elapsed_s,
        }
    }
}

/// Appends one record; the header is written when the file is new or empty.
pub fn append_summary(path: &Path, record: &SummaryRecord) -> ResultsResult<()> {
    let needs_header = std::fs::metadata(path).map_or(true, |m| m.len() == 0);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(SUMMARY_DELIMITER)
        .has_headers(needs_header)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn read_summaries(path: &Path) -> ResultsResult<Vec<SummaryRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(SUMMARY_DELIMITER)
        .from_path(path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn write_annual_rows(path: &Path, rows: &[AnnualRow]) -> ResultsResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(AnnualCsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_trace(path: &Path, trace: &[StepRecord]) -> ResultsResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in trace {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_pv_peak_power() {
        let sizing = PlantSizing {
            electrolyzer_cells: 20,
            fuel_cell_stacks: 10,
            battery_kwh: 1500.0,
            high_pressure_tank_kg: 300.0,
            pv_increments: 16,
        };
        let record = SummaryRecord::new(&sizing, &PlantConstants::default(), 250.0, 12.5);
        assert_eq!(record.pv_kwp, 320.0);
        assert_eq!(record.lcore, 250.0);
    }
}
