//! Time-series CSV loader.
//!
//! Expected header: `date,wind_power,PV_power,load,temperature`
//! (kW, kW, kW, °C), one row per simulation step.

use crate::{ProjectError, ProjectResult};
use chrono::NaiveDateTime;
use hs_sim::TimeSeries;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Accepted timestamp layouts, tried in order.
pub const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

#[derive(Debug, Deserialize)]
struct Row {
    date: String,
    wind_power: f64,
    #[serde(rename = "PV_power")]
    pv_power: f64,
    load: f64,
    temperature: f64,
}

/// Profiles plus the timestamps they were read with.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSeries {
    pub timestamps: Vec<NaiveDateTime>,
    pub series: TimeSeries,
}

pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

pub fn load_timeseries_csv(path: &Path, timestep_per_hour: u32) -> ProjectResult<LoadedSeries> {
    let file = std::fs::File::open(path)?;
    read_timeseries(file, timestep_per_hour)
}

/// Reads rows from any CSV source and checks the fixed resolution.
pub fn read_timeseries<R: std::io::Read>(rdr: R, timestep_per_hour: u32) -> ProjectResult<LoadedSeries> {
    if timestep_per_hour == 0 || 3600 % timestep_per_hour != 0 {
        return Err(ProjectError::TimeSeries {
            row: 0,
            what: format!("timestep_per_hour {timestep_per_hour} does not split the hour into whole seconds"),
        });
    }
    let step_seconds = 3600 / i64::from(timestep_per_hour);

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut timestamps = Vec::new();
    let mut series = TimeSeries::default();

    for (idx, result) in rdr.deserialize::<Row>().enumerate() {
        // Row numbers count the header as row 1.
        let row_no = idx + 2;
        let row = result?;
        let Some(ts) = parse_timestamp(&row.date) else {
            return Err(ProjectError::TimeSeries {
                row: row_no,
                what: format!("unrecognised timestamp '{}'", row.date),
            });
        };
        if let Some(prev) = timestamps.last() {
            let gap = ts.signed_duration_since(*prev).num_seconds();
            if gap != step_seconds {
                return Err(ProjectError::TimeSeries {
                    row: row_no,
                    what: format!("step of {gap} s, expected {step_seconds} s"),
                });
            }
        }
        let values = [row.wind_power, row.pv_power, row.load, row.temperature];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ProjectError::TimeSeries {
                row: row_no,
                what: "non-finite value".to_string(),
            });
        }

        timestamps.push(ts);
        series.wind_kw.push(row.wind_power);
        series.pv_kw.push(row.pv_power);
        series.load_kw.push(row.load);
        series.ambient_c.push(row.temperature);
    }

    if series.is_empty() {
        return Err(ProjectError::TimeSeries {
            row: 1,
            what: "no data rows".to_string(),
        });
    }
    debug!(rows = series.len(), "time series loaded");
    Ok(LoadedSeries { timestamps, series })
}
