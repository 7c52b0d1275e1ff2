//! Conversion-factor trajectories of electrolyzer and fuel cell.
//!
//! Factors are in kg/MWh. The electrolyzer factor falls with wear
//! (less hydrogen per MWh), the fuel-cell factor rises (more hydrogen
//! per MWh delivered).

use crate::battery_fade::MAX_LIFE_YEARS;
use crate::error::LifetimeResult;
use crate::lsq::curve_fit;
use serde::{Deserialize, Serialize};

/// Fresh electrolyzer factor used as the year -1 anchor [kg/MWh].
pub const ELECTROLYZER_NOMINAL_FACTOR: f64 = 18.0;
/// Fresh fuel-cell factor [kg/MWh].
pub const FUEL_CELL_NOMINAL_FACTOR: f64 = 59.0;
/// Useful life assumed when a unit never ran in the first year.
pub const NOMINAL_LIFE_YEARS: usize = 10;

/// Rated flow of one reference cell at end-of-life voltage and rated current [kg/MWh].
pub fn electrolyzer_end_of_life_factor() -> f64 {
    let rated_flow_kg_per_h = 18.0 / 106.0;
    let power_mw = 2.3 * 5000.0 / 1e6;
    rated_flow_kg_per_h / power_mw
}

/// Reference module flow at end-of-life stack voltage and rated current [kg/MWh].
pub fn fuel_cell_end_of_life_factor() -> f64 {
    let rated_flow_kg_per_h = 59.0 / 74.0;
    let power_kw = 46.2 * 230.0 / 1000.0;
    rated_flow_kg_per_h / power_kw * 1000.0
}

/// Battery-size dependent growth of the fuel-cell factor, `k1·exp(k2·MWh)/1000`.
const FUEL_CELL_GROWTH_SCALE: f64 = 700.23;
const FUEL_CELL_GROWTH_RATE: f64 = -0.386;
const FUEL_CELL_GROWTH_EXPONENT: f64 = 1.25;

/// Slope of the electrolyzer year-average correction against battery SOH.
pub const ELECTROLYZER_SOH_SENSITIVITY: f64 = 1.1;

/// Factor at the start of each year of useful life [kg/MWh].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionTrajectory {
    pub yearly_factor_kg_per_mwh: Vec<f64>,
}

impl ConversionTrajectory {
    pub fn life_years(&self) -> usize {
        self.yearly_factor_kg_per_mwh.len()
    }
}

/// Straight line from the fresh factor one year back to the end-of-year
/// factor, extended while above the end-of-life factor.
pub fn electrolyzer_trajectory(end_factor_kg_per_mwh: f64) -> LifetimeResult<ConversionTrajectory> {
    let p = curve_fit(
        |x, p| p[0] * x + p[1],
        &[-1.0, 0.0],
        &[ELECTROLYZER_NOMINAL_FACTOR, end_factor_kg_per_mwh],
        &[1.0, 1.0],
    )?;
    let limit = electrolyzer_end_of_life_factor();
    let yearly_factor_kg_per_mwh = (0..MAX_LIFE_YEARS)
        .map(|x| p[0] * x as f64 + p[1])
        .filter(|y| *y > limit)
        .collect();
    Ok(ConversionTrajectory {
        yearly_factor_kg_per_mwh,
    })
}

/// Power-law growth from the first-year mean factor, kept while below
/// the end-of-life factor.
pub fn fuel_cell_trajectory(mean_factor_kg_per_mwh: f64, battery_kwh: f64) -> ConversionTrajectory {
    let a = FUEL_CELL_GROWTH_SCALE * (FUEL_CELL_GROWTH_RATE * battery_kwh / 1000.0).exp() / 1000.0;
    let limit = fuel_cell_end_of_life_factor();
    let yearly_factor_kg_per_mwh = (0..MAX_LIFE_YEARS)
        .map(|x| a * (x as f64).powf(FUEL_CELL_GROWTH_EXPONENT) + mean_factor_kg_per_mwh)
        .filter(|y| *y < limit)
        .collect();
    ConversionTrajectory {
        yearly_factor_kg_per_mwh,
    }
}

/// Fresh factors over a nominal life, for units without first-year data.
pub fn nominal_trajectories() -> (ConversionTrajectory, ConversionTrajectory) {
    (
        ConversionTrajectory {
            yearly_factor_kg_per_mwh: vec![ELECTROLYZER_NOMINAL_FACTOR; NOMINAL_LIFE_YEARS],
        },
        ConversionTrajectory {
            yearly_factor_kg_per_mwh: vec![FUEL_CELL_NOMINAL_FACTOR; NOMINAL_LIFE_YEARS],
        },
    )
}
