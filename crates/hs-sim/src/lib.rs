//! Dispatch simulation of the hybrid renewable plus storage plant.
//!
//! Provides:
//! - Named plant sizing and the integer search space it is decoded from
//! - Input time series of renewable power, load and ambient temperature
//! - Greedy per-step dispatch across battery, electrolyzer, compressor,
//!   fuel cell and two-stage hydrogen storage
//! - Full-fidelity first-year run and reduced-fidelity later-year runs

pub mod dispatch;
pub mod error;
pub mod full;
pub mod options;
pub mod reduced;
pub mod results;
pub mod sizing;
pub mod timeseries;

pub use dispatch::{ActiveFactor, DispatchTotals, Dispatcher, HydrogenSystem, UnitRating};
pub use error::{SimError, SimResult};
pub use full::run_full_year;
pub use options::SimOptions;
pub use reduced::{ReducedYearInputs, run_reduced_year};
pub use results::{AnnualRow, EnergyBalance, HydrogenSummary, SimulationResults, StepRecord, UnitSummary};
pub use sizing::{PlantConstants, PlantSizing, SearchSpace, SearchVariable};
pub use timeseries::TimeSeries;
