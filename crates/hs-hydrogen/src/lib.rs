//! Hydrogen path models: electrolyzer, fuel cell, compressor and tanks.
//!
//! The electrolyzer and the fuel cell share one electro-thermal unit type,
//! instantiated with different parameter sets.

pub mod compressor;
pub mod error;
pub mod params;
pub mod polarization;
pub mod storage;
pub mod thermal;
pub mod unit;

pub use compressor::CompressorParams;
pub use error::{HydrogenError, HydrogenResult};
pub use params::{ELECTROLYZER, FUEL_CELL, HydrogenCurve, ThermalParams, UnitParams, UnitRole};
pub use polarization::{ConversionModel, conversion_factor, conversion_model};
pub use storage::{CompressorState, StorageParams, TankBank, Transfer};
pub use thermal::{ThermalNetwork, thermal_step};
pub use unit::{ElectroThermalUnit, FixedFactor, HydrogenConverter};
