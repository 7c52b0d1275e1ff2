//! Techno-economic roll-up of a simulated plant.
//!
//! Provides:
//! - Capital price table keyed by technology and projection year
//! - Per-component O&M, lifetime and replacement parameters
//! - Installed component sizes derived from a simulated plant
//! - Levelized cost of requested energy (LCORE) by discounted cash flow

pub mod config;
pub mod error;
pub mod lcore;
pub mod prices;
pub mod sizes;

pub use config::{CostParams, EconomicsConfig, ReplacementPolicy};
pub use error::{EconomicsError, EconomicsResult};
pub use lcore::{CostItem, LcoreBreakdown, LcoreInputs, lcore, replacement_years};
pub use prices::{PriceTable, ProjectionYear, Technology};
pub use sizes::{Component, ComponentSizes, component_sizes};
