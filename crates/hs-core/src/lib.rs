//! hs-core: shared foundation for the hybrid storage simulator.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real + tolerances + float helpers)
//! - interp (clamped piecewise-linear tables)
//! - error (shared error types)

pub mod error;
pub mod interp;
pub mod numeric;
pub mod units;

pub use error::{HsError, HsResult};
pub use interp::Interp1D;
pub use numeric::*;
pub use units::*;
