//! Plant sizing and the integer search space over it.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Installed sizes of one plant configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantSizing {
    pub electrolyzer_cells: u32,
    pub fuel_cell_stacks: u32,
    pub battery_kwh: f64,
    pub high_pressure_tank_kg: f64,
    /// PV arrays added on top of the base array
    pub pv_increments: u32,
}

impl PlantSizing {
    /// Hydrogen dispatch runs only with both conversion units installed.
    pub fn hydrogen_enabled(&self) -> bool {
        self.electrolyzer_cells > 0 && self.fuel_cell_stacks > 0
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.battery_kwh.is_finite() && self.battery_kwh >= 0.0) {
            return Err(SimError::InvalidSizing {
                what: format!("battery capacity {} kWh", self.battery_kwh),
            });
        }
        if !(self.high_pressure_tank_kg.is_finite() && self.high_pressure_tank_kg >= 0.0) {
            return Err(SimError::InvalidSizing {
                what: format!("high-pressure tank {} kg", self.high_pressure_tank_kg),
            });
        }
        Ok(())
    }
}

/// Fixed, non-sized plant data.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConstants {
    pub wind_kw: f64,
    pub pv_base_kwp: f64,
    /// Increments that add up to one more base array
    pub pv_increments_per_base: f64,
}

impl Default for PlantConstants {
    fn default() -> Self {
        Self {
            wind_kw: 800.0,
            pv_base_kwp: 160.0,
            pv_increments_per_base: 16.0,
        }
    }
}

impl PlantConstants {
    /// Multiplier applied to the base PV profile.
    pub fn pv_factor(&self, pv_increments: u32) -> f64 {
        1.0 + pv_increments as f64 / self.pv_increments_per_base
    }

    pub fn pv_kwp(&self, pv_increments: u32) -> f64 {
        self.pv_base_kwp * self.pv_factor(pv_increments)
    }
}

/// One decision variable: integer steps of `resolution` up to `max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchVariable {
    pub max: f64,
    pub resolution: f64,
    #[serde(default)]
    pub min_steps: u32,
}

impl SearchVariable {
    pub const fn new(max: f64, resolution: f64, min_steps: u32) -> Self {
        Self {
            max,
            resolution,
            min_steps,
        }
    }

    /// Inclusive bounds in resolution steps.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min_steps as i64, (self.max / self.resolution).floor() as i64)
    }

    fn decode(&self, steps: i64, name: &str) -> SimResult<f64> {
        let (lo, hi) = self.bounds();
        if steps < lo || steps > hi {
            return Err(SimError::InvalidSizing {
                what: format!("{name} step {steps} outside [{lo}, {hi}]"),
            });
        }
        Ok(steps as f64 * self.resolution)
    }
}

/// Bounds and resolutions of the five sizing variables.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub electrolyzer_cells: SearchVariable,
    pub fuel_cell_stacks: SearchVariable,
    pub battery_kwh: SearchVariable,
    pub high_pressure_tank_kg: SearchVariable,
    pub pv_increments: SearchVariable,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            electrolyzer_cells: SearchVariable::new(70.0, 5.0, 0),
            fuel_cell_stacks: SearchVariable::new(90.0, 5.0, 0),
            battery_kwh: SearchVariable::new(25_000.0, 50.0, 1),
            high_pressure_tank_kg: SearchVariable::new(10_000.0, 100.0, 0),
            pv_increments: SearchVariable::new(200.0, 5.0, 0),
        }
    }
}

impl SearchSpace {
    pub const DIMENSIONS: usize = 5;

    fn variables(&self) -> [(&'static str, &SearchVariable); 5] {
        [
            ("electrolyzer_cells", &self.electrolyzer_cells),
            ("fuel_cell_stacks", &self.fuel_cell_stacks),
            ("battery_kwh", &self.battery_kwh),
            ("high_pressure_tank_kg", &self.high_pressure_tank_kg),
            ("pv_increments", &self.pv_increments),
        ]
    }

    pub fn validate(&self) -> SimResult<()> {
        for (name, v) in self.variables() {
            if !(v.resolution > 0.0 && v.resolution.is_finite()) {
                return Err(SimError::InvalidSizing {
                    what: format!("{name} resolution must be positive"),
                });
            }
            let (lo, hi) = v.bounds();
            if hi < lo {
                return Err(SimError::InvalidSizing {
                    what: format!("{name} maximum below its minimum step"),
                });
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> [(i64, i64); 5] {
        self.variables().map(|(_, v)| v.bounds())
    }

    /// Turn an integer decision vector into a validated sizing.
    pub fn decode(&self, x: &[i64]) -> SimResult<PlantSizing> {
        let [el, fc, bess, tank, pv] = x else {
            return Err(SimError::InvalidSizing {
                what: format!("decision vector has {} entries, expected 5", x.len()),
            });
        };
        let sizing = PlantSizing {
            electrolyzer_cells: self.electrolyzer_cells.decode(*el, "electrolyzer_cells")? as u32,
            fuel_cell_stacks: self.fuel_cell_stacks.decode(*fc, "fuel_cell_stacks")? as u32,
            battery_kwh: self.battery_kwh.decode(*bess, "battery_kwh")?,
            high_pressure_tank_kg: self.high_pressure_tank_kg.decode(*tank, "high_pressure_tank_kg")?,
            pv_increments: self.pv_increments.decode(*pv, "pv_increments")? as u32,
        };
        sizing.validate()?;
        Ok(sizing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds() {
        let s = SearchSpace::default();
        assert_eq!(s.bounds(), [(0, 14), (0, 18), (1, 500), (0, 100), (0, 40)]);
    }

    #[test]
    fn decode_applies_resolutions() {
        let s = SearchSpace::default();
        let sizing = s.decode(&[2, 3, 20, 5, 4]).unwrap();
        assert_eq!(sizing.electrolyzer_cells, 10);
        assert_eq!(sizing.fuel_cell_stacks, 15);
        assert_eq!(sizing.battery_kwh, 1000.0);
        assert_eq!(sizing.high_pressure_tank_kg, 500.0);
        assert_eq!(sizing.pv_increments, 20);
        assert!(sizing.hydrogen_enabled());
    }

    #[test]
    fn decode_rejects_out_of_bounds_and_bad_length() {
        let s = SearchSpace::default();
        assert!(s.decode(&[0, 0, 0, 0, 0]).is_err());
        assert!(s.decode(&[15, 0, 1, 0, 0]).is_err());
        assert!(s.decode(&[1, 1, 1]).is_err());
    }

    #[test]
    fn hydrogen_needs_both_units() {
        let s = SearchSpace::default();
        assert!(!s.decode(&[2, 0, 1, 1, 0]).unwrap().hydrogen_enabled());
        assert!(!s.decode(&[0, 2, 1, 1, 0]).unwrap().hydrogen_enabled());
    }

    #[test]
    fn pv_scaling() {
        let c = PlantConstants::default();
        assert_eq!(c.pv_factor(0), 1.0);
        assert_eq!(c.pv_factor(16), 2.0);
        assert_eq!(c.pv_kwp(8), 240.0);
    }
}
