//! Levelized cost of requested energy by discounted cash flow.
//!
//! Year 0 carries the investment. Years 1..=N carry O&M plus the unmet
//! energy bought at the grid price, and the saved energy. Replacements
//! fall on multiples of a component's life strictly inside the horizon.

use crate::error::{EconomicsError, EconomicsResult};
use crate::sizes::Component;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub component: Component,
    pub size: f64,
    /// Installed cost per size unit [€]
    pub unit_cost: f64,
    /// Annual O&M as a share of the installed cost
    pub om_fraction: f64,
    pub life_years: u32,
    /// Replacement cost as a share of the installed cost
    pub replacement_fraction: f64,
}

impl CostItem {
    pub fn investment(&self) -> f64 {
        self.size * self.unit_cost
    }

    pub fn annual_om(&self) -> f64 {
        self.size * self.unit_cost * self.om_fraction
    }

    pub fn replacement_cost(&self) -> f64 {
        self.investment() * self.replacement_fraction
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LcoreInputs {
    pub items: Vec<CostItem>,
    pub discount_rate: f64,
    pub horizon_years: u32,
    /// Price of energy bought to cover unmet load [€/MWh]
    pub grid_price_per_mwh: f64,
    /// Energy credited every year [MWh]
    pub saved_energy_mwh: f64,
}

/// Discounted yearly columns, index = project year.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LcoreBreakdown {
    pub capex: Vec<f64>,
    pub om: Vec<f64>,
    pub energy: Vec<f64>,
    /// [€/MWh]
    pub lcore: f64,
}

/// Years in `(0, horizon)` at which a component of the given life is replaced.
pub fn replacement_years(life_years: u32, horizon_years: u32) -> Vec<u32> {
    if life_years == 0 {
        return Vec::new();
    }
    (1..)
        .map(|k| k * life_years)
        .take_while(|n| *n < horizon_years)
        .collect()
}

/// `unmet_mwh[n - 1]` is the unmet energy of project year `n`.
pub fn lcore(inputs: &LcoreInputs, unmet_mwh: &[f64]) -> EconomicsResult<LcoreBreakdown> {
    let horizon = inputs.horizon_years as usize;
    if horizon == 0 {
        return Err(EconomicsError::InvalidArg {
            what: "horizon must be at least one year",
        });
    }
    if unmet_mwh.len() < horizon {
        return Err(EconomicsError::InvalidArg {
            what: "fewer unmet-energy rows than horizon years",
        });
    }
    if !(inputs.discount_rate > -1.0) {
        return Err(EconomicsError::InvalidArg {
            what: "discount rate must exceed -1",
        });
    }

    let discount = |n: usize| (1.0 + inputs.discount_rate).powi(n as i32);
    let investment: f64 = inputs.items.iter().map(CostItem::investment).sum();
    let annual_om: f64 = inputs.items.iter().map(CostItem::annual_om).sum();

    let mut capex = vec![0.0; horizon + 1];
    let mut om = vec![0.0; horizon + 1];
    let mut energy = vec![0.0; horizon + 1];
    capex[0] = investment;
    for n in 1..=horizon {
        om[n] = (annual_om + unmet_mwh[n - 1] * inputs.grid_price_per_mwh) / discount(n);
        energy[n] = inputs.saved_energy_mwh / discount(n);
    }
    for item in &inputs.items {
        for n in replacement_years(item.life_years, inputs.horizon_years) {
            let n = n as usize;
            capex[n] += item.replacement_cost() / discount(n);
        }
    }

    let cost: f64 = capex.iter().chain(&om).sum();
    let discounted_energy: f64 = energy.iter().sum();
    if !(discounted_energy > 0.0) {
        return Err(EconomicsError::InvalidArg {
            what: "saved energy must be positive",
        });
    }
    let lcore = cost / discounted_energy;
    debug!(
        investment,
        discounted_cost = cost,
        discounted_energy_mwh = discounted_energy,
        lcore,
        "cost roll-up"
    );
    if !lcore.is_finite() {
        return Err(EconomicsError::InvalidCost {
            what: format!("LCORE evaluated to {lcore}"),
        });
    }
    Ok(LcoreBreakdown {
        capex,
        om,
        energy,
        lcore,
    })
}
