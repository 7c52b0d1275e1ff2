//! Economic assumptions of a project.

use crate::error::{EconomicsError, EconomicsResult};
use crate::lcore::{CostItem, LcoreInputs};
use crate::prices::{PriceTable, ProjectionYear};
use crate::sizes::{Component, ComponentSizes};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which lifetimes schedule battery and hydrogen-unit replacements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Lifetimes from the cost parameters
    #[default]
    Nominal,
    /// Lifetimes found by the degradation extrapolation
    Extrapolated,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    pub om_fraction: f64,
    pub life_years: u32,
    pub replacement_fraction: f64,
}

impl CostParams {
    pub const fn new(om_fraction: f64, life_years: u32, replacement_fraction: f64) -> Self {
        Self {
            om_fraction,
            life_years,
            replacement_fraction,
        }
    }

    /// Stack-type components are replaced at 40 %, batteries at 80 %,
    /// long-lived civil parts never within the horizon.
    pub fn default_for(component: Component) -> Self {
        match component {
            Component::Electrolyzer | Component::FuelCell => Self::new(0.0275, 10, 0.4),
            Component::Battery => Self::new(0.025, 10, 0.8),
            Component::HighPressureTank | Component::LowPressureTank => Self::new(0.01, 25, 0.0),
            Component::Pv | Component::Wind | Component::Compressor => Self::new(0.025, 25, 0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicsConfig {
    pub projection_year: ProjectionYear,
    pub discount_rate: f64,
    pub horizon_years: u32,
    pub grid_price_per_mwh: f64,
    /// Annual energy credited in the denominator; the simulated load when absent
    pub saved_energy_mwh: Option<f64>,
    pub replacement_policy: ReplacementPolicy,
    pub prices: PriceTable,
    pub components: BTreeMap<Component, CostParams>,
    pub compressor_unit_cost: f64,
}

impl Default for EconomicsConfig {
    fn default() -> Self {
        Self {
            projection_year: ProjectionYear::Y2020,
            discount_rate: 0.05,
            horizon_years: 20,
            grid_price_per_mwh: 165_000.0,
            saved_energy_mwh: None,
            replacement_policy: ReplacementPolicy::Nominal,
            prices: PriceTable::default(),
            components: Component::ALL
                .into_iter()
                .map(|c| (c, CostParams::default_for(c)))
                .collect(),
            compressor_unit_cost: 60_000.0,
        }
    }
}

impl EconomicsConfig {
    pub fn cost_params(&self, component: Component) -> CostParams {
        self.components
            .get(&component)
            .copied()
            .unwrap_or_else(|| CostParams::default_for(component))
    }

    pub fn validate(&self) -> EconomicsResult<()> {
        if !(self.discount_rate > -1.0 && self.discount_rate.is_finite()) {
            return Err(EconomicsError::InvalidArg {
                what: "discount rate must be finite and exceed -1",
            });
        }
        if self.horizon_years == 0 {
            return Err(EconomicsError::InvalidArg {
                what: "horizon must be at least one year",
            });
        }
        if !(self.grid_price_per_mwh.is_finite() && self.grid_price_per_mwh >= 0.0) {
            return Err(EconomicsError::InvalidArg {
                what: "grid price must be finite and non-negative",
            });
        }
        if let Some(saved) = self.saved_energy_mwh {
            if !(saved.is_finite() && saved > 0.0) {
                return Err(EconomicsError::InvalidArg {
                    what: "saved energy override must be positive",
                });
            }
        }
        if !(self.compressor_unit_cost.is_finite() && self.compressor_unit_cost >= 0.0) {
            return Err(EconomicsError::InvalidArg {
                what: "compressor cost must be finite and non-negative",
            });
        }
        self.prices.validate_year(self.projection_year)?;
        for component in Component::ALL {
            let p = self.cost_params(component);
            if p.life_years == 0 {
                return Err(EconomicsError::InvalidCost {
                    what: format!("{component} lifetime is zero"),
                });
            }
            let fractions_ok = [p.om_fraction, p.replacement_fraction]
                .iter()
                .all(|f| f.is_finite() && *f >= 0.0);
            if !fractions_ok {
                return Err(EconomicsError::InvalidCost {
                    what: format!("{component} cost fractions must be finite and non-negative"),
                });
            }
        }
        Ok(())
    }

    /// Priced items for the given sizes. Under the extrapolated policy the
    /// entries of `extrapolated_lives` replace the nominal lifetimes.
    pub fn cost_items(
        &self,
        sizes: &ComponentSizes,
        extrapolated_lives: &[(Component, u32)],
    ) -> EconomicsResult<Vec<CostItem>> {
        Component::ALL
            .into_iter()
            .map(|component| {
                let params = self.cost_params(component);
                let unit_cost = match component.technology() {
                    Some(technology) => self.prices.price(technology, self.projection_year)?,
                    None => self.compressor_unit_cost,
                };
                let life_years = match self.replacement_policy {
                    ReplacementPolicy::Nominal => params.life_years,
                    ReplacementPolicy::Extrapolated => extrapolated_lives
                        .iter()
                        .find(|(c, _)| *c == component)
                        .map_or(params.life_years, |(_, life)| *life),
                };
                if life_years == 0 {
                    return Err(EconomicsError::InvalidCost {
                        what: format!("{component} has no useful life"),
                    });
                }
                Ok(CostItem {
                    component,
                    size: sizes.get(component),
                    unit_cost,
                    om_fraction: params.om_fraction,
                    life_years,
                    replacement_fraction: params.replacement_fraction,
                })
            })
            .collect()
    }

    /// Roll-up inputs; `annual_load_mwh` is credited unless overridden.
    pub fn lcore_inputs(
        &self,
        sizes: &ComponentSizes,
        extrapolated_lives: &[(Component, u32)],
        annual_load_mwh: f64,
    ) -> EconomicsResult<LcoreInputs> {
        Ok(LcoreInputs {
            items: self.cost_items(sizes, extrapolated_lives)?,
            discount_rate: self.discount_rate,
            horizon_years: self.horizon_years,
            grid_price_per_mwh: self.grid_price_per_mwh,
            saved_energy_mwh: self.saved_energy_mwh.unwrap_or(annual_load_mwh),
        })
    }
}
