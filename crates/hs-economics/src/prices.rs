//! Capital cost table keyed by technology and projection year.

use crate::error::{EconomicsError, EconomicsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Priced technologies. Both tank stages share the hydrogen tank price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    /// [€/MWh]
    Battery,
    /// [€/kW]
    Electrolyzer,
    /// [€/kW]
    FuelCell,
    /// [€/kg]
    HydrogenTank,
    /// [€/kWp]
    Pv,
    /// [€/kW]
    Wind,
}

impl Technology {
    pub const ALL: [Technology; 6] = [
        Technology::Battery,
        Technology::Electrolyzer,
        Technology::FuelCell,
        Technology::HydrogenTank,
        Technology::Pv,
        Technology::Wind,
    ];
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::Battery => "battery",
            Technology::Electrolyzer => "electrolyzer",
            Technology::FuelCell => "fuel cell",
            Technology::HydrogenTank => "hydrogen tank",
            Technology::Pv => "PV",
            Technology::Wind => "wind turbine",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ProjectionYear {
    #[default]
    Y2020,
    Y2030,
    Y2050,
}

impl TryFrom<u32> for ProjectionYear {
    type Error = EconomicsError;

    fn try_from(year: u32) -> Result<Self, Self::Error> {
        match year {
            2020 => Ok(ProjectionYear::Y2020),
            2030 => Ok(ProjectionYear::Y2030),
            2050 => Ok(ProjectionYear::Y2050),
            other => Err(EconomicsError::UnsupportedYear(other)),
        }
    }
}

impl From<ProjectionYear> for u32 {
    fn from(year: ProjectionYear) -> Self {
        match year {
            ProjectionYear::Y2020 => 2020,
            ProjectionYear::Y2030 => 2030,
            ProjectionYear::Y2050 => 2050,
        }
    }
}

impl fmt::Display for ProjectionYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u32::from(*self))
    }
}

/// Average installed cost per technology and year.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(pub BTreeMap<Technology, BTreeMap<ProjectionYear, f64>>);

impl PriceTable {
    pub fn insert(&mut self, technology: Technology, year: ProjectionYear, price: f64) {
        self.0.entry(technology).or_default().insert(year, price);
    }

    pub fn price(&self, technology: Technology, year: ProjectionYear) -> EconomicsResult<f64> {
        self.0
            .get(&technology)
            .and_then(|by_year| by_year.get(&year))
            .copied()
            .ok_or_else(|| EconomicsError::MissingPrice {
                technology: technology.to_string(),
                year: year.into(),
            })
    }

    /// Every technology priced, finite and non-negative for `year`.
    pub fn validate_year(&self, year: ProjectionYear) -> EconomicsResult<()> {
        for technology in Technology::ALL {
            let price = self.price(technology, year)?;
            if !(price.is_finite() && price >= 0.0) {
                return Err(EconomicsError::InvalidCost {
                    what: format!("{technology} price {price} for {year}"),
                });
            }
        }
        Ok(())
    }
}
