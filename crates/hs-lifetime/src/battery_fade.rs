//! Battery capacity fade beyond the first simulated year.

use crate::error::{LifetimeError, LifetimeResult};
use crate::lsq::curve_fit;
use serde::{Deserialize, Serialize};

/// Shape exponent of the fade curve `a·x^FADE_EXPONENT + 1`.
pub const FADE_EXPONENT: f64 = 1.06;
/// SOH at which the battery is replaced.
pub const END_OF_LIFE_SOH: f64 = 0.7;
/// Years of the fitted curve that are inspected.
pub const MAX_LIFE_YEARS: usize = 10;

/// Size-dependent lift of the mid-year anchor, `m·kWh + q`, floored at zero.
const MID_YEAR_SLOPE: f64 = -5.43e-7;
const MID_YEAR_OFFSET: f64 = 0.00763;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatteryFade {
    /// Fitted `a` of `a·x^1.06 + 1`
    pub coefficient: f64,
    /// SOH at the start of each year of useful life
    pub yearly_soh: Vec<f64>,
    /// Mean SOH over each year of useful life
    pub year_average_soh: Vec<f64>,
}

impl BatteryFade {
    pub fn soh_at(&self, years: f64) -> f64 {
        self.coefficient * years.powf(FADE_EXPONENT) + 1.0
    }

    pub fn life_years(&self) -> usize {
        self.yearly_soh.len()
    }
}

/// Fit the fade curve through (0, 1), (0.5, mid) and (1, SOH after year one).
pub fn fit_battery_fade(first_year_soh: f64, battery_kwh: f64) -> LifetimeResult<BatteryFade> {
    if !(first_year_soh.is_finite() && first_year_soh > 0.0 && first_year_soh <= 1.0) {
        return Err(LifetimeError::InvalidArg {
            what: "first-year SOH must lie in (0, 1]",
        });
    }
    let lift = (MID_YEAR_SLOPE * battery_kwh + MID_YEAR_OFFSET).max(0.0);
    let xs = [0.0, 0.5, 1.0];
    let ys = [1.0, (1.0 + first_year_soh) / 2.0 + lift, first_year_soh];
    let params = curve_fit(|x: f64, p| p[0] * x.powf(FADE_EXPONENT) + 1.0, &xs, &ys, &[1.0])?;

    let mut fade = BatteryFade {
        coefficient: params[0],
        yearly_soh: Vec::new(),
        year_average_soh: Vec::new(),
    };
    for year in 0..MAX_LIFE_YEARS {
        let start = fade.soh_at(year as f64);
        if start > END_OF_LIFE_SOH {
            fade.yearly_soh.push(start);
            fade.year_average_soh.push((start + fade.soh_at(year as f64 + 1.0)) / 2.0);
        }
    }
    Ok(fade)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_passes_near_anchors() {
        let fade = fit_battery_fade(0.98, 20_000.0).unwrap();
        assert_eq!(fade.soh_at(0.0), 1.0);
        assert!((fade.soh_at(1.0) - 0.98).abs() < 5e-3);
        assert!(fade.coefficient < 0.0);
    }

    #[test]
    fn fast_fade_shortens_life() {
        let slow = fit_battery_fade(0.99, 20_000.0).unwrap();
        let fast = fit_battery_fade(0.9, 20_000.0).unwrap();
        assert_eq!(slow.life_years(), MAX_LIFE_YEARS);
        assert!(fast.life_years() < slow.life_years());
        assert!(fast.yearly_soh.iter().all(|s| *s > END_OF_LIFE_SOH));
    }

    #[test]
    fn averages_lie_between_year_bounds() {
        let fade = fit_battery_fade(0.95, 5_000.0).unwrap();
        for (i, avg) in fade.year_average_soh.iter().enumerate() {
            assert!(*avg <= fade.soh_at(i as f64));
            assert!(*avg >= fade.soh_at(i as f64 + 1.0));
        }
    }

    #[test]
    fn rejects_unphysical_soh() {
        assert!(fit_battery_fade(1.2, 100.0).is_err());
        assert!(fit_battery_fade(f64::NAN, 100.0).is_err());
    }
}
