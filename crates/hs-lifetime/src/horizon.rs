//! Repeat a component's useful-life trajectory over the project horizon.

use crate::error::{LifetimeError, LifetimeResult};

pub const DEFAULT_HORIZON_YEARS: usize = 20;

/// Cycle `life` (one entry per year of useful life) until it covers
/// `horizon_years`, keeping at most `horizon_years + 1` entries.
pub fn cycle_to_horizon(life: &[f64], horizon_years: usize) -> LifetimeResult<Vec<f64>> {
    if life.is_empty() {
        return Err(LifetimeError::Degenerate {
            what: "component trajectory has no useful year",
        });
    }
    let repeats = horizon_years.div_ceil(life.len()).max(1);
    Ok(life
        .iter()
        .copied()
        .cycle()
        .take((repeats * life.len()).min(horizon_years + 1))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn repeats_and_truncates() {
        let v = cycle_to_horizon(&[1.0, 2.0, 3.0], 20).unwrap();
        assert_eq!(v.len(), 21);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[3], 1.0);
        assert_eq!(v[20], 3.0);
    }

    #[test]
    fn exact_divisor_gives_horizon_entries() {
        let v = cycle_to_horizon(&[0.9; 10], 20).unwrap();
        assert_eq!(v.len(), 20);
    }

    #[test]
    fn empty_life_is_degenerate() {
        assert!(matches!(
            cycle_to_horizon(&[], 20),
            Err(LifetimeError::Degenerate { .. })
        ));
    }

    proptest! {
        #[test]
        fn covers_horizon_in_order(
            life in prop::collection::vec(0.5f64..1.0, 1..12),
            horizon in 1usize..40,
        ) {
            let v = cycle_to_horizon(&life, horizon).unwrap();
            prop_assert!(v.len() >= horizon && v.len() <= horizon + 1);
            for (i, x) in v.iter().enumerate() {
                prop_assert_eq!(*x, life[i % life.len()]);
            }
        }
    }
}
