//! Cycle-damage capacity fade.

use crate::rainflow::count_cycles;

/// Cycles-to-end-of-life fit `a * DoD^b`.
pub const EOL_CYCLES_COEFF: f64 = 1512.45;
pub const EOL_CYCLES_EXPONENT: f64 = -0.968423;

/// Cycle depths at or below this are ignored.
pub const MIN_DEPTH_OF_DISCHARGE: f64 = 0.01;

/// Fraction of capacity lost when damage reaches 1.
pub const CAPACITY_FADE_AT_EOL: f64 = 0.3;

/// Decimals kept when binning cycle depths.
pub const CYCLE_RANGE_DIGITS: u32 = 3;

pub fn cycles_to_end_of_life(depth_of_discharge: f64) -> f64 {
    EOL_CYCLES_COEFF * depth_of_discharge.powf(EOL_CYCLES_EXPONENT)
}

/// Miner's-rule damage of one day's SOC trace.
pub fn daily_damage(soc_trace: &[f64]) -> f64 {
    count_cycles(soc_trace, CYCLE_RANGE_DIGITS)
        .into_iter()
        .filter(|(depth, _)| *depth > MIN_DEPTH_OF_DISCHARGE)
        .map(|(depth, count)| count / cycles_to_end_of_life(depth))
        .sum()
}

pub fn state_of_health(damage: f64) -> f64 {
    1.0 - CAPACITY_FADE_AT_EOL * damage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_depth_cycle_life() {
        assert!((cycles_to_end_of_life(1.0) - 1512.45).abs() < 1e-9);
        assert!(cycles_to_end_of_life(0.5) > cycles_to_end_of_life(0.8));
    }

    #[test]
    fn shallow_wiggles_do_no_damage() {
        let trace = [0.400, 0.405, 0.400, 0.405, 0.400];
        assert_eq!(daily_damage(&trace), 0.0);
    }

    #[test]
    fn one_deep_cycle() {
        // 0.9 -> 0.2 -> 0.9 counts as two half cycles of depth 0.7
        let trace = [0.9, 0.2, 0.9];
        let expected = 1.0 / cycles_to_end_of_life(0.7);
        assert!((daily_damage(&trace) - expected).abs() < 1e-15);
    }

    #[test]
    fn soh_from_damage() {
        assert_eq!(state_of_health(0.0), 1.0);
        assert!((state_of_health(1.0) - 0.7).abs() < 1e-12);
    }
}
