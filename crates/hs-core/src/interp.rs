//! Piecewise-linear lookup tables.

use crate::{HsError, HsResult};

/// Piecewise-linear table over strictly increasing breakpoints.
///
/// Queries outside the breakpoint range are clamped to the end values.
#[derive(Clone, Debug, PartialEq)]
pub struct Interp1D {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Interp1D {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> HsResult<Self> {
        if x.len() != y.len() {
            return Err(HsError::InvalidArg {
                what: "interpolation table x/y length mismatch",
            });
        }
        if x.len() < 2 {
            return Err(HsError::InvalidArg {
                what: "interpolation table needs at least two points",
            });
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(HsError::InvalidArg {
                what: "interpolation table contains non-finite values",
            });
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(HsError::InvalidArg {
                what: "interpolation breakpoints must be strictly increasing",
            });
        }
        Ok(Self { x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Table values, writable in place. Breakpoints stay fixed.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.y
    }

    pub fn eval(&self, q: f64) -> f64 {
        let n = self.x.len();
        if q <= self.x[0] {
            return self.y[0];
        }
        if q >= self.x[n - 1] {
            return self.y[n - 1];
        }
        let hi = self.x.partition_point(|v| *v < q).clamp(1, n - 1);
        let lo = hi - 1;
        let slope = (self.y[hi] - self.y[lo]) / (self.x[hi] - self.x[lo]);
        slope * (q - self.x[lo]) + self.y[lo]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Interp1D {
        Interp1D::new(vec![0.0, 1.0, 3.0], vec![10.0, 20.0, 0.0]).unwrap()
    }

    #[test]
    fn interpolates_between_points() {
        let t = table();
        assert_eq!(t.eval(0.5), 15.0);
        assert_eq!(t.eval(2.0), 10.0);
        assert_eq!(t.eval(1.0), 20.0);
    }

    #[test]
    fn clamps_outside_range() {
        let t = table();
        assert_eq!(t.eval(-5.0), 10.0);
        assert_eq!(t.eval(7.0), 0.0);
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(Interp1D::new(vec![0.0], vec![1.0]).is_err());
        assert!(Interp1D::new(vec![0.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(Interp1D::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(Interp1D::new(vec![0.0, f64::NAN], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn values_can_be_rewritten_in_place() {
        let mut t = table();
        t.values_mut().copy_from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(t.eval(2.0), 2.5);
        assert_eq!(t.x(), &[0.0, 1.0, 3.0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn stays_within_value_envelope(q in -10.0f64..10.0) {
                let t = table();
                let v = t.eval(q);
                prop_assert!((0.0..=20.0).contains(&v));
            }
        }
    }
}
