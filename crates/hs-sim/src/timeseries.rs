//! Input profiles for one simulated year.

use crate::error::{SimError, SimResult};

/// Struct of equally long per-step columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    pub wind_kw: Vec<f64>,
    /// Base PV array output, before the sizing multiplier
    pub pv_kw: Vec<f64>,
    pub load_kw: Vec<f64>,
    pub ambient_c: Vec<f64>,
}

impl TimeSeries {
    pub fn new(
        wind_kw: Vec<f64>,
        pv_kw: Vec<f64>,
        load_kw: Vec<f64>,
        ambient_c: Vec<f64>,
    ) -> SimResult<Self> {
        let series = Self {
            wind_kw,
            pv_kw,
            load_kw,
            ambient_c,
        };
        series.validate()?;
        Ok(series)
    }

    pub fn validate(&self) -> SimResult<()> {
        let n = self.wind_kw.len();
        if self.pv_kw.len() != n || self.load_kw.len() != n || self.ambient_c.len() != n {
            return Err(SimError::InvalidArg {
                what: "time-series columns differ in length",
            });
        }
        let columns: [(&'static str, &[f64]); 4] = [
            ("wind power is not finite", &self.wind_kw),
            ("PV power is not finite", &self.pv_kw),
            ("load is not finite", &self.load_kw),
            ("ambient temperature is not finite", &self.ambient_c),
        ];
        for (what, column) in columns {
            if column.iter().any(|v| !v.is_finite()) {
                return Err(SimError::InvalidArg { what });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.wind_kw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wind_kw.is_empty()
    }

    /// Constant profile, handy for scenario runs.
    pub fn constant(steps: usize, wind_kw: f64, pv_kw: f64, load_kw: f64, ambient_c: f64) -> Self {
        Self {
            wind_kw: vec![wind_kw; steps],
            pv_kw: vec![pv_kw; steps],
            load_kw: vec![load_kw; steps],
            ambient_c: vec![ambient_c; steps],
        }
    }

    pub fn total_load_kw(&self) -> f64 {
        self.load_kw.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_columns() {
        let err = TimeSeries::new(vec![1.0, 2.0], vec![0.0], vec![1.0, 1.0], vec![20.0, 20.0]);
        assert!(matches!(err, Err(SimError::InvalidArg { .. })));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = TimeSeries::new(vec![f64::NAN], vec![0.0], vec![1.0], vec![20.0]);
        assert!(err.is_err());
    }

    #[test]
    fn constant_profile() {
        let s = TimeSeries::constant(3, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(s.len(), 3);
        assert!(s.validate().is_ok());
        assert_eq!(s.total_load_kw(), 9.0);
    }
}
