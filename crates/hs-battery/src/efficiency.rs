//! Lithium NMC efficiency surface as a function of SOC and C-rate.

/// Coefficients of `p00 + p10 x + p01 y + p20 x² + p11 xy + p02 y² + p21 x²y + p12 xy² + p03 y³`
/// with x = SOC and y = C-rate, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EfficiencyCoefficients(pub [f64; 9]);

pub const CHARGE: EfficiencyCoefficients = EfficiencyCoefficients([
    100.968, -0.259233, -6.41535, 0.0799907, 1.84443, 0.255217, -0.563289, -0.171151, 0.0549735,
]);

pub const DISCHARGE: EfficiencyCoefficients = EfficiencyCoefficients([
    100.147, 0.0997555, -6.07639, -0.24408, 0.150757, 0.0434057, 0.879053, -0.0354527,
    -0.00266084,
]);

/// Efficiency as a fraction. Inputs are not range-checked.
pub fn efficiency(soc: f64, c_rate: f64, coeff: &EfficiencyCoefficients) -> f64 {
    let [p00, p10, p01, p20, p11, p02, p21, p12, p03] = coeff.0;
    let x = soc;
    let y = c_rate;
    let eta = p00
        + p10 * x
        + p01 * y
        + p20 * x * x
        + p11 * x * y
        + p02 * y * y
        + p21 * x * x * y
        + p12 * x * y * y
        + p03 * y * y * y;
    eta / 100.0
}
