//! Nonlinear least squares by Levenberg-Marquardt.

use crate::error::{LifetimeError, LifetimeResult};
use nalgebra::{DMatrix, DVector};

/// Levenberg-Marquardt configuration.
#[derive(Clone, Copy, Debug)]
pub struct LmConfig {
    pub max_iterations: usize,
    /// Relative step size below which the fit has converged
    pub x_tol: f64,
    /// Relative cost reduction below which the fit has converged
    pub f_tol: f64,
    /// Largest gradient component accepted as stationary
    pub g_tol: f64,
    pub initial_damping: f64,
    /// Forward-difference step scale
    pub epsilon: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            x_tol: 1e-10,
            f_tol: 1e-12,
            g_tol: 1e-12,
            initial_damping: 1e-3,
            epsilon: 1.5e-8,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LmReport {
    pub params: DVector<f64>,
    /// Half the squared residual norm at the solution
    pub cost: f64,
    pub iterations: usize,
}

/// Jacobian of `f` by forward differences.
pub fn finite_difference_jacobian<F>(x: &DVector<f64>, f: F, epsilon: f64) -> LifetimeResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> LifetimeResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);
    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let df = (f(&x_perturbed)? - &f_x) / dx;
        jac.set_column(j, &df);
    }
    Ok(jac)
}

fn cost(r: &DVector<f64>) -> f64 {
    0.5 * r.norm_squared()
}

fn checked(r: DVector<f64>) -> LifetimeResult<DVector<f64>> {
    if r.iter().all(|v| v.is_finite()) {
        Ok(r)
    } else {
        Err(LifetimeError::Numeric {
            what: "residual is not finite".to_string(),
        })
    }
}

/// Minimize `0.5·|r(p)|²` from `p0`.
pub fn levenberg_marquardt<F>(p0: DVector<f64>, residual_fn: F, config: &LmConfig) -> LifetimeResult<LmReport>
where
    F: Fn(&DVector<f64>) -> LifetimeResult<DVector<f64>>,
{
    let residual = |p: &DVector<f64>| residual_fn(p).and_then(checked);

    let mut p = p0;
    let mut r = residual(&p)?;
    if r.len() < p.len() {
        return Err(LifetimeError::InvalidArg {
            what: "fewer residuals than parameters",
        });
    }
    let mut c = cost(&r);
    let mut lambda = config.initial_damping;

    for iter in 0..config.max_iterations {
        let jac = finite_difference_jacobian(&p, &residual, config.epsilon)?;
        let jt = jac.transpose();
        let jtj = &jt * &jac;
        let gradient = &jt * &r;

        if gradient.amax() <= config.g_tol || c == 0.0 {
            return Ok(LmReport {
                params: p,
                cost: c,
                iterations: iter,
            });
        }

        // Raise damping until a step lowers the cost.
        let mut accepted = false;
        while lambda < 1e16 {
            let mut a = jtj.clone();
            for k in 0..a.nrows() {
                a[(k, k)] += lambda * jtj[(k, k)].max(1e-12);
            }
            let Some(step) = a.lu().solve(&(-&gradient)) else {
                lambda *= 10.0;
                continue;
            };

            let p_new = &p + &step;
            let r_new = residual(&p_new)?;
            let c_new = cost(&r_new);
            if c_new < c {
                let reduction = (c - c_new) / c.max(f64::MIN_POSITIVE);
                let small_step = step.norm() <= config.x_tol * (p.norm() + config.x_tol);
                p = p_new;
                r = r_new;
                c = c_new;
                lambda = (lambda / 10.0).max(1e-12);
                accepted = true;
                if small_step || reduction <= config.f_tol {
                    return Ok(LmReport {
                        params: p,
                        cost: c,
                        iterations: iter + 1,
                    });
                }
                break;
            }
            lambda *= 10.0;
        }

        if !accepted {
            // No descent left at any damping: stationary to working precision.
            return Ok(LmReport {
                params: p,
                cost: c,
                iterations: iter,
            });
        }
    }

    Err(LifetimeError::ConvergenceFailed {
        what: format!(
            "maximum iterations {} reached, cost = {}",
            config.max_iterations, c
        ),
    })
}

/// Fit `model(x, p)` to the points `(xs, ys)`; returns the parameters.
pub fn curve_fit<M>(model: M, xs: &[f64], ys: &[f64], p0: &[f64]) -> LifetimeResult<Vec<f64>>
where
    M: Fn(f64, &[f64]) -> f64,
{
    if xs.len() != ys.len() {
        return Err(LifetimeError::InvalidArg {
            what: "x and y data differ in length",
        });
    }
    let residual = |p: &DVector<f64>| -> LifetimeResult<DVector<f64>> {
        let params = p.as_slice();
        Ok(DVector::from_iterator(
            xs.len(),
            xs.iter().zip(ys).map(|(&x, &y)| model(x, params) - y),
        ))
    };
    let report = levenberg_marquardt(DVector::from_column_slice(p0), residual, &LmConfig::default())?;
    Ok(report.params.iter().copied().collect())
}
