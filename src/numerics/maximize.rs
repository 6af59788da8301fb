//! Bounded maximization
//!
//! # Algorithm
//!
//! 1. **Scan**: evaluate `f` on a grid of `scan_points` over `[a, b]`,
//!    logarithmically spaced when `a > 0` (density curves span many decades),
//!    linearly otherwise.
//! 2. **Refine**: run Brent's parabolic/golden-section minimization of `-f`
//!    inside the two grid cells around the best grid point.
//! 3. Return whichever of the grid point and the refined point is larger.
//!
//! A bare Brent search over a window spanning many decades lands on the flat
//! tail and misses the peak, hence the scan.

use crate::physics::NumericError;

/// Golden-section ratio `(3 - √5) / 2`
const CGOLD: f64 = 0.381_966_011_250_105;

/// Location and value of a maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maximum {
    pub location: f64,
    pub value: f64,
}

/// Parameters of [`maximize`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaximizationConfiguration {
    /// Number of grid points of the initial scan (at least 3)
    pub scan_points: usize,

    /// Relative tolerance on the location
    pub relative_tolerance: f64,

    /// Maximum number of Brent iterations
    pub max_iterations: usize,
}

impl Default for MaximizationConfiguration {
    fn default() -> Self {
        Self {
            scan_points: 64,
            relative_tolerance: 1.5e-8,
            max_iterations: 200,
        }
    }
}

impl MaximizationConfiguration {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.scan_points < 3 {
            return Err("Maximization needs at least 3 scan points".to_string());
        }
        if !(self.relative_tolerance > 0.0) {
            return Err("Maximization tolerance must be positive".to_string());
        }
        if self.max_iterations == 0 {
            return Err("Maximum iterations must be positive".to_string());
        }
        Ok(())
    }
}

/// Find the maximum of `f` on `[a, b]`
///
/// # Errors
///
/// Any error of `f`, a non-finite value of `f`, or an invalid interval.
///
/// # Example
///
/// ```rust
/// use reheat_rs::numerics::maximize::{maximize, MaximizationConfiguration};
///
/// let peak = maximize(|t: f64| Ok(-(t - 2.0).powi(2)), 0.0, 5.0, &MaximizationConfiguration::default())
///     .unwrap();
/// assert!((peak.location - 2.0).abs() < 1e-6);
/// ```
pub fn maximize<F>(
    mut f: F,
    a: f64,
    b: f64,
    config: &MaximizationConfiguration,
) -> Result<Maximum, NumericError>
where
    F: FnMut(f64) -> Result<f64, NumericError>,
{
    if !a.is_finite() || !b.is_finite() || a >= b {
        return Err(NumericError::new(a, format!("invalid maximization interval [{a:e}, {b:e}]")));
    }

    let mut evaluate = |t: f64| -> Result<f64, NumericError> {
        let value = f(t)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NumericError::non_finite(t, value))
        }
    };

    // ====== Step 1: Scan ======

    let n = config.scan_points.max(3);
    let grid: Vec<f64> = if a > 0.0 {
        let ratio = (b / a).ln() / (n - 1) as f64;
        (0..n).map(|i| a * (ratio * i as f64).exp()).collect()
    } else {
        let step = (b - a) / (n - 1) as f64;
        (0..n).map(|i| a + step * i as f64).collect()
    };

    let mut best = Maximum { location: grid[0], value: evaluate(grid[0])? };
    let mut best_index = 0;
    for (i, &t) in grid.iter().enumerate().skip(1) {
        let value = evaluate(t)?;
        if value > best.value {
            best = Maximum { location: t, value };
            best_index = i;
        }
    }

    // ====== Step 2: Refine ======

    let low = grid[best_index.saturating_sub(1)];
    let high = grid[(best_index + 1).min(n - 1)];

    let refined = brent_minimize(|t| evaluate(t).map(|v| -v), low, best.location, high, config)?;
    if -refined.value > best.value {
        best = Maximum { location: refined.location, value: -refined.value };
    }

    Ok(best)
}

/// Brent minimization on `[a, b]` starting from `x` (a ≤ x ≤ b)
///
/// Returns the minimum as a [`Maximum`] of the minimized function.
fn brent_minimize<F>(
    mut f: F,
    a: f64,
    x: f64,
    b: f64,
    config: &MaximizationConfiguration,
) -> Result<Maximum, NumericError>
where
    F: FnMut(f64) -> Result<f64, NumericError>,
{
    let (mut a, mut b) = (a, b);
    let (mut x, mut w, mut v) = (x, x, x);
    let mut fx = f(x)?;
    let (mut fw, mut fv) = (fx, fx);
    let mut d: f64 = 0.0;
    let mut e: f64 = 0.0;

    for _ in 0..config.max_iterations {
        let xm = 0.5 * (a + b);
        let tol1 = config.relative_tolerance * x.abs() + f64::MIN_POSITIVE;
        let tol2 = 2.0 * tol1;

        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            break;
        }

        if e.abs() > tol1 {
            // Parabolic fit through x, w, v
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_previous = e;
            e = d;

            if p.abs() >= (0.5 * q * e_previous).abs() || p <= q * (a - x) || p >= q * (b - x) {
                e = if x >= xm { a - x } else { b - x };
                d = CGOLD * e;
            } else {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = tol1.copysign(xm - x);
                }
            }
        } else {
            e = if x >= xm { a - x } else { b - x };
            d = CGOLD * e;
        }

        let u = if d.abs() >= tol1 { x + d } else { x + tol1.copysign(d) };
        let fu = f(u)?;

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            (v, w, x) = (w, x, u);
            (fv, fw, fx) = (fw, fx, fu);
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                (v, w) = (w, u);
                (fv, fw) = (fw, fu);
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    Ok(Maximum { location: x, value: fx })
}

// =================================================================================================
// Tests
// =================================================================================================
