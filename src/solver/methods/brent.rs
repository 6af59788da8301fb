//! Brent–Dekker method
//!
//! # Mathematical Background
//!
//! Keeps three points: `b` (best estimate), `a` (previous `b`) and `c`
//! (contrapoint, `h(b)` and `h(c)` of opposite signs). Each step tries inverse
//! quadratic interpolation through `a`, `b`, `c` (secant when only two are
//! distinct) and falls back to bisection of `[b, c]` when the interpolated
//! step is too large or converges too slowly.
//!
//! # Characteristics
//!
//! - **Order**: superlinear (≈ 1.84 near a simple root)
//! - **Robustness**: never worse than about twice the bisection count
//! - **Complexity**: 1 function evaluation per step

use crate::physics::NumericError;
use crate::solver::bracket::{opposite_signs, Bracket};
use crate::solver::error::SolverError;
use crate::solver::traits::{Refinement, RootFinder, SolverConfiguration};

/// Brent–Dekker refinement
#[derive(Debug, Clone, Copy, Default)]
pub struct Brent;

impl RootFinder for Brent {
    fn refine(
        &self,
        h: &dyn Fn(f64) -> Result<f64, NumericError>,
        bracket: Bracket,
        config: &SolverConfiguration,
    ) -> Result<Refinement, SolverError> {
        let (mut a, mut b, mut c) = (bracket.low, bracket.high, bracket.high);
        let (mut fa, mut fb, mut fc) = (bracket.f_low, bracket.f_high, bracket.f_high);
        let mut d = b - a;
        let mut e = d;
        let mut iterations = 0;

        loop {
            // Restore the contrapoint so that [b, c] brackets the root
            if !opposite_signs(fb, fc) && fb != 0.0 {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            // b is always the best estimate
            if fc.abs() < fb.abs() {
                (a, b, c) = (b, c, b);
                (fa, fb, fc) = (fb, fc, fb);
            }

            let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance(b);
            let xm = 0.5 * (c - b);

            if fb == 0.0 {
                return Ok(Refinement { bracket: Bracket::point(b), iterations, converged: true });
            }
            if xm.abs() <= tol1 {
                return Ok(Refinement { bracket: Bracket::new(b, fb, c, fc), iterations, converged: true });
            }
            if iterations >= config.max_iterations {
                return Ok(Refinement { bracket: Bracket::new(b, fb, c, fc), iterations, converged: false });
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    // Secant
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    // Inverse quadratic interpolation
                    let qa = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0)),
                        (qa - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();

                let min1 = 3.0 * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol1 { d } else { tol1.copysign(xm) };
            fb = h(b)?;
            iterations += 1;
        }
    }

    fn name(&self) -> &'static str {
        "Brent"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
