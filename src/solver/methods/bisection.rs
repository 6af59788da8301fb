//! Bisection method
//!
//! # Mathematical Background
//!
//! With `h(low)` and `h(high)` of opposite signs, evaluate `h` at the midpoint
//! and keep the half that still changes sign. After `n` steps the bracket
//! width is `width / 2^n`.
//!
//! # Characteristics
//!
//! - **Order**: linear, convergence factor 1/2
//! - **Robustness**: converges for any continuous `h` over a valid bracket
//! - **Complexity**: 1 function evaluation per step

use crate::physics::NumericError;
use crate::solver::bracket::{opposite_signs, Bracket};
use crate::solver::error::SolverError;
use crate::solver::traits::{Refinement, RootFinder, SolverConfiguration};

/// Bisection refinement
#[derive(Debug, Clone, Copy, Default)]
pub struct Bisection;

impl RootFinder for Bisection {
    fn refine(
        &self,
        h: &dyn Fn(f64) -> Result<f64, NumericError>,
        bracket: Bracket,
        config: &SolverConfiguration,
    ) -> Result<Refinement, SolverError> {
        let mut bracket = bracket;

        for iteration in 0..config.max_iterations {
            let mid = bracket.midpoint();
            if bracket.width() <= config.tolerance(mid) || mid <= bracket.low || mid >= bracket.high {
                return Ok(Refinement { bracket, iterations: iteration, converged: true });
            }

            let f_mid = h(mid)?;
            if f_mid == 0.0 {
                return Ok(Refinement { bracket: Bracket::point(mid), iterations: iteration + 1, converged: true });
            }

            if opposite_signs(bracket.f_low, f_mid) {
                bracket.high = mid;
                bracket.f_high = f_mid;
            } else {
                bracket.low = mid;
                bracket.f_low = f_mid;
            }
        }

        let converged = bracket.width() <= config.tolerance(bracket.midpoint());
        Ok(Refinement { bracket, iterations: config.max_iterations, converged })
    }

    fn name(&self) -> &'static str {
        "Bisection"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
