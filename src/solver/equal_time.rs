//! Equal-time solver
//!
//! # Algorithm
//!
//! ```text
//! h(t) = first(t) - second(t)
//!
//! 0. seeded    first(lower) ≈ second(lower)  → t_eq = lower
//! 1. bracket   [lower, upper_limit]           (configured)
//!              or first sign change above lower (automatic)
//! 2. check     h changes sign over the bracket
//! 3. refine    bisection or Brent until width <= abs + rel·|t|
//! 4. t_eq      midpoint of the final bracket
//! 5. values    first(t_eq), second(t_eq)
//! 6. restrict  second(t_eq) > restriction(t_eq)
//! ```

use crate::solver::bracket::{find_bracket, Bracket};
use crate::solver::error::SolverError;
use crate::solver::evaluate_pair;
use crate::solver::problem::EqualTimeProblem;
use crate::solver::traits::{PhaseResult, SolverConfiguration};

/// Locates the time at which two densities are equal
///
/// Stateless: one instance can solve any number of problems, from any
/// number of threads.
///
/// # Example
///
/// ```rust
/// use reheat_rs::physics::density_fn;
/// use reheat_rs::solver::{EqualTimeProblem, EqualTimeSolver, SolverConfiguration, SolverError};
///
/// let falling = density_fn("falling", |t| 1.0 / t);
/// let rising = density_fn("rising", |t| t);
/// let chi = density_fn("chi", |t| 2.0 * t);
///
/// // Root at t = 1, but the second density (1) does not exceed chi (2) there
/// let problem = EqualTimeProblem::restricted(falling, rising, 0.5, chi);
/// let error = EqualTimeSolver::new()
///     .solve(&problem, &SolverConfiguration::default())
///     .unwrap_err();
///
/// assert!(matches!(error, SolverError::ConstraintViolation { .. }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualTimeSolver;

impl EqualTimeSolver {
    pub fn new() -> Self {
        Self
    }

    /// Solve `problem` with `config`
    ///
    /// # Errors
    ///
    /// - [`SolverError::InvalidConfiguration`] for a rejected configuration or problem
    /// - [`SolverError::BracketNotFound`] when automatic bracketing fails
    /// - [`SolverError::NoSignChange`] when the configured interval brackets no root
    /// - [`SolverError::ConstraintViolation`] when the restriction is not met
    /// - [`SolverError::NumericDomain`] for any failing density evaluation
    pub fn solve(
        &self,
        problem: &EqualTimeProblem,
        config: &SolverConfiguration,
    ) -> Result<PhaseResult, SolverError> {
        // ====== Step 1: Validation ======

        config.validate().map_err(SolverError::InvalidConfiguration)?;
        problem.validate().map_err(SolverError::InvalidConfiguration)?;

        let lower = problem.lower_limit;
        let h = |t: f64| problem.difference(t);

        // ====== Step 2: Bracketing ======

        if let Some(upper) = config.upper_limit
            && upper <= lower
        {
            return Err(SolverError::InvalidConfiguration(format!(
                "Upper limit {upper:e} must exceed lower limit {lower:e}"
            )));
        }

        // Phases seeded from a previous crossing start on their root
        let (first_lower, second_lower) = evaluate_pair(&*problem.first, &*problem.second, lower)?;
        let bracket = if config.is_crossing(first_lower, second_lower) {
            Bracket::point(lower)
        } else {
            match config.upper_limit {
                Some(upper) => Bracket::new(lower, h(lower)?, upper, h(upper)?),
                None => find_bracket(&h, lower, &config.bracket)?,
            }
        };

        log::debug!(
            "Bracket [{:e}, {:e}] for {} / {}",
            bracket.low,
            bracket.high,
            problem.first.name(),
            problem.second.name()
        );

        // ====== Step 3: Refinement ======

        let equal_time = if bracket.is_point() || bracket.f_low == 0.0 {
            bracket.low
        } else if bracket.f_high == 0.0 {
            bracket.high
        } else if !bracket.has_sign_change() {
            return Err(SolverError::NoSignChange {
                low: bracket.low,
                high: bracket.high,
                f_low: bracket.f_low,
                f_high: bracket.f_high,
            });
        } else {
            let finder = config.method.finder();
            let refinement = finder.refine(&h, bracket, config)?;
            if !refinement.converged {
                log::warn!(
                    "{} exhausted {} iterations, bracket [{:e}, {:e}] wider than requested",
                    finder.name(),
                    refinement.iterations,
                    refinement.bracket.low,
                    refinement.bracket.high
                );
            }
            refinement.bracket.midpoint()
        };

        // ====== Step 4: Values at the root ======

        let (first_value, second_value) = evaluate_pair(&*problem.first, &*problem.second, equal_time)?;

        if let Some(restriction) = &problem.restriction {
            let limit = restriction.evaluate(equal_time)?;
            if !(second_value > limit) {
                return Err(SolverError::ConstraintViolation {
                    time: equal_time,
                    value: second_value,
                    restriction: limit,
                });
            }
        }

        log::debug!("Equal time {:e} ({} = {:e})", equal_time, problem.second.name(), second_value);

        Ok(PhaseResult {
            equal_time,
            first_value,
            second_value,
        })
    }
}

// =================================================================================================
// Tests
// =================================================================================================
