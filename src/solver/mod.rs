//! Equal-time solvers
//!
//! This module locates the time at which two energy densities become equal.
//! A root finder applies a numerical method to the difference of the two
//! densities provided by an equal-time problem.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The solver architecture separates concerns into three layers:
//!
//! 1. **Problem** (`EqualTimeProblem`) - WHAT to solve
//!    - The two competing densities
//!    - The lower limit of the search
//!    - An optional restriction on the second density
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Root-finding method (bisection, Brent)
//!    - Tolerances and iteration budget
//!    - Bracketing parameters or a fixed upper limit
//!
//! 3. **Root finder** (`RootFinder` trait) - The numerical method
//!    - Shrinks a bracket around the root
//!    - Independent of physics
//!
//! # Module Organization
//!
//! - **`traits`**: `RootFinder`, `RootMethod`, `SolverConfiguration`,
//!   `BracketConfiguration`, `PhaseResult`
//! - **`bracket`**: `Bracket` and the automatic bracket search
//! - **`problem`**: `EqualTimeProblem`
//! - **`equal_time`**: `EqualTimeSolver`, the full pipeline
//! - **`methods`**: `Bisection`, `Brent`
//! - **`error`**: `SolverError`
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────┐ ┌──────────────────┐
//! │ first density    │ │ second density   │  (physics)
//! └────────┬─────────┘ └────────┬─────────┘
//!          └──────────┬─────────┘
//!            ┌────────▼──────────┐
//!            │ EqualTimeProblem  │ ← WHAT to solve
//!            │ (+ restriction)   │
//!            └────────┬──────────┘
//!                     │
//!            ┌────────▼─────────────┐
//!            │ SolverConfiguration  │ ← HOW to solve
//!            └────────┬─────────────┘
//!                     │
//!            ┌────────▼─────────┐
//!            │ find_bracket     │ ← first sign change
//!            └────────┬─────────┘
//!            ┌────────▼─────────┐
//!            │ Bisection/Brent  │ ← The method
//!            └────────┬─────────┘
//!            ┌────────▼─────────┐
//!            │ PhaseResult      │ ← t_eq and both values
//!            └──────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Every failure is a [`SolverError`] value:
//!
//! ```rust
//! use reheat_rs::physics::density_fn;
//! use reheat_rs::solver::{EqualTimeProblem, EqualTimeSolver, SolverConfiguration, SolverError};
//!
//! // Parallel curves never cross
//! let problem = EqualTimeProblem::new(
//!     density_fn("upper", |t| t + 1.0),
//!     density_fn("lower", |t| t),
//!     1.0,
//! );
//!
//! match EqualTimeSolver::new().solve(&problem, &SolverConfiguration::default()) {
//!     Err(SolverError::BracketNotFound { attempts, .. }) => assert!(attempts > 0),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```
//!
//! # Performance Considerations
//!
//! Every evaluation of `h` evaluates both densities. With the `parallel`
//! feature the pair runs through `rayon::join` on rayon's global pool; no
//! thread is ever spawned per evaluation.

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
mod error;
mod problem;
mod equal_time;
pub mod bracket;
pub mod methods;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    BracketConfiguration,
    PhaseResult,
    Refinement,
    RootFinder,
    RootMethod,
    SolverConfiguration,
};

pub use error::SolverError;
pub use problem::EqualTimeProblem;
pub use equal_time::EqualTimeSolver;

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::physics::{EnergyDensity, NumericError};

/// Evaluate two densities at the same time
///
/// Runs both evaluations through `rayon::join` when the `parallel` feature is
/// enabled, sequentially otherwise.
pub(crate) fn evaluate_pair(
    first: &dyn EnergyDensity,
    second: &dyn EnergyDensity,
    t: f64,
) -> Result<(f64, f64), NumericError> {
    #[cfg(feature = "parallel")]
    let (a, b) = rayon::join(|| first.evaluate(t), || second.evaluate(t));

    #[cfg(not(feature = "parallel"))]
    let (a, b) = (first.evaluate(t), second.evaluate(t));

    Ok((a?, b?))
}

// =================================================================================================
// Tests
// =================================================================================================
