//! reheat-rs: Equal-Time Crossings and Reheating Scans
//!
//! A framework for locating the times at which competing cosmological energy
//! densities become equal, epoch after epoch, and for deriving a reheating
//! temperature from the last epoch. Many parameter sets are processed
//! concurrently by a fault-isolating worker pool.
//!
//! # Architecture
//!
//! reheat-rs is built on the same two principles throughout:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Density suppliers define the curves (what to solve)
//!    - Root finders, quadrature and maximizers provide methods (how to solve)
//!
//! 2. **Explicit ownership**
//!    - Every evaluation cache belongs to one density of one task
//!    - Phases pass values forward, never shared mutable objects
//!
//! # Quick Start
//!
//! ```rust
//! use reheat_rs::physics::density_fn;
//! use reheat_rs::solver::{EqualTimeProblem, EqualTimeSolver, SolverConfiguration};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Two curves crossing at t = 1
//! let falling = density_fn("falling", |t| 1.0 / (t * t));
//! let rising = density_fn("rising", |t| t);
//!
//! // 2. Problem (WHAT) and configuration (HOW)
//! let problem = EqualTimeProblem::new(falling, rising, 0.1);
//! let config = SolverConfiguration::brent(1e-12, 100);
//!
//! // 3. Solve
//! let phase = EqualTimeSolver::new().solve(&problem, &config)?;
//! assert!((phase.equal_time - 1.0).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: Energy density abstraction, parameters, memoization
//! - [`numerics`]: Adaptive quadrature and bounded maximization
//! - [`solver`]: Equal-time root finding (bracketing, bisection, Brent)
//! - [`simulation`]: Phase pipeline and the worker pool
//! - [`models`]: Reference density supplier
//! - [`output`]: Result sinks (CSV, in-memory)

// Core modules
pub mod physics;
pub mod numerics;
pub mod solver;

pub mod simulation;
pub mod models;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use reheat_rs::prelude::*;
    //! ```
    pub use crate::physics::{density_fn,
                             EnergyDensity,
                             FunctionDensity,
                             MemoizedDensity,
                             NumericError,
                             ParameterSet,
                             SharedDensity};
    pub use crate::solver::{EqualTimeProblem,
                            EqualTimeSolver,
                            PhaseResult,
                            RootMethod,
                            SolverConfiguration,
                            SolverError};
    pub use crate::simulation::{BatchReport,
                                Continuation,
                                DensitySupplier,
                                Simulation,
                                SimulationConfiguration,
                                SimulationError,
                                SimulationManager,
                                SimulationResult};
    pub use crate::output::export::{ResultsWriter, WriteError};
}
