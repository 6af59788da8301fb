//! Energy densities
//!
//! This module provides the traits and types every solver consumes.
//! An energy density is a pure, deterministic and usually expensive function
//! of time (e.g., the density of a decaying scalar field during the stiff epoch).
//!
//! # Core Concepts
//!
//! - **Energy Density**: `time -> value`, possibly failing outside its domain
//! - **Parameter Set**: the physical constants one simulation task runs with
//! - **Memoized Density**: a density wrapped in its own evaluation cache
//!
//! # Architecture
//!
//! Densities are **separate from numerical solvers**:
//! - The density provides the **curve** (physics)
//! - The solver provides the **method** to find where curves cross (numerics)
//!
//! # Example
//!
//! ```rust
//! use reheat_rs::physics::{density_fn, EnergyDensity, MemoizedDensity, Quantizer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let radiation = density_fn("radiation", |t| 1.0 / (t * t));
//! let cached = MemoizedDensity::new(radiation, Quantizer::new(12)?);
//!
//! let first = cached.evaluate(2.0)?;
//! let again = cached.evaluate(2.0)?;
//! assert_eq!(first.to_bits(), again.to_bits());
//! assert_eq!(cached.stats().hits, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Implementing a New Density
//!
//! ```rust
//! use reheat_rs::physics::{EnergyDensity, NumericError};
//!
//! struct StiffBackground {
//!     gravitational_constant: f64,
//! }
//!
//! impl EnergyDensity for StiffBackground {
//!     fn evaluate(&self, t: f64) -> Result<f64, NumericError> {
//!         if t <= 0.0 {
//!             return Err(NumericError::new(t, "time must be positive"));
//!         }
//!         Ok(1.0 / (24.0 * std::f64::consts::PI * self.gravitational_constant * t * t))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "stiff background"
//!     }
//! }
//! ```

// module declaration
pub mod traits;
pub mod parameters;
pub mod memo;

// re-export commonly used types for convenience
pub use memo::{CacheKey, CacheStats, MemoizedDensity, Quantizer};
pub use parameters::ParameterSet;
pub use traits::{
    density_fn,
    EnergyDensity,
    FunctionDensity,
    NumericError,
    SharedDensity, };
