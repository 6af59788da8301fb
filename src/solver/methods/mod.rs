//! Bracket refinement methods
//!
//! This module contains concrete implementations of the
//! [`RootFinder`](crate::solver::RootFinder) trait.
//!
//! # Available Methods
//!
//! - **[`Bisection`]**: halves the bracket every step
//!   - Order: linear, one bit per evaluation
//!   - Cost: ~ log2(width / tolerance) evaluations
//!   - Use: reference method, pathological curves
//!
//! - **[`Brent`]**: Brent–Dekker
//!   - Order: superlinear (inverse quadratic interpolation and secant steps)
//!   - Cost: usually 5 to 15 evaluations at 1e-12 relative tolerance
//!   - Use: **production runs**, every density evaluation is a quadrature
//!
//! Both never leave the bracket, so the result keeps the sign-change
//! guarantee of the automatic bracket search.
//!
//! # Example
//!
//! ```rust
//! use reheat_rs::physics::NumericError;
//! use reheat_rs::solver::bracket::Bracket;
//! use reheat_rs::solver::methods::{Bisection, Brent};
//! use reheat_rs::solver::{RootFinder, SolverConfiguration};
//!
//! let h = |t: f64| -> Result<f64, NumericError> { Ok(t * t - 2.0) };
//! let bracket = Bracket::new(1.0, -1.0, 2.0, 2.0);
//! let config = SolverConfiguration::default();
//!
//! let brent = Brent.refine(&h, bracket, &config).unwrap();
//! let bisection = Bisection.refine(&h, bracket, &config).unwrap();
//!
//! assert!((brent.bracket.midpoint() - 2f64.sqrt()).abs() < 1e-11);
//! assert!(brent.iterations < bisection.iterations);
//! ```

mod bisection;
mod brent;

// Re-exports for convenience
pub use bisection::Bisection;
pub use brent::Brent;
