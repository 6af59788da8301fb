//! Scalar numerical building blocks
//!
//! Density suppliers and the reheating step need two classic tools that the
//! root finders do not provide:
//!
//! - **[`quadrature`]**: globally adaptive Gauss–Kronrod (7/15) integration
//! - **[`maximize`]**: bounded maximization of a unimodal-ish function
//!
//! Both take fallible closures (`FnMut(f64) -> Result<f64, NumericError>`),
//! so a density that leaves its domain aborts the computation instead of
//! silently poisoning it with NaN.
//!
//! # Example
//!
//! ```rust
//! use reheat_rs::numerics::quadrature::{integrate, QuadratureConfiguration};
//!
//! # fn main() -> Result<(), reheat_rs::physics::NumericError> {
//! let area = integrate(|t| Ok(t * t), 0.0, 3.0, &QuadratureConfiguration::default())?;
//! assert!((area - 9.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod quadrature;
pub mod maximize;

pub use maximize::{maximize, MaximizationConfiguration, Maximum};
pub use quadrature::{integrate, QuadratureConfiguration};
