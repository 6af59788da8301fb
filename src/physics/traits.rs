//! Energy density traits and types
//!
//! This module defines the core API for energy densities:
//! - `EnergyDensity`: trait for every time-dependent density curve
//! - `FunctionDensity`: adapter turning a closure into a density
//! - `NumericError`: an evaluation outside the valid domain

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

// =================================================================================================
// Numeric Domain Error
// =================================================================================================

/// Evaluation of a density (or of a quadrature over it) left its valid domain
///
/// Raised for non-positive times, times before the reference time of an epoch,
/// overflow, or any non-finite intermediate result.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("numeric domain error at t = {time:e}: {message}")]
pub struct NumericError {
    /// Time argument of the failing evaluation
    pub time: f64,

    /// What went wrong
    pub message: String,
}

impl NumericError {
    /// Create a new error at time `time`
    pub fn new(time: f64, message: impl Into<String>) -> Self {
        Self {
            time,
            message: message.into(),
        }
    }

    /// Error for an evaluation that produced NaN or an infinity
    pub fn non_finite(time: f64, value: f64) -> Self {
        Self::new(time, format!("evaluation produced {value}"))
    }
}

// ==================================================================================================
// Energy Density Trait
// =================================================================================================

/// Trait for energy densities
///
/// # Responsibility
/// Evaluates one density curve at a given time. Does NOT search for crossings
/// (that's the solver's job).
///
/// # Contract
///
/// - **Pure**: the same `t` always yields the same value
/// - **Thread safe**: evaluated concurrently by the solver and the worker pool
/// - **Non-negative** for physical densities (not enforced here)
pub trait EnergyDensity: Send + Sync {

    /// Evaluate the density at time `t`
    fn evaluate(&self, t: f64) -> Result<f64, NumericError>;

    /// Name of the density (used for logging)
    fn name(&self) -> &str {
        "energy density"
    }
}

/// Densities are handed between phases behind an `Arc`
pub type SharedDensity = Arc<dyn EnergyDensity>;

impl<D: EnergyDensity + ?Sized> EnergyDensity for Arc<D> {
    fn evaluate(&self, t: f64) -> Result<f64, NumericError> {
        (**self).evaluate(t)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// =================================================================================================
// Closure Adapter
// =================================================================================================

/// A named closure acting as an energy density
///
/// # Example
///
/// ```rust
/// use reheat_rs::physics::{EnergyDensity, FunctionDensity, NumericError};
///
/// let matter = FunctionDensity::new("matter", |t: f64| {
///     if t > 0.0 { Ok(t.powi(-2)) } else { Err(NumericError::new(t, "t <= 0")) }
/// });
///
/// assert_eq!(matter.evaluate(2.0).unwrap(), 0.25);
/// assert!(matter.evaluate(-1.0).is_err());
/// ```
pub struct FunctionDensity<F> {
    name: String,
    function: F,
}

impl<F> FunctionDensity<F>
where
    F: Fn(f64) -> Result<f64, NumericError> + Send + Sync,
{
    /// Wrap a fallible closure
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    /// Move into a [`SharedDensity`]
    pub fn shared(self) -> SharedDensity
    where
        F: 'static,
    {
        Arc::new(self)
    }
}

impl<F> EnergyDensity for FunctionDensity<F>
where
    F: Fn(f64) -> Result<f64, NumericError> + Send + Sync,
{
    fn evaluate(&self, t: f64) -> Result<f64, NumericError> {
        (self.function)(t)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FunctionDensity<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDensity")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Build a shared density from an infallible closure
///
/// Non-finite times and non-finite results are reported as [`NumericError`].
pub fn density_fn<F>(name: impl Into<String>, function: F) -> SharedDensity
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    FunctionDensity::new(name, move |t: f64| {
        if !t.is_finite() {
            return Err(NumericError::new(t, "time is not finite"));
        }
        let value = function(t);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NumericError::non_finite(t, value))
        }
    })
    .shared()
}

// =================================================================================================
// Tests
// =================================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_density_name_and_value() {
        let density = FunctionDensity::new("linear", |t: f64| Ok(2.0 * t));

        assert_eq!(density.name(), "linear");
        assert_eq!(density.evaluate(3.0).unwrap(), 6.0);
    }

    #[test]
    fn test_density_fn_rejects_non_finite_result() {
        let density = density_fn("inverse", |t| 1.0 / t);

        let error = density.evaluate(0.0).unwrap_err();
        assert_eq!(error.time, 0.0);
        assert!(error.message.contains("inf"));
    }

    #[test]
    fn test_density_fn_rejects_non_finite_time() {
        let density = density_fn("constant", |_| 1.0);

        assert!(density.evaluate(f64::NAN).is_err());
        assert!(density.evaluate(f64::INFINITY).is_err());
    }

    #[test]
    fn test_shared_density_delegates() {
        let shared: SharedDensity = density_fn("square", |t| t * t);
        let nested = Arc::new(shared.clone());

        assert_eq!(nested.evaluate(4.0).unwrap(), 16.0);
        assert_eq!(nested.name(), "square");
    }

    #[test]
    fn test_numeric_error_display() {
        let error = NumericError::new(1e-32, "time before epoch start");
        let text = error.to_string();

        assert!(text.contains("1e-32"));
        assert!(text.contains("time before epoch start"));
    }
}
