//! Equal-time problem definition
//!
//! A problem combines the two competing densities, the lower end of the
//! search and an optional restriction.

use std::fmt;

use crate::physics::{NumericError, SharedDensity};
use crate::solver::evaluate_pair;

/// Equal-time problem
///
/// Defines a specific crossing to locate:
/// - the two densities whose difference `h = first - second` must vanish
/// - the lower limit of the search
/// - optionally a restriction the second density must exceed at the root
///
/// # Design
///
/// The same problem can be solved with different root-finding methods.
/// This is the "WHAT to solve" (not "HOW to solve").
///
/// # Examples
///
/// ```rust
/// use reheat_rs::physics::density_fn;
/// use reheat_rs::solver::EqualTimeProblem;
///
/// let background = density_fn("background", |t| 1.0 / (t * t));
/// let phi = density_fn("phi", |t| t);
/// let chi = density_fn("chi", |t| 0.5 * t);
///
/// let problem = EqualTimeProblem::restricted(background, phi, 0.1, chi);
/// assert!(problem.validate().is_ok());
/// assert_eq!(problem.restriction_name(), Some("chi"));
/// ```
#[derive(Clone)]
pub struct EqualTimeProblem {
    /// First density (usually the decreasing one)
    pub first: SharedDensity,

    /// Second density
    pub second: SharedDensity,

    /// Lower end of the search
    pub lower_limit: f64,

    /// Curve the second density must exceed at the root
    pub restriction: Option<SharedDensity>,
}

impl EqualTimeProblem {
    /// Create an unrestricted problem
    pub fn new(first: SharedDensity, second: SharedDensity, lower_limit: f64) -> Self {
        Self {
            first,
            second,
            lower_limit,
            restriction: None,
        }
    }

    /// Create a problem with a restriction on the second density
    pub fn restricted(
        first: SharedDensity,
        second: SharedDensity,
        lower_limit: f64,
        restriction: SharedDensity,
    ) -> Self {
        Self {
            restriction: Some(restriction),
            ..Self::new(first, second, lower_limit)
        }
    }

    /// `h(t) = first(t) - second(t)`
    pub fn difference(&self, t: f64) -> Result<f64, NumericError> {
        let (first, second) = evaluate_pair(&*self.first, &*self.second, t)?;
        let h = first - second;
        if h.is_finite() {
            Ok(h)
        } else {
            Err(NumericError::non_finite(t, h))
        }
    }

    /// Verifying problem content
    pub fn validate(&self) -> Result<(), String> {
        if !self.lower_limit.is_finite() {
            return Err("Lower limit must be finite".to_string());
        }
        Ok(())
    }

    /// Get restriction name
    pub fn restriction_name(&self) -> Option<&str> {
        self.restriction.as_ref().map(|r| r.name())
    }
}

impl fmt::Debug for EqualTimeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualTimeProblem")
            .field("first", &self.first.name())
            .field("second", &self.second.name())
            .field("lower_limit", &self.lower_limit)
            .field("restriction", &self.restriction_name())
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
