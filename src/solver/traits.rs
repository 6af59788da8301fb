//! Root-finding traits and configuration types
//!
//! # Design Philosophy
//!
//! - `RootMethod` enum names HOW a bracket is refined
//! - `SolverConfiguration` is plain data: method, tolerances, bracketing
//! - `RootFinder` trait is the seam every method implements
//!
//! # Stability Guarantee
//!
//! - `RootFinder` trait: object safe, implementations are stateless
//! - `RootMethod` enum: EXTENSIBLE (new variants can be added)

use std::fmt;

use crate::physics::NumericError;
use crate::solver::bracket::Bracket;
use crate::solver::error::SolverError;
use crate::solver::methods::{Bisection, Brent};

// =================================================================================================
// Root Method Enumeration
// =================================================================================================

/// Method used to shrink a bracket onto the root
///
/// # Examples
///
/// ```rust
/// use reheat_rs::solver::RootMethod;
///
/// assert_eq!(RootMethod::default(), RootMethod::Brent);
/// assert_eq!(RootMethod::Bisection.name(), "Bisection");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMethod {
    /// Halve the bracket every iteration (linear, unconditionally robust)
    Bisection,

    /// Brent–Dekker: inverse quadratic / secant steps guarded by bisection
    #[default]
    Brent,
}

impl RootMethod {
    /// Get name identifier
    pub fn name(&self) -> &'static str {
        self.finder().name()
    }

    /// The implementation behind this method
    pub fn finder(&self) -> &'static dyn RootFinder {
        match self {
            RootMethod::Bisection => &Bisection,
            RootMethod::Brent => &Brent,
        }
    }
}

impl fmt::Display for RootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =================================================================================================
// Bracket configuration
// =================================================================================================

/// Parameters of the automatic bracket search
///
/// Probes are placed at `lower + step_k` with
/// `step_0 = initial_step × scale`, `step_{k+1} = step_k × growth_factor` and
/// `scale = |lower|` (1 when `lower == 0`), so the search is scale-invariant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketConfiguration {
    /// First step, relative to `scale`
    pub initial_step: f64,

    /// Step multiplier between probes (> 1)
    pub growth_factor: f64,

    /// Maximum number of probes
    pub max_attempts: usize,

    /// Largest probe distance, relative to `scale`
    pub max_span: f64,
}

impl Default for BracketConfiguration {
    fn default() -> Self {
        Self {
            initial_step: 1e-2,
            growth_factor: 2.0,
            max_attempts: 200,
            max_span: 1e16,
        }
    }
}

impl BracketConfiguration {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_step > 0.0) || !self.initial_step.is_finite() {
            return Err("Initial bracket step must be positive".to_string());
        }
        if !(self.growth_factor > 1.0) || !self.growth_factor.is_finite() {
            return Err("Bracket growth factor must be greater than 1".to_string());
        }
        if self.max_attempts == 0 {
            return Err("Bracket search needs at least one attempt".to_string());
        }
        if !(self.max_span > 0.0) {
            return Err("Bracket span must be positive".to_string());
        }
        Ok(())
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration of the equal-time solver (HOW to solve)
///
/// # Examples
///
/// ```rust
/// use reheat_rs::solver::{RootMethod, SolverConfiguration};
///
/// // Brent with 1e-12 relative tolerance
/// let config = SolverConfiguration::brent(1e-12, 100);
/// assert!(config.validate().is_ok());
///
/// // Bisection over a fixed interval, no automatic bracketing
/// let config = SolverConfiguration::bisection(1e-10, 200).with_upper_limit(5.0);
/// assert_eq!(config.method, RootMethod::Bisection);
/// assert_eq!(config.upper_limit, Some(5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfiguration {
    /// Root-finding method
    pub method: RootMethod,

    /// Iteration budget of the method
    pub max_iterations: usize,

    /// Bracket width target, relative to |t|
    pub relative_tolerance: f64,

    /// Bracket width target, absolute
    pub absolute_tolerance: f64,

    /// Relative gap `|first - second| / max(|first|, |second|)` at the lower
    /// limit below which the lower limit itself is the equal time
    ///
    /// A phase seeded with the values of a previous crossing starts on its
    /// own root; the two seeds only agree up to the previous solver's tolerance.
    pub crossing_tolerance: f64,

    /// Fixed upper end of the search interval (skips automatic bracketing)
    pub upper_limit: Option<f64>,

    /// Automatic bracketing parameters
    pub bracket: BracketConfiguration,
}

impl Default for SolverConfiguration {
    fn default() -> Self {
        Self {
            method: RootMethod::Brent,
            max_iterations: 100,
            relative_tolerance: 1e-12,
            absolute_tolerance: 0.0,
            crossing_tolerance: 1e-9,
            upper_limit: None,
            bracket: BracketConfiguration::default(),
        }
    }
}

impl SolverConfiguration {
    /// Create a configuration for `method` with default tolerances
    pub fn new(method: RootMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Create a Brent configuration
    pub fn brent(relative_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            method: RootMethod::Brent,
            relative_tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Create a bisection configuration
    pub fn bisection(relative_tolerance: f64, max_iterations: usize) -> Self {
        Self {
            method: RootMethod::Bisection,
            relative_tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Search `[lower, upper_limit]` instead of bracketing automatically
    pub fn with_upper_limit(mut self, upper_limit: f64) -> Self {
        self.upper_limit = Some(upper_limit);
        self
    }

    /// Replace the bracket search parameters
    pub fn with_bracket(mut self, bracket: BracketConfiguration) -> Self {
        self.bracket = bracket;
        self
    }

    /// Width below which a bracket around `t` counts as converged
    pub fn tolerance(&self, t: f64) -> f64 {
        self.absolute_tolerance + self.relative_tolerance * t.abs()
    }

    /// Whether `first` and `second` are equal within `crossing_tolerance`
    pub fn is_crossing(&self, first: f64, second: f64) -> bool {
        (first - second).abs() <= self.crossing_tolerance * first.abs().max(second.abs())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("Maximum iterations must be positive".to_string());
        }
        if !(self.relative_tolerance >= 0.0) || !(self.absolute_tolerance >= 0.0) {
            return Err("Tolerances must be non-negative".to_string());
        }
        if self.relative_tolerance == 0.0 && self.absolute_tolerance == 0.0 {
            return Err("At least one tolerance must be positive".to_string());
        }
        if !(self.crossing_tolerance >= 0.0) || !self.crossing_tolerance.is_finite() {
            return Err("Crossing tolerance must be a finite non-negative number".to_string());
        }
        if let Some(upper) = self.upper_limit
            && !upper.is_finite()
        {
            return Err("Upper limit must be finite".to_string());
        }
        self.bracket.validate()
    }
}

// =================================================================================================
// Root finder trait
// =================================================================================================

/// Outcome of refining a bracket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement {
    /// Final bracket (a point bracket when an exact root was hit)
    pub bracket: Bracket,

    /// Function evaluations spent
    pub iterations: usize,

    /// Whether the width target was met within the iteration budget
    pub converged: bool,
}

/// Interface of every bracket refinement method
///
/// Implementations are stateless and reusable. `h` must change sign over
/// `bracket`; the returned bracket still does.
pub trait RootFinder: Send + Sync {
    /// Shrink `bracket` around a root of `h`
    fn refine(
        &self,
        h: &dyn Fn(f64) -> Result<f64, NumericError>,
        bracket: Bracket,
        config: &SolverConfiguration,
    ) -> Result<Refinement, SolverError>;

    /// Name of the method
    fn name(&self) -> &'static str;
}

// =================================================================================================
// Phase result
// =================================================================================================

/// Result of one equal-time search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseResult {
    /// Time at which both densities are equal
    pub equal_time: f64,

    /// First density at `equal_time`
    pub first_value: f64,

    /// Second density at `equal_time`
    pub second_value: f64,
}

impl PhaseResult {
    /// Whether every field is finite
    pub fn is_finite(&self) -> bool {
        self.equal_time.is_finite() && self.first_value.is_finite() && self.second_value.is_finite()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
