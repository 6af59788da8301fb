//! Configuration of one simulation

use crate::numerics::{MaximizationConfiguration, QuadratureConfiguration};
use crate::physics::memo::{Quantizer, DEFAULT_CACHE_DIGITS};
use crate::solver::SolverConfiguration;

/// Numerical settings shared by every task of a batch
///
/// # Example
///
/// ```rust
/// use reheat_rs::simulation::SimulationConfiguration;
/// use reheat_rs::solver::SolverConfiguration;
///
/// let config = SimulationConfiguration {
///     solver: SolverConfiguration::bisection(1e-10, 200),
///     stiff_restriction: true,
///     ..SimulationConfiguration::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfiguration {
    /// Root finder used by every phase
    pub solver: SolverConfiguration,

    /// Quadrature of the reheating integral
    pub quadrature: QuadratureConfiguration,

    /// Search of the reheating time
    pub maximization: MaximizationConfiguration,

    /// Significant digits of the memoization keys
    pub cache_digits: u32,

    /// The reheating time is searched in `[tau2_eq, tau2_eq × reheating_window]`
    pub reheating_window: f64,

    /// Require the stiff-phase massive density to exceed the massless one at `t_eq`
    ///
    /// Off by default: with the restriction on, a dominant massless density
    /// fails the stiff phase and the radiation-dominated continuation is never taken.
    pub stiff_restriction: bool,
}

impl Default for SimulationConfiguration {
    fn default() -> Self {
        Self {
            solver: SolverConfiguration::default(),
            quadrature: QuadratureConfiguration::default(),
            maximization: MaximizationConfiguration::default(),
            cache_digits: DEFAULT_CACHE_DIGITS,
            reheating_window: 1e5,
            stiff_restriction: false,
        }
    }
}

impl SimulationConfiguration {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.solver.validate()?;
        self.quadrature.validate()?;
        self.maximization.validate()?;
        Quantizer::new(self.cache_digits)?;
        if !(self.reheating_window > 1.0) || !self.reheating_window.is_finite() {
            return Err("Reheating window must be a finite factor greater than 1".to_string());
        }
        Ok(())
    }
}
