//! The three-phase pipeline of one simulation
//!
//! # State Machine
//!
//! ```text
//!            ┌─────────┐
//!            │  Stiff  │  background = phi          → t_eq
//!            └────┬────┘
//!        phi > chi at t_eq ?
//!         yes │         │ no
//!     ┌───────▼──┐      │
//!     │  Matter  │      │   phi = chi               → tau_eq
//!     └───────┬──┘      │
//!         ┌───▼─────────▼──┐
//!         │   Radiation    │  phi = chi             → tau2_eq
//!         └───────┬────────┘
//!         ┌───────▼────────┐
//!         │   Reheating    │  max chi, ∫ chi dt     → (T_rh, t_rh)
//!         └────────────────┘
//! ```
//!
//! Each phase seeds the next with the equal time and the density values
//! found there. Values are passed forward; no phase keeps a reference to the
//! densities of another.

use crate::numerics::{integrate, maximize};
use crate::physics::{EnergyDensity, MemoizedDensity, NumericError, ParameterSet, Quantizer, SharedDensity};
use crate::simulation::config::SimulationConfiguration;
use crate::simulation::error::SimulationError;
use crate::simulation::phase::{select_continuation, Continuation, Phase};
use crate::simulation::result::{Reheating, SimulationResult};
use crate::simulation::supplier::{DensitySupplier, Seed};
use crate::solver::{EqualTimeProblem, EqualTimeSolver, PhaseResult};

/// One simulation: a parameter set run through every phase
///
/// # Example
///
/// ```rust,ignore
/// let config = SimulationConfiguration::default();
/// let result = Simulation::new(parameters, &model, &config).run()?;
/// println!("T_rh = {:e}", result.reheating.temperature);
/// ```
pub struct Simulation<'a> {
    parameters: ParameterSet,
    supplier: &'a dyn DensitySupplier,
    config: &'a SimulationConfiguration,
}

impl<'a> Simulation<'a> {
    pub fn new(
        parameters: ParameterSet,
        supplier: &'a dyn DensitySupplier,
        config: &'a SimulationConfiguration,
    ) -> Self {
        Self {
            parameters,
            supplier,
            config,
        }
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Run every phase
    ///
    /// # Errors
    ///
    /// [`SimulationError::Configuration`] for invalid input,
    /// [`SimulationError::Phase`] tagged with the failing phase otherwise.
    pub fn run(&self) -> Result<SimulationResult, SimulationError> {
        // ====== Step 1: Validation ======

        self.config.validate().map_err(SimulationError::Configuration)?;
        self.parameters.validate().map_err(SimulationError::Configuration)?;
        let quantizer = Quantizer::new(self.config.cache_digits).map_err(SimulationError::Configuration)?;

        let parameters = &self.parameters;
        let supplier = self.supplier;
        let solver = EqualTimeSolver::new();
        let at = |phase: Phase| move |error: NumericError| SimulationError::in_phase(phase, error);

        log::debug!("Simulation started with {} ({})", parameters, supplier.name());

        // ====== Step 2: Stiff phase ======

        let background = memoize(supplier.stiff_background(parameters).map_err(at(Phase::Stiff))?, quantizer);
        let phi_stiff = memoize(supplier.phi_stiff(parameters).map_err(at(Phase::Stiff))?, quantizer);
        let chi_stiff = memoize(
            supplier.chi_stiff(parameters, phi_stiff.clone()).map_err(at(Phase::Stiff))?,
            quantizer,
        );

        let problem = if self.config.stiff_restriction {
            EqualTimeProblem::restricted(background, phi_stiff, parameters.initial_time, chi_stiff.clone())
        } else {
            EqualTimeProblem::new(background, phi_stiff, parameters.initial_time)
        };
        let stiff = solver
            .solve(&problem, &self.config.solver)
            .map_err(|e| SimulationError::in_phase(Phase::Stiff, e))?;

        let t_eq = stiff.equal_time;
        let phi_value = stiff.second_value;
        let chi_value = chi_stiff.evaluate(t_eq).map_err(at(Phase::Stiff))?;
        let continuation = select_continuation(phi_value, chi_value);

        log::debug!(
            "Stiff phase: t_eq = {:e}, phi = {:e}, chi = {:e} -> {}",
            t_eq, phi_value, chi_value, continuation
        );

        // ====== Step 3: Matter phase (matter-dominated continuation only) ======

        let (matter, phi_seed, chi_seed) = match continuation {
            Continuation::MatterDominated => {
                let phi_matter = memoize(
                    supplier
                        .phi_matter(parameters, Seed::new(t_eq, phi_value))
                        .map_err(at(Phase::Matter))?,
                    quantizer,
                );
                let chi_matter = memoize(
                    supplier
                        .chi_matter(parameters, Seed::new(t_eq, chi_value), phi_matter.clone())
                        .map_err(at(Phase::Matter))?,
                    quantizer,
                );

                let matter = solver
                    .solve(&EqualTimeProblem::new(phi_matter, chi_matter, t_eq), &self.config.solver)
                    .map_err(|e| SimulationError::in_phase(Phase::Matter, e))?;

                log::debug!("Matter phase: tau_eq = {:e}", matter.equal_time);

                let tau_eq = matter.equal_time;
                (
                    Some(matter),
                    Seed::new(tau_eq, matter.first_value),
                    Seed::new(tau_eq, matter.second_value),
                )
            }
            Continuation::RadiationDominated => (None, Seed::new(t_eq, phi_value), Seed::new(t_eq, chi_value)),
        };

        // ====== Step 4: Radiation phase ======

        let phi_radiation = memoize(
            supplier.phi_radiation(parameters, phi_seed).map_err(at(Phase::Radiation))?,
            quantizer,
        );
        let chi_radiation = memoize(
            supplier
                .chi_radiation(parameters, chi_seed, phi_radiation.clone())
                .map_err(at(Phase::Radiation))?,
            quantizer,
        );

        let radiation = solver
            .solve(
                &EqualTimeProblem::new(phi_radiation.clone(), chi_radiation.clone(), phi_seed.reference_time),
                &self.config.solver,
            )
            .map_err(|e| SimulationError::in_phase(Phase::Radiation, e))?;

        log::debug!("Radiation phase: tau2_eq = {:e}", radiation.equal_time);

        // ====== Step 5: Reheating ======

        // chi from the radiation reference locates the peak; chi re-seeded at
        // tau2_eq is integrated up to it
        let tau2_eq = radiation.equal_time;
        let chi_reseeded = memoize(
            supplier
                .chi_radiation(parameters, Seed::new(tau2_eq, radiation.second_value), phi_radiation)
                .map_err(at(Phase::Reheating))?,
            quantizer,
        );

        let reheating = compute_reheating(&*chi_radiation, &*chi_reseeded, tau2_eq, self.config)
            .map_err(at(Phase::Reheating))?;

        log::debug!("Reheating: T_rh = {:e}, t_rh = {:e}", reheating.temperature, reheating.time);

        Ok(SimulationResult {
            parameters: *parameters,
            continuation,
            stiff,
            matter,
            radiation,
            reheating,
        })
    }
}

/// Each density gets its own cache, dropped with the task
fn memoize(density: SharedDensity, quantizer: Quantizer) -> SharedDensity {
    MemoizedDensity::new(density, quantizer).into_shared()
}

/// Reheating time and temperature from the radiation-epoch massless density
///
/// `t_rh` maximizes `peak` over `[start, start × reheating_window]`, and
/// `T_rh = (∫_start^t_rh integrand dt)^(1/4)`. The pipeline passes `chi`
/// referenced at the start of the radiation epoch as `peak` and `chi`
/// re-seeded at `tau2_eq` as `integrand`.
///
/// # Errors
///
/// Any density failure, a maximum on `start` itself (the density only falls
/// inside the window) or an integral that is negative or not finite.
///
/// # Example
///
/// ```rust
/// use reheat_rs::physics::density_fn;
/// use reheat_rs::simulation::{compute_reheating, SimulationConfiguration};
///
/// let chi = density_fn("chi", |t: f64| t * (-t / 10.0).exp());
/// let reheating = compute_reheating(&*chi, &*chi, 1.0, &SimulationConfiguration::default()).unwrap();
///
/// assert!((reheating.time - 10.0).abs() < 1e-3);
/// ```
pub fn compute_reheating(
    peak: &dyn EnergyDensity,
    integrand: &dyn EnergyDensity,
    start: f64,
    config: &SimulationConfiguration,
) -> Result<Reheating, NumericError> {
    let end = start * config.reheating_window;
    let maximum = maximize(|t| peak.evaluate(t), start, end, &config.maximization)?;

    if !(maximum.location > start) {
        return Err(NumericError::new(
            start,
            format!("{} has no maximum inside [{start:e}, {end:e}]", peak.name()),
        ));
    }

    let integral = integrate(|t| integrand.evaluate(t), start, maximum.location, &config.quadrature)?;

    if !(integral >= 0.0) || !integral.is_finite() {
        return Err(NumericError::new(
            maximum.location,
            format!("reheating integral {integral:e} is not a non-negative finite number"),
        ));
    }

    Ok(Reheating {
        temperature: integral.powf(0.25),
        time: maximum.location,
    })
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::density_fn;
    use approx::assert_relative_eq;

    #[test]
    fn test_reheating_of_known_curve() {
        // ∫_1^10 t e^{-t/10} dt = 110 e^{-0.1} - 200 / e
        let chi = density_fn("chi", |t: f64| t * (-t / 10.0).exp());
        let reheating = compute_reheating(&*chi, &*chi, 1.0, &SimulationConfiguration::default()).unwrap();

        let integral = 110.0 * (-0.1f64).exp() - 200.0 / std::f64::consts::E;
        assert_relative_eq!(reheating.time, 10.0, max_relative = 1e-4);
        assert_relative_eq!(reheating.temperature, integral.powf(0.25), max_relative = 1e-6);
    }

    #[test]
    fn test_peak_and_integrand_are_separate() {
        // Peak of t e^{-t/10} at 10, integrand 2 over [1, 10]
        let peak = density_fn("chi", |t: f64| t * (-t / 10.0).exp());
        let integrand = density_fn("flat", |_| 2.0);
        let reheating = compute_reheating(&*peak, &*integrand, 1.0, &SimulationConfiguration::default()).unwrap();

        assert_relative_eq!(reheating.time, 10.0, max_relative = 1e-4);
        assert_relative_eq!(reheating.temperature, (2.0 * (reheating.time - 1.0)).powf(0.25), max_relative = 1e-9);
    }

    #[test]
    fn test_falling_density_has_no_reheating() {
        let chi = density_fn("falling", |t: f64| 1.0 / (t * t));
        let error = compute_reheating(&*chi, &*chi, 2.0, &SimulationConfiguration::default()).unwrap_err();

        assert_eq!(error.time, 2.0);
        assert!(error.to_string().contains("no maximum"), "{error}");
    }

    #[test]
    fn test_reheating_rejects_negative_integral() {
        let chi = density_fn("negative", |t: f64| -(t - 5.0).powi(2) - 1.0);
        let result = compute_reheating(&*chi, &*chi, 1.0, &SimulationConfiguration::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_reheating_error_from_density() {
        let chi = density_fn("overflow", |t: f64| if t > 50.0 { f64::INFINITY } else { t });
        assert!(compute_reheating(&*chi, &*chi, 1.0, &SimulationConfiguration::default()).is_err());
    }
}
