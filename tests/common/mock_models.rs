//! Mock density suppliers for testing
//!
//! These suppliers have crossings known in closed form, making them
//! ideal for validating the pipeline and the equal-time solver.

use std::sync::Arc;

use reheat_rs::physics::{density_fn, EnergyDensity, FunctionDensity, NumericError, ParameterSet, SharedDensity};
use reheat_rs::simulation::{DensitySupplier, Seed};

/// Start of the stiff epoch used by every mock parameter set
pub const INITIAL_TIME: f64 = 0.01;

/// Coupling that makes [`FailingModel`] fail in the stiff phase
pub const FAILING_COUPLING: f64 = 13.0;

/// Late-time width of the radiation-epoch massless density
pub const RADIATION_WIDTH: f64 = 10.0;

// =================================================================================================
// Crossing model
// =================================================================================================

/// Densities with analytical equal times
///
/// - Stiff: background `1/t²`, phi `m/t`, chi `r m/t` → `t_eq = 1/m`
/// - Matter: phi `ρφ (τ/t)²`, chi `ρχ t/τ` → `tau_eq = τ (ρχ/ρφ)^(-1/3)`
/// - Radiation: phi `ρφ x^(-3/2)`, chi `ρχ/2 x² e^((1-x)/w)` with `x = t/τ`,
///   so `chi` peaks at `x = 2w`
///
/// `r < 1` selects the matter-dominated continuation, `r > 1` the
/// radiation-dominated one (which violates the stiff restriction).
#[derive(Debug, Clone, Copy)]
pub struct CrossingModel {
    pub chi_ratio: f64,
}

impl CrossingModel {
    pub fn new(chi_ratio: f64) -> Self {
        Self { chi_ratio }
    }

    pub fn matter() -> Self {
        Self::new(0.5)
    }

    pub fn radiation() -> Self {
        Self::new(1.5)
    }

    pub fn shared(self) -> Arc<dyn DensitySupplier> {
        Arc::new(self)
    }

    /// `t_eq` for mass `m`
    pub fn stiff_equal_time(mass: f64) -> f64 {
        1.0 / mass
    }

    /// `tau_eq` for mass `m`
    pub fn matter_equal_time(&self, mass: f64) -> f64 {
        Self::stiff_equal_time(mass) * self.chi_ratio.powf(-1.0 / 3.0)
    }

    /// Parameter set with mass `m` and the shared initial time
    pub fn parameters(mass: f64) -> ParameterSet {
        ParameterSet::new(INITIAL_TIME, mass, 0.1, 1.0, 0.0)
    }
}

/// Density that fails before `start`
fn epoch<F>(name: &str, start: f64, density: F) -> Result<SharedDensity, NumericError>
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    if !(start > 0.0) {
        return Err(NumericError::new(start, "epoch must start at a positive time"));
    }
    let within = move |t: f64| if t >= start { Ok(t) } else { Err(NumericError::new(t, "time before epoch start")) };
    let checked = density_fn(name, density);
    Ok(FunctionDensity::new(name, move |t: f64| checked.evaluate(within(t)?)).shared())
}

impl DensitySupplier for CrossingModel {
    fn name(&self) -> &str {
        "crossing mock"
    }

    fn stiff_background(&self, _parameters: &ParameterSet) -> Result<SharedDensity, NumericError> {
        Ok(density_fn("background", |t: f64| 1.0 / (t * t)))
    }

    fn phi_stiff(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError> {
        let mass = parameters.mass;
        epoch("phi stiff", parameters.initial_time, move |t| mass / t)
    }

    fn chi_stiff(&self, parameters: &ParameterSet, _phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        let scale = self.chi_ratio * parameters.mass;
        epoch("chi stiff", parameters.initial_time, move |t| scale / t)
    }

    fn phi_matter(&self, _parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError> {
        let Seed { reference_time: tau, initial_value: rho } = seed;
        epoch("phi matter", tau, move |t| rho * (tau / t).powi(2))
    }

    fn chi_matter(&self, _parameters: &ParameterSet, seed: Seed, _phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        let Seed { reference_time: tau, initial_value: rho } = seed;
        epoch("chi matter", tau, move |t| rho * t / tau)
    }

    fn phi_radiation(&self, _parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError> {
        let Seed { reference_time: tau, initial_value: rho } = seed;
        epoch("phi radiation", tau, move |t| rho * (tau / t).powf(1.5))
    }

    fn chi_radiation(&self, _parameters: &ParameterSet, seed: Seed, _phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        let Seed { reference_time: tau, initial_value: rho } = seed;
        epoch("chi radiation", tau, move |t| {
            let x = t / tau;
            0.5 * rho * x * x * ((1.0 - x) / RADIATION_WIDTH).exp()
        })
    }
}

// =================================================================================================
// Failing model
// =================================================================================================

/// [`CrossingModel::matter`] that refuses parameter sets with
/// `coupling == FAILING_COUPLING`, or panics when `panic_on_failure` is set
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingModel {
    pub panic_on_failure: bool,
}

impl FailingModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panicking() -> Self {
        Self { panic_on_failure: true }
    }

    pub fn failing_parameters(mass: f64) -> ParameterSet {
        ParameterSet::new(INITIAL_TIME, mass, FAILING_COUPLING, 1.0, 0.0)
    }
}

impl DensitySupplier for FailingModel {
    fn name(&self) -> &str {
        "failing mock"
    }

    fn stiff_background(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError> {
        if parameters.coupling == FAILING_COUPLING {
            if self.panic_on_failure {
                panic!("refused coupling {}", parameters.coupling);
            }
            return Err(NumericError::new(parameters.initial_time, "refused coupling"));
        }
        CrossingModel::matter().stiff_background(parameters)
    }

    fn phi_stiff(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError> {
        CrossingModel::matter().phi_stiff(parameters)
    }

    fn chi_stiff(&self, parameters: &ParameterSet, phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        CrossingModel::matter().chi_stiff(parameters, phi)
    }

    fn phi_matter(&self, parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError> {
        CrossingModel::matter().phi_matter(parameters, seed)
    }

    fn chi_matter(&self, parameters: &ParameterSet, seed: Seed, phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        CrossingModel::matter().chi_matter(parameters, seed, phi)
    }

    fn phi_radiation(&self, parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError> {
        CrossingModel::matter().phi_radiation(parameters, seed)
    }

    fn chi_radiation(&self, parameters: &ParameterSet, seed: Seed, phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        CrossingModel::matter().chi_radiation(parameters, seed, phi)
    }
}
