//! Power-law reference model
//!
//! A complete [`DensitySupplier`] built from the scaling laws of each epoch:
//!
//! | epoch     | scale factor  | massive field `phi` | massless field `chi` |
//! |-----------|---------------|---------------------|----------------------|
//! | stiff     | `a ∝ t^(1/3)` | `∝ a^-3 = t^-1`     | `∝ a^-4 = t^-4/3`    |
//! | matter    | `a ∝ t^(2/3)` | `∝ t^-2`            | `∝ t^-8/3`           |
//! | radiation | `a ∝ t^(1/2)` | `∝ t^-3/2`          | `∝ t^-2`             |
//!
//! # Physics
//!
//! - Stiff background: `rho_s = 1 / (24 π G_N t²)`
//! - Perturbative decay width of the massive field: `Γ = λ² m / (8π)`
//! - Constant gravitational creation source: `C = (m b)⁴ / (32π)`
//!
//! ```text
//! phi_stiff(t) = (C / t) ∫_t0^t t' e^{-Γ (t - t')} dt'
//! phi_epoch(t) = rho0 (τ / t)^p e^{-Γ (t - τ)}                      p = 2 | 3/2
//! chi_epoch(t) = rho0 (τ / t)^q + ∫_τ^t Γ phi(t') (t' / t)^q dt'    q = 4/3 | 8/3 | 2
//! ```
//!
//! The massless densities are quadratures over the massive one, which makes
//! them expensive and the memoization in the pipeline worthwhile.
//!
//! Seeded with `phi = chi` at `τ`, the radiation-epoch `chi` grows only while
//! `Γ t > 2`. The matter crossing has to happen late enough for a reheating
//! maximum to exist after it.
//!
//! # Example
//!
//! ```rust
//! use reheat_rs::models::PowerLawModel;
//! use reheat_rs::physics::ParameterSet;
//! use reheat_rs::simulation::{DensitySupplier, Seed};
//!
//! # fn main() -> Result<(), reheat_rs::physics::NumericError> {
//! let model = PowerLawModel::default();
//! let params = ParameterSet::new(1.0, 1.0, 0.1, 1.0, 0.0);
//!
//! let phi = model.phi_matter(&params, Seed::new(2.0, 5.0))?;
//! assert_eq!(phi.evaluate(2.0)?, 5.0);
//! assert!(phi.evaluate(1.0).is_err()); // before the epoch starts
//! # Ok(())
//! # }
//! ```

use std::f64::consts::PI;

use crate::numerics::{integrate, QuadratureConfiguration};
use crate::physics::{EnergyDensity, FunctionDensity, NumericError, ParameterSet, SharedDensity};
use crate::simulation::{DensitySupplier, Seed};

/// Lifetimes after which a created `phi` quantum no longer contributes
const DECAY_HORIZON: f64 = 60.0;
/// Exponent of `phi` in the matter epoch
const PHI_MATTER: f64 = 2.0;
/// Exponent of `phi` in the radiation epoch
const PHI_RADIATION: f64 = 1.5;
/// Exponent of `chi` in the stiff epoch
const CHI_STIFF: f64 = 4.0 / 3.0;
/// Exponent of `chi` in the matter epoch
const CHI_MATTER: f64 = 8.0 / 3.0;
/// Exponent of `chi` in the radiation epoch
const CHI_RADIATION: f64 = 2.0;

/// Power-law density supplier
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerLawModel {
    /// Quadrature used by every integral density
    pub quadrature: QuadratureConfiguration,
}

impl PowerLawModel {
    pub fn new(quadrature: QuadratureConfiguration) -> Self {
        Self { quadrature }
    }

    /// Decay width `Γ = λ² m / (8π)`
    pub fn decay_width(parameters: &ParameterSet) -> f64 {
        parameters.coupling.powi(2) * parameters.mass / (8.0 * PI)
    }

    /// Creation source `C = (m b)⁴ / (32π)`
    pub fn creation_rate(parameters: &ParameterSet) -> f64 {
        (parameters.mass * parameters.expansion).powi(4) / (32.0 * PI)
    }
}

impl DensitySupplier for PowerLawModel {
    fn name(&self) -> &str {
        "power law"
    }

    fn stiff_background(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError> {
        let gravitational_constant = parameters.gravitational_constant;

        Ok(FunctionDensity::new("stiff background", move |t: f64| {
            if !(t > 0.0) || !t.is_finite() {
                return Err(NumericError::new(t, "time must be positive"));
            }
            finite(t, 1.0 / (24.0 * PI * gravitational_constant * t * t))
        })
        .shared())
    }

    fn phi_stiff(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError> {
        let t0 = parameters.initial_time;
        let gamma = Self::decay_width(parameters);
        let creation = Self::creation_rate(parameters);
        let quadrature = self.quadrature;
        check_reference(t0)?;

        Ok(FunctionDensity::new("phi stiff", move |t: f64| {
            check_epoch(t, t0)?;
            // Contributions older than DECAY_HORIZON lifetimes are below e^-DECAY_HORIZON
            let start = if gamma > 0.0 { t0.max(t - DECAY_HORIZON / gamma) } else { t0 };
            let integral = integrate(|s| Ok(s * (-gamma * (t - s)).exp()), start, t, &quadrature)?;
            finite(t, creation * integral / t)
        })
        .shared())
    }

    fn chi_stiff(&self, parameters: &ParameterSet, phi: SharedDensity) -> Result<SharedDensity, NumericError> {
        let seed = Seed::new(parameters.initial_time, 0.0);
        sourced("chi stiff", seed, CHI_STIFF, Self::decay_width(parameters), phi, self.quadrature)
    }

    fn phi_matter(&self, parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError> {
        decaying("phi matter", seed, PHI_MATTER, Self::decay_width(parameters))
    }

    fn chi_matter(
        &self,
        parameters: &ParameterSet,
        seed: Seed,
        phi: SharedDensity,
    ) -> Result<SharedDensity, NumericError> {
        sourced("chi matter", seed, CHI_MATTER, Self::decay_width(parameters), phi, self.quadrature)
    }

    fn phi_radiation(&self, parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError> {
        decaying("phi radiation", seed, PHI_RADIATION, Self::decay_width(parameters))
    }

    fn chi_radiation(
        &self,
        parameters: &ParameterSet,
        seed: Seed,
        phi: SharedDensity,
    ) -> Result<SharedDensity, NumericError> {
        sourced("chi radiation", seed, CHI_RADIATION, Self::decay_width(parameters), phi, self.quadrature)
    }
}

// =================================================================================================
// Density builders
// =================================================================================================

/// Redshifting and decaying massive field
fn decaying(name: &str, seed: Seed, exponent: f64, gamma: f64) -> Result<SharedDensity, NumericError> {
    check_reference(seed.reference_time)?;
    let tau = seed.reference_time;

    Ok(FunctionDensity::new(name, move |t: f64| {
        check_epoch(t, tau)?;
        finite(t, seed.initial_value * (tau / t).powf(exponent) * (-gamma * (t - tau)).exp())
    })
    .shared())
}

/// Redshifting massless field fed by the decay of `phi`
fn sourced(
    name: &str,
    seed: Seed,
    exponent: f64,
    gamma: f64,
    phi: SharedDensity,
    quadrature: QuadratureConfiguration,
) -> Result<SharedDensity, NumericError> {
    check_reference(seed.reference_time)?;
    let tau = seed.reference_time;

    Ok(FunctionDensity::new(name, move |t: f64| {
        check_epoch(t, tau)?;
        let redshifted = seed.initial_value * (tau / t).powf(exponent);
        let produced = integrate(
            |s| Ok(gamma * phi.evaluate(s)? * (s / t).powf(exponent)),
            tau,
            t,
            &quadrature,
        )?;
        finite(t, redshifted + produced)
    })
    .shared())
}

fn check_reference(reference_time: f64) -> Result<(), NumericError> {
    if reference_time > 0.0 && reference_time.is_finite() {
        Ok(())
    } else {
        Err(NumericError::new(reference_time, "epoch must start at a positive time"))
    }
}

fn check_epoch(t: f64, start: f64) -> Result<(), NumericError> {
    if t >= start && t.is_finite() {
        Ok(())
    } else {
        Err(NumericError::new(t, format!("time before epoch start {start:e}")))
    }
}

fn finite(t: f64, value: f64) -> Result<f64, NumericError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumericError::non_finite(t, value))
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::density_fn;
    use approx::assert_relative_eq;

    fn parameters() -> ParameterSet {
        // Γ = 1 / (8π), C = 1 / (32π)
        ParameterSet::new(1.0, 1.0, 1.0, 1.0, 0.0)
    }

    #[test]
    fn test_rates() {
        let p = parameters();

        assert_relative_eq!(PowerLawModel::decay_width(&p), 1.0 / (8.0 * PI));
        assert_relative_eq!(PowerLawModel::creation_rate(&p), 1.0 / (32.0 * PI));
    }

    #[test]
    fn test_stiff_background() {
        let p = parameters().with_gravitational_constant(1.0 / (24.0 * PI));
        let background = PowerLawModel::default().stiff_background(&p).unwrap();

        assert_relative_eq!(background.evaluate(2.0).unwrap(), 0.25, max_relative = 1e-14);
        assert!(background.evaluate(0.0).is_err());
    }

    #[test]
    fn test_phi_stiff_matches_closed_form() {
        let p = parameters();
        let (gamma, creation) = (PowerLawModel::decay_width(&p), PowerLawModel::creation_rate(&p));
        let phi = PowerLawModel::default().phi_stiff(&p).unwrap();

        let t: f64 = 10.0;
        let integral = (t / gamma - 1.0 / gamma.powi(2)) - (-gamma * (t - 1.0)).exp() * (1.0 / gamma - 1.0 / gamma.powi(2));
        assert_relative_eq!(phi.evaluate(t).unwrap(), creation * integral / t, max_relative = 1e-9);

        assert_eq!(phi.evaluate(1.0).unwrap(), 0.0);
        assert!(phi.evaluate(0.5).is_err());
    }

    #[test]
    fn test_chi_stiff_with_constant_source() {
        let p = parameters();
        let gamma = PowerLawModel::decay_width(&p);
        let chi = PowerLawModel::default()
            .chi_stiff(&p, density_fn("unit", |_| 1.0))
            .unwrap();

        // ∫_1^t Γ (t'/t)^{4/3} dt' = Γ (3/7) (t^{7/3} - 1) / t^{4/3}
        let t: f64 = 8.0;
        let expected = gamma * 3.0 / 7.0 * (t.powf(7.0 / 3.0) - 1.0) / t.powf(4.0 / 3.0);
        assert_relative_eq!(chi.evaluate(t).unwrap(), expected, max_relative = 1e-9);
    }

    #[test]
    fn test_phi_decreases_in_every_epoch() {
        let model = PowerLawModel::default();
        let p = parameters();
        let seed = Seed::new(1.0, 10.0);

        for phi in [model.phi_matter(&p, seed).unwrap(), model.phi_radiation(&p, seed).unwrap()] {
            let mut previous = phi.evaluate(1.0).unwrap();
            for i in 1..50 {
                let value = phi.evaluate(1.0 + i as f64 * 0.5).unwrap();
                assert!(value < previous, "{} does not decrease", phi.name());
                previous = value;
            }
        }
    }

    #[test]
    fn test_chi_without_source_redshifts() {
        let model = PowerLawModel::default();
        let p = parameters();
        let seed = Seed::new(2.0, 3.0);
        let no_source = density_fn("zero", |_| 0.0);

        let matter = model.chi_matter(&p, seed, no_source.clone()).unwrap();
        let radiation = model.chi_radiation(&p, seed, no_source).unwrap();

        assert_relative_eq!(matter.evaluate(4.0).unwrap(), 3.0 * 0.5f64.powf(8.0 / 3.0), max_relative = 1e-14);
        assert_relative_eq!(radiation.evaluate(4.0).unwrap(), 0.75, max_relative = 1e-14);
    }

    #[test]
    fn test_radiation_chi_grows_only_after_decay_catches_up() {
        let model = PowerLawModel::default();
        // Γ = 1
        let p = ParameterSet::new(0.01, 1.0, (8.0 * PI).sqrt(), 1.0, 0.0);
        assert_relative_eq!(PowerLawModel::decay_width(&p), 1.0, max_relative = 1e-14);

        let chi_from = |tau: f64| {
            let seed = Seed::new(tau, 1e-3);
            let phi = model.phi_radiation(&p, seed).unwrap();
            model.chi_radiation(&p, seed, phi).unwrap()
        };

        let late = chi_from(3.0);
        assert!(late.evaluate(3.1).unwrap() > late.evaluate(3.0).unwrap());

        let early = chi_from(1.0);
        assert!(early.evaluate(1.1).unwrap() < early.evaluate(1.0).unwrap());
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let model = PowerLawModel::default();
        assert!(model.phi_matter(&parameters(), Seed::new(0.0, 1.0)).is_err());
        assert!(model.phi_radiation(&parameters(), Seed::new(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn test_densities_before_epoch_fail() {
        let model = PowerLawModel::default();
        let p = parameters();
        let phi = model.phi_matter(&p, Seed::new(5.0, 1.0)).unwrap();
        let chi = model.chi_matter(&p, Seed::new(5.0, 1.0), phi.clone()).unwrap();

        assert!(phi.evaluate(4.9).is_err());
        assert!(chi.evaluate(4.9).is_err());
    }
}
