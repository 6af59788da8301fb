//! Density supplier interface
//!
//! The physics of each epoch lives behind [`DensitySupplier`]. The pipeline
//! asks it for one density per species and epoch, passing every value a
//! density depends on explicitly: the parameter set, the [`Seed`] carried over
//! from the previous phase, and (for the massless field) the massive field's
//! density that sources it.
//!
//! Suppliers return plain densities; the pipeline wraps each one in its own
//! memoization cache.

use crate::physics::{NumericError, ParameterSet, SharedDensity};

/// Initial condition handed from one phase to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    /// Time at which the epoch starts
    pub reference_time: f64,

    /// Density at `reference_time`
    pub initial_value: f64,
}

impl Seed {
    pub fn new(reference_time: f64, initial_value: f64) -> Self {
        Self {
            reference_time,
            initial_value,
        }
    }
}

/// Factory of the energy densities of every epoch
///
/// `phi` is the massive scalar, `chi` the massless one produced by its decay.
///
/// # Contract
///
/// - Returned densities are pure and thread safe
/// - A density must fail with [`NumericError`] for times before its epoch
///   (before `parameters.initial_time` in the stiff epoch, before
///   `seed.reference_time` afterwards)
/// - Construction errors are reported, never panicked
pub trait DensitySupplier: Send + Sync {
    /// Name of the supplier (used for logging)
    fn name(&self) -> &str {
        "density supplier"
    }

    /// Background density of the stiff fluid
    fn stiff_background(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError>;

    /// Massive field during the stiff epoch
    fn phi_stiff(&self, parameters: &ParameterSet) -> Result<SharedDensity, NumericError>;

    /// Massless field during the stiff epoch, sourced by `phi`
    fn chi_stiff(
        &self,
        parameters: &ParameterSet,
        phi: SharedDensity,
    ) -> Result<SharedDensity, NumericError>;

    /// Massive field during the matter epoch
    fn phi_matter(&self, parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError>;

    /// Massless field during the matter epoch, sourced by `phi`
    fn chi_matter(
        &self,
        parameters: &ParameterSet,
        seed: Seed,
        phi: SharedDensity,
    ) -> Result<SharedDensity, NumericError>;

    /// Massive field during the radiation epoch
    fn phi_radiation(&self, parameters: &ParameterSet, seed: Seed) -> Result<SharedDensity, NumericError>;

    /// Massless field during the radiation epoch, sourced by `phi`
    fn chi_radiation(
        &self,
        parameters: &ParameterSet,
        seed: Seed,
        phi: SharedDensity,
    ) -> Result<SharedDensity, NumericError>;
}
