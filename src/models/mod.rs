//! Density suppliers
//!
//! All models implement the [`DensitySupplier`](crate::simulation::DensitySupplier)
//! trait. The pipeline asks a model for the densities of each epoch; models are
//! responsible for the physics, the solver for locating the crossings.
//!
//! # Available Models
//!
//! ## [`PowerLawModel`]: epoch scaling laws
//!
//! Exact stiff background, power-law redshifting in every epoch, a constant
//! perturbative decay width and a constant creation source. The massless
//! densities are quadratures over the massive one.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod power_law;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use power_law::PowerLawModel;
