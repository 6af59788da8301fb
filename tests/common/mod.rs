//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{CrossingModel, FailingModel, FAILING_COUPLING, INITIAL_TIME};
pub use test_helpers::{mass_grid, relative_error, sorted_by_mass};
