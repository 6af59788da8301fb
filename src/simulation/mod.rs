//! Simulations
//!
//! This module chains three equal-time problems into one simulation and runs
//! many simulations concurrently.
//!
//! # Core Concepts
//!
//! - **Density supplier** (`DensitySupplier`): the physics, one factory
//!   method per species and epoch
//! - **Simulation** (`Simulation`): one parameter set through the phases
//!   Stiff → {Matter | Radiation} → Radiation → Reheating
//! - **Manager** (`SimulationManager`): a fixed pool of worker threads
//!   draining a shared task queue, isolating every failure
//!
//! # Module Organization
//!
//! - **`phase`**: `Phase`, `Continuation`, `select_continuation`
//! - **`supplier`**: `DensitySupplier`, `Seed`
//! - **`config`**: `SimulationConfiguration`
//! - **`pipeline`**: `Simulation`, `compute_reheating`
//! - **`result`**: `SimulationResult`, `Reheating`
//! - **`error`**: `SimulationError`, `FailureKind`
//! - **`manager`**: `SimulationManager`, `BatchReport`, `TaskFailure`
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use reheat_rs::models::PowerLawModel;
//! use reheat_rs::output::export::MemoryWriter;
//! use reheat_rs::physics::ParameterSet;
//! use reheat_rs::simulation::SimulationManager;
//!
//! let writer = Arc::new(MemoryWriter::new());
//! let grid = vec![
//!     ParameterSet::new(1.0, 1.0, 0.1, 1.0, 0.0),
//!     ParameterSet::new(1.0, -1.0, 0.1, 1.0, 0.0), // rejected: negative mass
//! ];
//!
//! let manager = SimulationManager::new(grid, Arc::new(PowerLawModel::default()), writer.clone(), Some(2));
//! let report = manager.run();
//!
//! assert_eq!(report.attempted, 2);
//! assert_eq!(report.succeeded + report.failed(), 2);
//! assert_eq!(writer.len(), report.succeeded);
//! ```

pub mod phase;
pub mod supplier;
pub mod config;
pub mod pipeline;
pub mod result;
pub mod error;
pub mod manager;

pub use config::SimulationConfiguration;
pub use error::{FailureKind, SimulationError};
pub use manager::{BatchReport, SimulationManager, Task, TaskFailure};
pub use phase::{select_continuation, Continuation, Phase};
pub use pipeline::{compute_reheating, Simulation};
pub use result::{Reheating, SimulationResult};
pub use supplier::{DensitySupplier, Seed};
