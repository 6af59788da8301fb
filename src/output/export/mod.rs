//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`ResultsWriter`] trait that abstracts the result
//! sink. Each sink is an independent implementation. This design follows the
//! **Open/Closed principle**: adding a new format means adding a file, without
//! ever modifying existing code.
//!
//! Writers are shared by every worker of a batch, so they are `Send + Sync`
//! and serialize their own output internally.
//!
//! # Available sinks
//!
//! | Sink           | Module     | Use                          |
//! |----------------|------------|------------------------------|
//! | `CsvWriter`    | [`csv`]    | one row per result, appended |
//! | `MemoryWriter` | this module| collects results (tests)     |
//! | `NullWriter`   | this module| discards results (benchmarks)|
//!
//! # Usage example
//!
//! ```rust,ignore
//! use reheat_rs::output::export::{CsvConfig, CsvWriter, ResultsWriter};
//!
//! let writer = CsvWriter::create("results", "scan.csv", CsvConfig::default())?;
//! writer.write(&result)?;
//! ```

pub mod csv;

// Re-export the most commonly used types at the module level so users can write:
//   use reheat_rs::output::export::{CsvWriter, CsvConfig};
// instead of the full sub-module path.
pub use csv::{CsvConfig, CsvMetadata, CsvWriter};

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::simulation::SimulationResult;

/// Failure of a results writer
#[derive(Debug, Error)]
pub enum WriteError {
    /// The underlying file or directory failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The result was refused before anything was written
    #[error("invalid result: {0}")]
    InvalidResult(String),
}

/// Abstraction trait for all result sinks.
///
/// # Implementing this trait
///
/// `write` is called concurrently from every worker; one call must produce
/// one complete record, never interleaved with another.
pub trait ResultsWriter: Send + Sync {
    /// Persist one result
    fn write(&self, result: &SimulationResult) -> Result<(), WriteError>;

    /// Name of the sink (used for logging)
    fn name(&self) -> &str {
        "results writer"
    }
}

// =================================================================================================
// In-memory sinks
// =================================================================================================

/// Collects every result in memory
#[derive(Debug, Default)]
pub struct MemoryWriter {
    results: Mutex<Vec<SimulationResult>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the results written so far, in write order
    pub fn results(&self) -> Vec<SimulationResult> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SimulationResult>> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultsWriter for MemoryWriter {
    fn write(&self, result: &SimulationResult) -> Result<(), WriteError> {
        self.lock().push(result.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Discards every result
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl ResultsWriter for NullWriter {
    fn write(&self, _result: &SimulationResult) -> Result<(), WriteError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
