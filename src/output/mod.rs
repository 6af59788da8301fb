//! Output module for simulation results
//!
//! This module provides the sinks simulation results are streamed to:
//! - **Export**: CSV rows for external analysis, in-memory collection for tests
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Result sinks
//!     ├── mod.rs          ← ResultsWriter, MemoryWriter, NullWriter
//!     └── csv.rs          ← CsvWriter
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reheat_rs::output::export::{CsvConfig, CsvWriter};
//!
//! // Rows are appended to results/scan.csv by every worker
//! let writer = Arc::new(CsvWriter::create("results", "scan.csv", CsvConfig::default())?);
//! ```
//!
//! # Design Philosophy
//!
//! Writers are capabilities, not frameworks: one method, `write`, called
//! concurrently by every worker. Construction failures are returned to the
//! caller, write failures become per-task failures in the batch report.

pub mod export;

// Re-export commonly used items for convenience
pub use export::{
    CsvConfig,
    CsvMetadata,
    CsvWriter,
    MemoryWriter,
    NullWriter,
    ResultsWriter,
    WriteError,
};
