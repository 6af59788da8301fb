//! CSV sink for simulation results
//!
//! One row per simulation, appended to a single file shared by every worker.
//! The format is compatible with Excel, Python pandas, MATLAB, and most data
//! analysis tools.
//!
//! # Features
//!
//! - **Append mode**: the header is written only when the file is new or empty
//! - **Metadata support**: optional `#` comment lines with a timestamp
//! - **Customizable**: delimiter, decimal separator, significant digits
//! - **Validation**: results containing NaN or Inf are refused
//!
//! # Columns
//!
//! ```csv
//! t0,m,lambda,b,xi,G_N,continuation,reheating_temp,reheating_time,t_eq,rho_stiff_t_eq,rho_phi_stiff_t_eq,tau_eq,rho_phi_mat_eq,rho_chi_mat_eq,tau2_eq,rho_phi_rad_eq,rho_chi_rad_eq
//! ```
//!
//! The three matter columns are empty on the radiation-dominated continuation.
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! use reheat_rs::output::export::{CsvConfig, CsvMetadata, CsvWriter};
//!
//! let metadata = CsvMetadata::from_simulation("power law", "Brent");
//! let config = CsvConfig::default().with_metadata(metadata);
//!
//! let writer = CsvWriter::create("results", "scan.csv", config)?;
//! ```
//!
//! **Output** (`results/scan.csv`):
//! ```csv
//! # Reheating Scan Results
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Model: power law
//! # Solver: Brent
//! #
//! t0,m,lambda,b,...
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::output::export::{ResultsWriter, WriteError};
use crate::simulation::SimulationResult;

/// Header row, in column order
pub const COLUMNS: [&str; 18] = [
    "t0",
    "m",
    "lambda",
    "b",
    "xi",
    "G_N",
    "continuation",
    "reheating_temp",
    "reheating_time",
    "t_eq",
    "rho_stiff_t_eq",
    "rho_phi_stiff_t_eq",
    "tau_eq",
    "rho_phi_mat_eq",
    "rho_chi_mat_eq",
    "tau2_eq",
    "rho_phi_rad_eq",
    "rho_chi_rad_eq",
];

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV output
///
/// # Fields
///
/// - `delimiter`: Column separator (default: ',')
/// - `decimal_separator`: Decimal point character (default: '.')
/// - `precision`: Significant digits in scientific notation (default: 17)
/// - `include_metadata`: Add header comments with run info
/// - `metadata`: Run metadata to include
///
/// # Example
///
/// ```rust
/// use reheat_rs::output::export::CsvConfig;
///
/// let config = CsvConfig::default().delimiter(';').precision(10);
/// assert_eq!(config.delimiter, ';');
/// assert_eq!(config.precision, 10);
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Significant digits of every number (default: 17, exact for f64)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 17,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// Create config with European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// All fields are optional. Only non-None fields will be included in the CSV header.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Density supplier name (e.g., "power law")
    pub model_name: Option<String>,

    /// Root finder name (e.g., "Brent")
    pub solver_name: Option<String>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Create metadata naming the model and the root finder
    pub fn from_simulation(model: &str, solver: &str) -> Self {
        Self {
            model_name: Some(model.to_string()),
            solver_name: Some(solver.to_string()),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments to file
fn write_metadata_header(file: &mut File, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(file, "# Reheating Scan Results")?;

    // Timestamp (current time)
    let now = chrono::Utc::now();
    writeln!(file, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(file, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(file, "# Solver: {}", solver)?;
    }

    // Custom parameters
    for (key, value) in &metadata.custom {
        writeln!(file, "# {}: {}", key, value)?;
    }

    // Separator
    writeln!(file, "#")?;

    Ok(())
}

/// Format number in scientific notation with the configured significant digits
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$e}", value, prec = config.precision.saturating_sub(1));

    // Replace decimal separator if needed
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Appends one CSV row per result
///
/// The file handle sits behind a mutex; each row is formatted first and then
/// written with a single `write_all`, so concurrent rows never interleave.
#[derive(Debug)]
pub struct CsvWriter {
    path: PathBuf,
    config: CsvConfig,
    file: Mutex<File>,
}

impl CsvWriter {
    /// Open `directory/file_name` for appending
    ///
    /// Creates the directory if needed. Writes the metadata comments (when
    /// enabled) and the header row only if the file is new or empty.
    ///
    /// # Errors
    ///
    /// [`WriteError::Io`] when the directory or file cannot be created.
    pub fn create(
        directory: impl AsRef<Path>,
        file_name: &str,
        config: CsvConfig,
    ) -> Result<Self, WriteError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)?;

        let path = directory.join(file_name);
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;

        if file.metadata()?.len() == 0 {
            if config.include_metadata
                && let Some(metadata) = &config.metadata
            {
                write_metadata_header(&mut file, metadata)?;
            }

            let delimiter = config.delimiter.to_string();
            writeln!(file, "{}", COLUMNS.join(&delimiter))?;
            file.flush()?;
        }

        log::debug!("Writing results to {}", path.display());

        Ok(Self {
            path,
            config,
            file: Mutex::new(file),
        })
    }

    /// Path of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One row, terminated by a newline
    fn format_row(&self, result: &SimulationResult) -> String {
        let number = |value: f64| format_number(value, &self.config);
        let p = &result.parameters;

        let mut fields = vec![
            number(p.initial_time),
            number(p.mass),
            number(p.coupling),
            number(p.expansion),
            number(p.gravitational_coupling),
            number(p.gravitational_constant),
            result.continuation.label().to_string(),
            number(result.reheating.temperature),
            number(result.reheating.time),
            number(result.stiff.equal_time),
            number(result.stiff.first_value),
            number(result.stiff.second_value),
        ];

        match &result.matter {
            Some(matter) => fields.extend([
                number(matter.equal_time),
                number(matter.first_value),
                number(matter.second_value),
            ]),
            None => fields.extend([String::new(), String::new(), String::new()]),
        }

        fields.extend([
            number(result.radiation.equal_time),
            number(result.radiation.first_value),
            number(result.radiation.second_value),
        ]);

        let mut row = fields.join(&self.config.delimiter.to_string());
        row.push('\n');
        row
    }
}

impl ResultsWriter for CsvWriter {
    fn write(&self, result: &SimulationResult) -> Result<(), WriteError> {
        // ============================= Validation =============================

        if !result.is_finite() {
            return Err(WriteError::InvalidResult(format!(
                "NaN or Inf in result for {}",
                result.parameters
            )));
        }

        // ============================= Write Data =============================

        let row = self.format_row(result);
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(row.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "CSV"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
