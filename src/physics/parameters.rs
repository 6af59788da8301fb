//! Model parameters of one simulation task

use std::fmt;

/// Gravitational constant in GeV⁻²
pub const GRAVITATIONAL_CONSTANT: f64 = 6.708e-39;

/// Physical parameters of one simulation
///
/// Immutable value record. Each task receives its own copy; nothing mutates
/// it once the task starts.
///
/// # Example
///
/// ```rust
/// use reheat_rs::physics::ParameterSet;
///
/// let params = ParameterSet::new(1e-32, 1e20, 0.01, 1.0, 1.0 / 6.0);
/// assert!(params.validate().is_ok());
///
/// // Conformal coupling: every epoch has alpha = 1 / (2 + n)
/// assert!((params.alpha(2.0) - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    /// Initial time t₀ (GeV⁻¹)
    pub initial_time: f64,

    /// Mass m of the massive scalar (GeV)
    pub mass: f64,

    /// Dimensionless coupling λ << 1
    pub coupling: f64,

    /// Dimensionless expansion parameter b
    pub expansion: f64,

    /// Non-minimal gravitational coupling ξ
    pub gravitational_coupling: f64,

    /// Gravitational constant G_N (GeV⁻²)
    pub gravitational_constant: f64,
}

impl ParameterSet {
    /// Create a parameter set with the standard gravitational constant
    pub fn new(
        initial_time: f64,
        mass: f64,
        coupling: f64,
        expansion: f64,
        gravitational_coupling: f64,
    ) -> Self {
        Self {
            initial_time,
            mass,
            coupling,
            expansion,
            gravitational_coupling,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
        }
    }

    /// Override the gravitational constant
    pub fn with_gravitational_constant(mut self, gravitational_constant: f64) -> Self {
        self.gravitational_constant = gravitational_constant;
        self
    }

    /// Bessel order for a universe filled with content `n`
    ///
    /// n = 0 Minkowskian, n = 1 stiff, n = 2 radiation, n = 4 matter.
    ///
    /// ```text
    /// alpha(n) = sqrt(1 - n (n - 2) (6 xi - 1)) / (2 + n)
    /// ```
    ///
    /// NaN when the radicand is negative.
    pub fn alpha(&self, n: f64) -> f64 {
        (1.0 - n * (n - 2.0) * (6.0 * self.gravitational_coupling - 1.0)).sqrt() / (2.0 + n)
    }

    /// Validate that parameters are physically meaningful
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("initial_time", self.initial_time),
            ("mass", self.mass),
            ("coupling", self.coupling),
            ("expansion", self.expansion),
            ("gravitational_coupling", self.gravitational_coupling),
            ("gravitational_constant", self.gravitational_constant),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(format!("Parameter {} is not finite", name));
            }
        }
        if self.initial_time <= 0.0 {
            return Err("Initial time must be positive".to_string());
        }
        if self.mass <= 0.0 {
            return Err("Mass must be positive".to_string());
        }
        if self.gravitational_constant <= 0.0 {
            return Err("Gravitational constant must be positive".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t0={:e}, m={:e}, lambda={:e}, b={:e}, xi={:e}, G_N={:e}",
            self.initial_time,
            self.mass,
            self.coupling,
            self.expansion,
            self.gravitational_coupling,
            self.gravitational_constant
        )
    }
}
