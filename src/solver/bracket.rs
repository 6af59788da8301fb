//! Brackets and the automatic bracket search
//!
//! A bracket is an interval `[low, high]` over which `h = rho1 - rho2`
//! changes sign. The search walks forward from the lower limit with
//! geometrically growing steps until it sees the first sign change.

use crate::physics::NumericError;
use crate::solver::error::SolverError;
use crate::solver::traits::BracketConfiguration;

/// Interval `[low, high]` with the values of `h` at both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub low: f64,
    pub high: f64,
    pub f_low: f64,
    pub f_high: f64,
}

impl Bracket {
    /// Bracket from two evaluated points, in any order
    pub fn new(a: f64, f_a: f64, b: f64, f_b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b, f_low: f_a, f_high: f_b }
        } else {
            Self { low: b, high: a, f_low: f_b, f_high: f_a }
        }
    }

    /// Degenerate bracket at an exact root
    pub fn point(t: f64) -> Self {
        Self { low: t, high: t, f_low: 0.0, f_high: 0.0 }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn midpoint(&self) -> f64 {
        self.low + 0.5 * (self.high - self.low)
    }

    pub fn is_point(&self) -> bool {
        self.low == self.high
    }

    /// Whether `h` changes sign (or vanishes) over the bracket
    ///
    /// Compares signs instead of multiplying, so tiny values cannot underflow
    /// into a false negative.
    pub fn has_sign_change(&self) -> bool {
        self.f_low == 0.0 || self.f_high == 0.0 || opposite_signs(self.f_low, self.f_high)
    }
}

/// `true` when `a` and `b` are non-zero with different signs
pub(crate) fn opposite_signs(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

/// Find the first sign change of `h` above `lower`
///
/// Returns the two consecutive evaluated points around the sign change, or a
/// point bracket when a probe (or `lower` itself) is an exact root.
///
/// # Example
///
/// ```rust
/// use reheat_rs::solver::bracket::find_bracket;
/// use reheat_rs::solver::BracketConfiguration;
///
/// let h = |t: f64| Ok(t - 3.7);
/// let bracket = find_bracket(&h, 1.0, &BracketConfiguration::default()).unwrap();
///
/// assert!(bracket.low <= 3.7 && 3.7 <= bracket.high);
/// ```
pub fn find_bracket<F>(h: &F, lower: f64, config: &BracketConfiguration) -> Result<Bracket, SolverError>
where
    F: Fn(f64) -> Result<f64, NumericError> + ?Sized,
{
    let f_lower = h(lower)?;
    if f_lower == 0.0 {
        return Ok(Bracket::point(lower));
    }

    let scale = if lower != 0.0 { lower.abs() } else { 1.0 };
    let limit = lower + config.max_span * scale;
    let mut step = config.initial_step * scale;
    let (mut previous, mut f_previous) = (lower, f_lower);

    for attempt in 0..config.max_attempts {
        let probe = lower + step;
        if probe > limit || !probe.is_finite() {
            return Err(SolverError::BracketNotFound {
                lower,
                attempts: attempt,
                last_probe: previous,
            });
        }

        let f_probe = h(probe)?;
        if f_probe == 0.0 {
            return Ok(Bracket::point(probe));
        }
        if opposite_signs(f_previous, f_probe) {
            log::trace!("Bracket [{:e}, {:e}] found after {} probes", previous, probe, attempt + 1);
            return Ok(Bracket::new(previous, f_previous, probe, f_probe));
        }

        previous = probe;
        f_previous = f_probe;
        step *= config.growth_factor;
    }

    Err(SolverError::BracketNotFound {
        lower,
        attempts: config.max_attempts,
        last_probe: previous,
    })
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_endpoints() {
        let bracket = Bracket::new(3.0, -1.0, 1.0, 2.0);

        assert_eq!(bracket.low, 1.0);
        assert_eq!(bracket.f_low, 2.0);
        assert_eq!(bracket.high, 3.0);
        assert_eq!(bracket.f_high, -1.0);
        assert_eq!(bracket.width(), 2.0);
        assert_eq!(bracket.midpoint(), 2.0);
    }

    #[test]
    fn test_sign_change_without_underflow() {
        // The product of these values underflows to -0.0
        let bracket = Bracket::new(1.0, 1e-200, 2.0, -1e-200);
        assert!(bracket.has_sign_change());

        let same = Bracket::new(1.0, 1e-200, 2.0, 1e-200);
        assert!(!same.has_sign_change());
    }

    #[test]
    fn test_consecutive_probes_bracket_the_root() {
        let h = |t: f64| Ok(t - 3.7);
        let bracket = find_bracket(&h, 1.0, &BracketConfiguration::default()).unwrap();

        assert!(bracket.f_low < 0.0 && bracket.f_high > 0.0);
        // Steps double, so the bracket is at most as wide as the distance walked
        assert!(bracket.width() <= bracket.high - 1.0);
    }

    #[test]
    fn test_root_at_lower_limit() {
        let h = |t: f64| Ok(t - 2.0);
        let bracket = find_bracket(&h, 2.0, &BracketConfiguration::default()).unwrap();

        assert!(bracket.is_point());
        assert_eq!(bracket.low, 2.0);
    }

    #[test]
    fn test_exact_root_at_probe() {
        // First probe is 1 + 0.5 with initial_step = 0.5
        let config = BracketConfiguration { initial_step: 0.5, ..Default::default() };
        let h = |t: f64| Ok(t - 1.5);

        let bracket = find_bracket(&h, 1.0, &config).unwrap();
        assert_eq!(bracket, Bracket::point(1.5));
    }

    #[test]
    fn test_scale_invariance() {
        let config = BracketConfiguration::default();
        let h = |t: f64| Ok(t - 3.7e-32);

        let bracket = find_bracket(&h, 1e-32, &config).unwrap();
        assert!(bracket.low <= 3.7e-32 && 3.7e-32 <= bracket.high);
    }

    #[test]
    fn test_no_root_exhausts_span() {
        let h = |t: f64| Ok(1.0 + t * t);
        let error = find_bracket(&h, 1.0, &BracketConfiguration::default()).unwrap_err();

        match error {
            SolverError::BracketNotFound { lower, attempts, last_probe } => {
                assert_eq!(lower, 1.0);
                assert!(attempts > 0);
                assert!(last_probe > 1.0 && last_probe <= 1.0 + 1e16);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_no_root_exhausts_attempts() {
        let config = BracketConfiguration { max_attempts: 5, ..Default::default() };
        let h = |_t: f64| Ok(1.0);

        let error = find_bracket(&h, 1.0, &config).unwrap_err();
        assert!(matches!(error, SolverError::BracketNotFound { attempts: 5, .. }));
    }

    #[test]
    fn test_evaluation_error_propagates() {
        let h = |t: f64| if t > 2.0 { Err(NumericError::new(t, "overflow")) } else { Ok(1.0) };

        let error = find_bracket(&h, 1.0, &BracketConfiguration::default()).unwrap_err();
        assert!(matches!(error, SolverError::NumericDomain(_)));
    }
}
