//! Adaptive Gauss–Kronrod quadrature
//!
//! # Mathematical Background
//!
//! On each segment `[a, b]` the 15-point Kronrod rule `K15` and the embedded
//! 7-point Gauss rule `G7` are evaluated with the same 15 function calls.
//! `|K15 - G7|` estimates the error of `K15`.
//!
//! The integrator is **globally adaptive**: it keeps a list of segments,
//! repeatedly bisects the one with the largest error estimate, and stops when
//! the summed error drops below `max(absolute, relative × |integral|)`.
//!
//! # Limits
//!
//! When `max_subdivisions` is reached the current estimate is returned and a
//! warning is logged. Any non-finite integrand value aborts with
//! [`NumericError`].

use crate::physics::NumericError;

/// Kronrod abscissae on [-1, 1] (positive half, descending)
///
/// Odd indices are the 7-point Gauss nodes.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639,
    0.949_107_912_342_758_525,
    0.864_864_423_359_769_073,
    0.741_531_185_599_394_440,
    0.586_087_235_467_691_130,
    0.405_845_151_377_397_167,
    0.207_784_955_007_898_468,
    0.0,
];

/// Kronrod weights matching [`XGK`]
const WGK: [f64; 8] = [
    0.022_935_322_010_529_225,
    0.063_092_092_629_978_553,
    0.104_790_010_322_250_184,
    0.140_653_259_715_525_919,
    0.169_004_726_639_267_903,
    0.190_350_578_064_785_410,
    0.204_432_940_075_298_892,
    0.209_482_141_084_727_828,
];

/// Gauss weights, `WG[j]` belongs to `XGK[2j + 1]`
const WG: [f64; 4] = [
    0.129_484_966_168_869_693,
    0.279_705_391_489_276_668,
    0.381_830_050_505_118_945,
    0.417_959_183_673_469_388,
];

// =================================================================================================
// Configuration
// =================================================================================================

/// Tolerances of the adaptive integrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureConfiguration {
    /// Requested relative accuracy
    pub relative_tolerance: f64,

    /// Requested absolute accuracy
    pub absolute_tolerance: f64,

    /// Maximum number of segments
    pub max_subdivisions: usize,
}

impl Default for QuadratureConfiguration {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-10,
            absolute_tolerance: 0.0,
            max_subdivisions: 200,
        }
    }
}

impl QuadratureConfiguration {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.relative_tolerance >= 0.0) || !(self.absolute_tolerance >= 0.0) {
            return Err("Quadrature tolerances must be non-negative".to_string());
        }
        if self.relative_tolerance == 0.0 && self.absolute_tolerance == 0.0 {
            return Err("At least one quadrature tolerance must be positive".to_string());
        }
        if self.max_subdivisions == 0 {
            return Err("Quadrature needs at least one subdivision".to_string());
        }
        Ok(())
    }
}

// =================================================================================================
// Integration
// =================================================================================================

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Integrate `f` over `[a, b]`
///
/// `a == b` gives zero, `a > b` the negated integral over `[b, a]`.
///
/// # Example
///
/// ```rust
/// use reheat_rs::numerics::quadrature::{integrate, QuadratureConfiguration};
///
/// let config = QuadratureConfiguration::default();
/// let value = integrate(|t: f64| Ok(t.exp()), 1.0, 0.0, &config).unwrap();
/// assert!((value + (1f64.exp() - 1.0)).abs() < 1e-12);
/// ```
pub fn integrate<F>(
    mut f: F,
    a: f64,
    b: f64,
    config: &QuadratureConfiguration,
) -> Result<f64, NumericError>
where
    F: FnMut(f64) -> Result<f64, NumericError>,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(NumericError::new(
            if a.is_finite() { b } else { a },
            "integration bounds must be finite",
        ));
    }
    if a == b {
        return Ok(0.0);
    }
    if a > b {
        return integrate(f, b, a, config).map(|value| -value);
    }

    let mut segments = vec![kronrod_segment(&mut f, a, b)?];

    loop {
        let total: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();

        let target = config.absolute_tolerance.max(config.relative_tolerance * total.abs());
        if error <= target {
            return Ok(total);
        }

        if segments.len() >= config.max_subdivisions {
            log::warn!(
                "Quadrature over [{:e}, {:e}] stopped after {} subdivisions (error estimate {:e})",
                a, b, segments.len(), error
            );
            return Ok(total);
        }

        // Bisect the segment with the largest error
        let worst = segments
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.error.total_cmp(&y.error))
            .map(|(index, _)| index)
            .unwrap_or(0);
        let segment = segments.swap_remove(worst);
        let middle = 0.5 * (segment.a + segment.b);

        // Segment too narrow to split any further in f64
        if middle <= segment.a || middle >= segment.b {
            segments.push(segment);
            log::warn!(
                "Quadrature over [{:e}, {:e}] reached machine resolution (error estimate {:e})",
                a, b, error
            );
            return Ok(segments.iter().map(|s| s.value).sum());
        }

        segments.push(kronrod_segment(&mut f, segment.a, middle)?);
        segments.push(kronrod_segment(&mut f, middle, segment.b)?);
    }
}

/// One 15-point Kronrod evaluation with its Gauss error estimate
fn kronrod_segment<F>(f: &mut F, a: f64, b: f64) -> Result<Segment, NumericError>
where
    F: FnMut(f64) -> Result<f64, NumericError>,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let mut evaluate = |t: f64| -> Result<f64, NumericError> {
        let value = f(t)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NumericError::non_finite(t, value))
        }
    };

    let f_center = evaluate(center)?;
    let mut kronrod = WGK[7] * f_center;
    let mut gauss = WG[3] * f_center;

    for j in 0..7 {
        let offset = half * XGK[j];
        let pair = evaluate(center - offset)? + evaluate(center + offset)?;
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok(Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_integrate_constant_exactly() {
        let kronrod: f64 = WGK[7] + 2.0 * WGK[..7].iter().sum::<f64>();
        let gauss: f64 = WG[3] + 2.0 * (WG[0] + WG[1] + WG[2]);

        assert_relative_eq!(kronrod, 2.0, epsilon = 1e-15);
        assert_relative_eq!(gauss, 2.0, epsilon = 1e-15);
    }

    #[test]
    fn test_polynomial_is_exact() {
        let value = integrate(|t| Ok(t.powi(5) - 3.0 * t), -1.0, 2.0, &Default::default()).unwrap();
        // [t^6/6 - 3t^2/2] from -1 to 2 = (64/6 - 6) - (1/6 - 3/2)
        assert_relative_eq!(value, 63.0 / 6.0 - 4.5, max_relative = 1e-13);
    }

    #[test]
    fn test_empty_and_reversed_interval() {
        let config = QuadratureConfiguration::default();

        assert_eq!(integrate(|t| Ok(t), 2.0, 2.0, &config).unwrap(), 0.0);

        let forward = integrate(|t: f64| Ok(t.sin()), 0.0, 1.0, &config).unwrap();
        let backward = integrate(|t: f64| Ok(t.sin()), 1.0, 0.0, &config).unwrap();
        assert_relative_eq!(forward, -backward);
    }

    #[test]
    fn test_adaptive_on_wide_decaying_range() {
        // ∫_1^1e6 dt / t^2 = 1 - 1e-6
        let value = integrate(|t| Ok(1.0 / (t * t)), 1.0, 1e6, &Default::default()).unwrap();
        assert_relative_eq!(value, 1.0 - 1e-6, max_relative = 1e-9);
    }

    #[test]
    fn test_integrable_peak() {
        // ∫_0^1 sqrt(t) dt = 2/3 (singular derivative at 0)
        let value = integrate(|t: f64| Ok(t.sqrt()), 0.0, 1.0, &Default::default()).unwrap();
        assert_relative_eq!(value, 2.0 / 3.0, max_relative = 1e-9);
    }

    #[test]
    fn test_integrand_error_propagates() {
        let result = integrate(
            |t| if t > 0.5 { Err(NumericError::new(t, "out of domain")) } else { Ok(1.0) },
            0.0,
            1.0,
            &Default::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_integrand_is_rejected() {
        let result = integrate(|t| Ok(1.0 / (t - t)), 0.0, 1.0, &Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_configuration_validation() {
        assert!(QuadratureConfiguration::default().validate().is_ok());

        let zero = QuadratureConfiguration {
            relative_tolerance: 0.0,
            absolute_tolerance: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let nan = QuadratureConfiguration {
            relative_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }
}
