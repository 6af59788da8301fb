//! Memoized energy densities
//!
//! Density evaluations are expensive (nested quadratures) and the root finders
//! revisit nearly identical times over and over. A [`MemoizedDensity`] wraps
//! one density with its own cache, keyed by a [`Quantizer`] that rounds the
//! time argument to a fixed number of significant decimal digits.
//!
//! # Ownership
//!
//! Each cache belongs to exactly one density instance of one task. Nothing is
//! shared between tasks, so the cache never needs eviction: it is dropped with
//! the task.
//!
//! # Concurrency
//!
//! The map sits behind a `Mutex`, but the lock is **never held while the
//! wrapped density runs**. Two threads racing on the same cold key both
//! evaluate; the first insertion wins and both callers return the stored
//! value, so every caller observes one value per key.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::physics::traits::{EnergyDensity, NumericError, SharedDensity};

/// Default number of significant digits kept in a cache key
pub const DEFAULT_CACHE_DIGITS: u32 = 12;

/// Largest digit count whose mantissa is still exact in an `f64`
pub const MAX_CACHE_DIGITS: u32 = 15;

// =================================================================================================
// Quantizer
// =================================================================================================

/// Quantized representation of a time value
///
/// `value ≈ mantissa × 10^(exponent - digits + 1)` where `mantissa` carries
/// exactly `digits` significant digits (or is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub mantissa: i64,
    pub exponent: i32,
}

/// Rounds times to a fixed number of significant decimal digits
///
/// # Example
///
/// ```rust
/// use reheat_rs::physics::Quantizer;
///
/// let quantizer = Quantizer::new(12).unwrap();
///
/// // Beyond the 12th significant digit, times collapse onto one key
/// let a = quantizer.quantize(1.0e-32).unwrap();
/// let b = quantizer.quantize(1.0e-32 * (1.0 + 1e-14)).unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    digits: u32,
}

impl Quantizer {
    /// Create a quantizer keeping `digits` significant digits (1..=15)
    pub fn new(digits: u32) -> Result<Self, String> {
        if digits == 0 || digits > MAX_CACHE_DIGITS {
            return Err(format!(
                "Cache digits must be between 1 and {}, got {}",
                MAX_CACHE_DIGITS, digits
            ));
        }
        Ok(Self { digits })
    }

    /// Number of significant digits kept
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Compute the cache key of `t`
    ///
    /// Zero maps to `(0, 0)`. Non-finite times are rejected.
    pub fn quantize(&self, t: f64) -> Result<CacheKey, NumericError> {
        if !t.is_finite() {
            return Err(NumericError::new(t, "cannot quantize a non-finite time"));
        }
        if t == 0.0 {
            return Ok(CacheKey { mantissa: 0, exponent: 0 });
        }

        let digits = self.digits as i32;
        let upper = 10f64.powi(digits);
        let lower = 10f64.powi(digits - 1);

        let mut exponent = t.abs().log10().floor() as i32;
        let mut mantissa = scale(t, digits - 1 - exponent).round();

        // log10 is off by one near powers of ten, and rounding can carry
        if mantissa.abs() >= upper {
            exponent += 1;
            mantissa = scale(t, digits - 1 - exponent).round();
        } else if mantissa.abs() < lower {
            exponent -= 1;
            mantissa = scale(t, digits - 1 - exponent).round();
        }

        Ok(CacheKey {
            mantissa: mantissa as i64,
            exponent,
        })
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            digits: DEFAULT_CACHE_DIGITS,
        }
    }
}

/// `t × 10^shift`, split in two factors so that subnormal and huge times
/// do not overflow the power of ten
fn scale(t: f64, shift: i32) -> f64 {
    let half = shift / 2;
    t * 10f64.powi(half) * 10f64.powi(shift - half)
}

// =================================================================================================
// Memoized Density
// =================================================================================================

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Evaluations answered from the cache
    pub hits: usize,

    /// Evaluations forwarded to the wrapped density
    pub misses: usize,

    /// Keys currently stored
    pub entries: usize,
}

/// A density wrapped with a thread-safe evaluation cache
///
/// Failed evaluations are never cached: the error propagates and the next
/// call with the same key evaluates again.
pub struct MemoizedDensity<D> {
    inner: D,
    quantizer: Quantizer,
    cache: Mutex<HashMap<CacheKey, f64>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<D: EnergyDensity> MemoizedDensity<D> {
    /// Wrap `inner` with an empty cache
    pub fn new(inner: D, quantizer: Quantizer) -> Self {
        Self {
            inner,
            quantizer,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Move into a [`SharedDensity`]
    pub fn into_shared(self) -> SharedDensity
    where
        D: 'static,
    {
        Arc::new(self)
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The quantizer used for keys
    pub fn quantizer(&self) -> Quantizer {
        self.quantizer
    }

    // A panicking evaluation elsewhere cannot leave the map half-written:
    // every mutation is a single insert, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, f64>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D: EnergyDensity> EnergyDensity for MemoizedDensity<D> {
    fn evaluate(&self, t: f64) -> Result<f64, NumericError> {
        let key = self.quantizer.quantize(t)?;

        if let Some(value) = self.lock().get(&key).copied() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = self.inner.evaluate(t)?;

        let stored = *self.lock().entry(key).or_insert(value);
        Ok(stored)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

impl<D: EnergyDensity> fmt::Debug for MemoizedDensity<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizedDensity")
            .field("name", &self.inner.name())
            .field("digits", &self.quantizer.digits())
            .field("stats", &self.stats())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
