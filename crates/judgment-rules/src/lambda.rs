//! λ as an exact rational.
//!
//! Product rules substitute λ for zero agreement. Comparing products of
//! floats would break exact ties, so λ is converted once to the closest
//! fraction `p/q` with `q ≤ 10⁶` and products are compared as integers:
//! every factor is scaled by `q`, a zero agreement contributes `p`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Largest denominator used when approximating λ.
pub const MAX_DENOMINATOR: u128 = 1_000_000;

/// Values below this are closer to 0 than to `1/MAX_DENOMINATOR`.
const NEGLIGIBLE: f64 = 1.0 / (1u64 << 60) as f64;

/// Upper bound keeping `p` within `u64` for any admissible denominator.
const MAX_VALUE: f64 = (1u64 << 40) as f64;

/// A non-negative λ together with its rational approximation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    value: f64,
    numerator: u64,
    denominator: u64,
}

impl Lambda {
    /// Validates `value` and computes its rational form.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidLambda`] for NaN, infinite, negative or
    /// absurdly large values.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 || value > MAX_VALUE {
            return Err(SolverError::InvalidLambda(value));
        }
        let (numerator, denominator) = limit_denominator(value, MAX_DENOMINATOR);
        Ok(Self {
            value,
            numerator: numerator as u64,
            denominator: denominator as u64,
        })
    }

    /// λ = 0.
    pub const fn zero() -> Self {
        Self {
            value: 0.0,
            numerator: 0,
            denominator: 1,
        }
    }

    /// Rebuilds λ from an encoded fraction.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidLambda`] for a zero denominator.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Result<Self> {
        if denominator == 0 {
            return Err(SolverError::InvalidLambda(f64::NAN));
        }
        Ok(Self {
            value: numerator as f64 / denominator as f64,
            numerator,
            denominator,
        })
    }

    /// The value as given.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Numerator `p` of the approximation.
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Denominator `q` of the approximation.
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Returns true if the approximation is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }
}

impl Default for Lambda {
    fn default() -> Self {
        Self::zero()
    }
}

/// Closest fraction to `value` with denominator at most `max_denominator`.
///
/// Works on the exact binary value of the float and walks its continued
/// fraction, picking between the last convergent and the best semiconvergent.
fn limit_denominator(value: f64, max_denominator: u128) -> (u128, u128) {
    if value < NEGLIGIBLE {
        return (0, 1);
    }
    let (n, d) = exact_ratio(value);
    if d <= max_denominator {
        return (n, d);
    }

    let (mut p0, mut q0, mut p1, mut q1) = (0u128, 1u128, 1u128, 0u128);
    let (mut n, mut d) = (n, d);
    let denominator = d;
    loop {
        let a = n / d;
        let q2 = match a.checked_mul(q1).and_then(|x| x.checked_add(q0)) {
            Some(q2) if q2 <= max_denominator => q2,
            _ => break,
        };
        (p0, q0, p1, q1) = (p1, q1, p0 + a * p1, q2);
        (n, d) = (d, n - a * d);
    }
    let k = (max_denominator - q0) / q1;
    // Compare 2·d·(q0 + k·q1) with the original denominator without overflow.
    let bound = q0 + k * q1;
    let convergent_wins = match d.checked_mul(2).and_then(|x| x.checked_mul(bound)) {
        Some(lhs) => lhs <= denominator,
        None => false,
    };
    if convergent_wins {
        (p1, q1)
    } else {
        (p0 + k * p1, bound)
    }
}

/// Exact `n/d` in lowest terms for a positive finite float in range.
fn exact_ratio(value: f64) -> (u128, u128) {
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut shift) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    };
    while mantissa % 2 == 0 && shift < 0 {
        mantissa /= 2;
        shift += 1;
    }
    if shift >= 0 {
        ((mantissa as u128) << shift, 1)
    } else {
        (mantissa as u128, 1u128 << (-shift))
    }
}
