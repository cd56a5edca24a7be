//! Global scalar bookkeeping.
//!
//! Rewrites that change the tensor norm (Hopf cancellations, state copies,
//! local complementations, ...) fold their normalization constants into a
//! scalar carried by the graph. The scalar is kept as a complex coefficient
//! times an exact power of √2, so the common ±k/2 exponents introduced by
//! rewrite rules never lose precision.

use std::fmt;

use num_complex::Complex64;

use crate::phase::Phase;

/// A complex number of the form `coeff · (√2)^pow`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    coeff: Complex64,
    rt2_pow: i32,
}

impl Scalar {
    /// The multiplicative identity.
    pub fn one() -> Self {
        Scalar {
            coeff: Complex64::new(1.0, 0.0),
            rt2_pow: 0,
        }
    }

    /// True when this scalar is exactly 1.
    pub fn is_one(&self) -> bool {
        self.rt2_pow == 0 && self.coeff == Complex64::new(1.0, 0.0)
    }

    /// Multiply by `e^(iφ)` for a rational phase φ.
    pub fn mul_phase(&mut self, phase: Phase) {
        self.coeff *= Complex64::from_polar(1.0, phase.to_radians());
    }

    /// Multiply by `(√2)^k` (negative `k` divides).
    pub fn mul_rt2_pow(&mut self, k: i32) {
        self.rt2_pow += k;
    }

    /// Multiply by an arbitrary complex factor.
    pub fn mul_complex(&mut self, z: Complex64) {
        self.coeff *= z;
    }

    /// Complex conjugate (used by `adjoint`).
    pub fn conjugate(&mut self) {
        self.coeff = self.coeff.conj();
    }

    /// Materialize as a complex number.
    pub fn to_complex(&self) -> Complex64 {
        self.coeff * Complex64::new(2f64.powf(self.rt2_pow as f64 / 2.0), 0.0)
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::one()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rt2_pow == 0 {
            write!(f, "{}", self.coeff)
        } else {
            write!(f, "{} * rt2^{}", self.coeff, self.rt2_pow)
        }
    }
}
