//! Exact rational phases.
//!
//! A [`Phase`] is a rational number `p/q` read as `p/q · π`, kept in the
//! canonical half-open interval `(-1, 1]` (i.e. modulo 2π). All spider
//! phases in the engine go through this type, so rewrite rules never see an
//! un-normalized value and equality is exact.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use num_rational::Rational64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

/// A rational multiple of π, normalized into `(-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phase(Rational64);

impl Phase {
    /// The zero phase.
    pub fn zero() -> Self {
        Phase(Rational64::zero())
    }

    /// The π phase.
    pub fn pi() -> Self {
        Phase(Rational64::from_integer(1))
    }

    /// Construct `n/d · π`.
    ///
    /// # Panics
    ///
    /// Panics if `d == 0`.
    pub fn new(n: i64, d: i64) -> Self {
        let mut p = Phase(Rational64::new(n, d));
        p.normalize();
        p
    }

    /// Construct from a raw rational, normalizing.
    pub fn from_rational(r: Rational64) -> Self {
        let mut p = Phase(r);
        p.normalize();
        p
    }

    /// Approximate an angle in radians by a rational multiple of π.
    ///
    /// Runs a Stern–Brocot mediant search between 0 and 1 on the fractional
    /// part until the candidate lands within `eps` radians of `theta`.
    pub fn from_radians(theta: f64, eps: f64) -> Self {
        let f = theta / std::f64::consts::PI;
        let eps = (eps / std::f64::consts::PI).abs();
        Self::from_rational(approximate(f, eps))
    }

    /// The underlying rational (multiple of π).
    pub fn rational(&self) -> Rational64 {
        self.0
    }

    /// Numerator of the canonical form.
    pub fn numerator(&self) -> i64 {
        *self.0.numer()
    }

    /// Denominator of the canonical form (always positive).
    pub fn denominator(&self) -> i64 {
        *self.0.denom()
    }

    /// The angle in radians.
    pub fn to_radians(&self) -> f64 {
        std::f64::consts::PI * (*self.0.numer() as f64) / (*self.0.denom() as f64)
    }

    /// True for the zero phase.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for multiples of π (phase 0 or π).
    pub fn is_pauli(&self) -> bool {
        self.denominator() == 1
    }

    /// True for ±π/2 exactly.
    pub fn is_proper_clifford(&self) -> bool {
        self.denominator() == 2
    }

    /// True when the phase has denominator 1 or 2 (a Clifford angle).
    pub fn is_clifford(&self) -> bool {
        self.denominator() <= 2
    }

    /// True when the phase has denominator 4 (a T-like angle).
    pub fn is_t_like(&self) -> bool {
        self.denominator() == 4
    }

    /// ASCII rendering for file formats: `0`, `pi`, `pi/2`, `-3*pi/4`.
    pub fn ascii(&self) -> String {
        let n = self.numerator();
        let d = self.denominator();
        if n == 0 {
            return "0".to_string();
        }
        let mut s = String::new();
        if n == -1 {
            s.push('-');
        } else if n != 1 {
            s.push_str(&format!("{n}*"));
        }
        s.push_str("pi");
        if d != 1 {
            s.push_str(&format!("/{d}"));
        }
        s
    }

    /// Parse the ASCII rendering produced by [`Phase::ascii`].
    pub fn parse_ascii(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == "0" {
            return Some(Phase::zero());
        }
        let (neg, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (numer, rest) = match s.split_once("*pi") {
            Some((n, rest)) => (n.parse::<i64>().ok()?, rest),
            None => (1, s.strip_prefix("pi")?),
        };
        let denom = match rest.strip_prefix('/') {
            Some(d) => d.parse::<i64>().ok()?,
            None if rest.is_empty() => 1,
            None => return None,
        };
        if denom == 0 {
            return None;
        }
        Some(Phase::new(if neg { -numer } else { numer }, denom))
    }

    /// Fold into `(-1, 1]`.
    fn normalize(&mut self) {
        let two = Rational64::from_integer(2);
        let mut r = self.0 % two;
        if r > Rational64::from_integer(1) {
            r -= two;
        } else if r <= Rational64::from_integer(-1) {
            r += two;
        }
        self.0 = r;
    }
}

/// Stern–Brocot mediant search for the fractional part of `f`.
fn approximate(f: f64, eps: f64) -> Rational64 {
    let integral = f.floor() as i64;
    let frac = f - f.floor();

    let mut lower = Rational64::new(0, 1);
    let mut upper = Rational64::new(1, 1);
    let to_f = |r: &Rational64| (*r.numer() as f64) / (*r.denom() as f64);

    if (to_f(&lower) - frac).abs() <= eps {
        return lower + integral;
    }
    if (to_f(&upper) - frac).abs() <= eps {
        return upper + integral;
    }

    loop {
        // Mediant of the current bracket, not the midpoint: this walks the
        // Stern-Brocot tree and lands on the smallest-denominator answer.
        let med = Rational64::new(
            lower.numer() + upper.numer(),
            lower.denom() + upper.denom(),
        );
        let mf = to_f(&med);
        if mf + eps < frac {
            lower = med;
        } else if mf - eps > frac {
            upper = med;
        } else {
            return med + integral;
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::zero()
    }
}

impl Neg for Phase {
    type Output = Phase;
    fn neg(self) -> Phase {
        Phase::from_rational(-self.0)
    }
}

impl Add for Phase {
    type Output = Phase;
    fn add(self, rhs: Phase) -> Phase {
        Phase::from_rational(self.0 + rhs.0)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, rhs: Phase) {
        *self = *self + rhs;
    }
}

impl Sub for Phase {
    type Output = Phase;
    fn sub(self, rhs: Phase) -> Phase {
        Phase::from_rational(self.0 - rhs.0)
    }
}

impl SubAssign for Phase {
    fn sub_assign(&mut self, rhs: Phase) {
        *self = *self - rhs;
    }
}

impl Mul<i64> for Phase {
    type Output = Phase;
    fn mul(self, rhs: i64) -> Phase {
        Phase::from_rational(self.0 * Rational64::from_integer(rhs))
    }
}

impl Div<i64> for Phase {
    type Output = Phase;
    fn div(self, rhs: i64) -> Phase {
        Phase::from_rational(self.0 / Rational64::from_integer(rhs))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ascii().replace("pi", "π"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalization_folds_into_half_open_interval() {
        assert_eq!(Phase::new(3, 2), Phase::new(-1, 2));
        assert_eq!(Phase::new(2, 1), Phase::zero());
        assert_eq!(Phase::new(-1, 1), Phase::pi());
        assert_eq!(Phase::new(5, 4), Phase::new(-3, 4));
        assert_eq!(Phase::new(1, 1), Phase::pi());
    }

    #[test]
    fn test_arithmetic_is_mod_two_pi() {
        assert_eq!(Phase::pi() + Phase::pi(), Phase::zero());
        assert_eq!(Phase::new(1, 2) + Phase::new(1, 2), Phase::pi());
        assert_eq!(Phase::new(1, 4) - Phase::new(1, 2), Phase::new(-1, 4));
        assert_eq!(-Phase::new(1, 2), Phase::new(-1, 2));
        // -π normalizes to π, so negation fixes π.
        assert_eq!(-Phase::pi(), Phase::pi());
        assert_eq!(Phase::new(1, 4) * 2, Phase::new(1, 2));
        assert_eq!(Phase::pi() / 4, Phase::new(1, 4));
    }

    #[test]
    fn test_classification() {
        assert!(Phase::zero().is_pauli());
        assert!(Phase::pi().is_pauli());
        assert!(Phase::new(1, 2).is_proper_clifford());
        assert!(Phase::new(-1, 2).is_proper_clifford());
        assert!(Phase::new(1, 2).is_clifford());
        assert!(!Phase::new(1, 4).is_clifford());
        assert!(Phase::new(1, 4).is_t_like());
        assert!(Phase::new(3, 4).is_t_like());
        assert!(!Phase::new(1, 8).is_t_like());
    }

    #[test]
    fn test_from_radians_finds_small_denominators() {
        let quarter = Phase::from_radians(std::f64::consts::FRAC_PI_4, 1e-6);
        assert_eq!(quarter, Phase::new(1, 4));
        let half = Phase::from_radians(std::f64::consts::FRAC_PI_2, 1e-6);
        assert_eq!(half, Phase::new(1, 2));
        let full = Phase::from_radians(2.0 * std::f64::consts::PI, 1e-6);
        assert_eq!(full, Phase::zero());
        let neg = Phase::from_radians(-std::f64::consts::FRAC_PI_2, 1e-6);
        assert_eq!(neg, Phase::new(-1, 2));
    }

    #[test]
    fn test_ascii_round_trip() {
        for p in [
            Phase::zero(),
            Phase::pi(),
            Phase::new(1, 2),
            Phase::new(-1, 2),
            Phase::new(3, 4),
            Phase::new(-3, 4),
            Phase::new(1, 8),
        ] {
            assert_eq!(Phase::parse_ascii(&p.ascii()), Some(p));
        }
        assert_eq!(Phase::parse_ascii("pi/2"), Some(Phase::new(1, 2)));
        assert_eq!(Phase::parse_ascii("garbage"), None);
    }

    proptest! {
        #[test]
        fn prop_normal_form_in_interval(n in -100i64..100, d in 1i64..40) {
            let p = Phase::new(n, d);
            let r = p.rational();
            prop_assert!(r > Rational64::from_integer(-1));
            prop_assert!(r <= Rational64::from_integer(1));
        }

        #[test]
        fn prop_add_neg_cancels(n in -100i64..100, d in 1i64..40) {
            let p = Phase::new(n, d);
            prop_assert_eq!(p + (-p), Phase::zero());
        }

        #[test]
        fn prop_denominator_positive(n in -100i64..100, d in 1i64..40) {
            prop_assert!(Phase::new(n, d).denominator() > 0);
        }
    }
}
