//! Gamma function family: Γ, ln|Γ|, 1/Γ, ψ, and the regularized
//! incomplete gamma functions.
//!
//! Positive arguments go through Stirling's formula (shifted upward below
//! 10); negative arguments use the reflection formula with `sinpi`, which
//! is exact at the poles.

use crate::algo::constants::{LN_2PI, PI};
use crate::algo::gamln::{gamln, stirling_series};
use crate::algo::igam;
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, SpecialError};
use crate::utils::{cospi, is_nonpositive_integer, sinpi};

/// Arguments at or above this use Stirling's formula directly.
const STIRLING_MIN: f64 = 10.0;

/// B_{2k} / (2k) for the asymptotic expansion of ψ.
const PSI_ASYMPTOTIC: [f64; 7] = [
    1.0 / 12.0,
    -1.0 / 120.0,
    1.0 / 252.0,
    -1.0 / 240.0,
    1.0 / 132.0,
    -691.0 / 32760.0,
    1.0 / 12.0,
];

// ── Kernels shared with other evaluators ──

/// Γ(x) for x > 0. Overflows to +∞ without reporting.
pub(crate) fn gamma_positive<T: SpecialFloat>(x: T) -> T {
    let one = T::one();
    if x.is_nan() {
        return x;
    }
    if x <= T::from_f64(30.0) && x.floor() == x {
        let mut r = one;
        let mut k = T::from_f64(2.0);
        while k < x {
            r = r * k;
            k = k + one;
        }
        return r;
    }

    let mut z = x;
    let mut divisor = one;
    while z < T::from_f64(STIRLING_MIN) {
        divisor = divisor * z;
        z = z + one;
    }

    // √(2π) z^{z-1/2} e^{-z} exp(S(z)), with z^{z-1/2} split in halves so
    // the power does not overflow before the exponential is divided out
    let half = T::from_f64(0.5);
    let v = z.powf(half * z - T::from_f64(0.25));
    let body = v * (v / z.exp());
    let g = (half * T::from_f64(LN_2PI)).exp() * body * stirling_series(z).exp();
    if g.is_nan() {
        // both halves overflowed
        return T::infinity();
    }
    g / divisor
}

/// Γ(x) for any real x; NaN at the poles.
pub(crate) fn gamma_value<T: SpecialFloat>(x: T) -> T {
    if x > T::zero() {
        return gamma_positive(x);
    }
    if is_nonpositive_integer(x) {
        return T::nan();
    }
    T::from_f64(PI) / (sinpi(x) * gamma_positive(T::one() - x))
}

/// 1/Γ(x) for any real x; zero at the poles.
pub(crate) fn rgamma_value<T: SpecialFloat>(x: T) -> T {
    let one = T::one();
    if x.is_nan() {
        return x;
    }
    if is_nonpositive_integer(x) {
        return T::zero();
    }
    if x > T::zero() {
        let g = gamma_positive(x);
        if g.is_finite() {
            return one / g;
        }
        return match gamln(x) {
            Ok(l) => (-l).exp(),
            Err(_) => T::nan(),
        };
    }
    sinpi(x) * gamma_positive(one - x) / T::from_f64(PI)
}

/// ψ(x) for any real x; NaN at the poles.
pub(crate) fn psi_value<T: SpecialFloat>(x: T) -> T {
    let one = T::one();
    if x.is_nan() {
        return x;
    }
    if is_nonpositive_integer(x) {
        return T::nan();
    }
    if x < T::zero() {
        // ψ(x) = ψ(1-x) - π cot(πx)
        let pi = T::from_f64(PI);
        return psi_value(one - x) - pi * cospi(x) / sinpi(x);
    }

    let mut r = T::zero();
    let mut z = x;
    while z < T::from_f64(STIRLING_MIN) {
        r = r - one / z;
        z = z + one;
    }
    let w = one / (z * z);
    let mut s = T::zero();
    let mut p = w;
    for b in PSI_ASYMPTOTIC {
        s = s + T::from_f64(b) * p;
        p = p * w;
    }
    r + z.ln() - T::from_f64(0.5) / z - s
}

// ── Public evaluators ──

/// Gamma function Γ(x).
pub fn gamma_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    if x.is_nan() || x == T::infinity() {
        return Evaluation::ok(x);
    }
    if x == T::neg_infinity() {
        return Evaluation::domain("gamma", "x = -inf");
    }
    if is_nonpositive_integer(x) {
        return Evaluation::with_error(
            T::infinity(),
            SpecialError::new("gamma", ErrorKind::Singular),
        );
    }
    let g = gamma_value(x);
    if g.is_infinite() {
        return Evaluation::with_error(g, SpecialError::new("gamma", ErrorKind::Overflow));
    }
    Evaluation::ok(g)
}

/// Gamma function Γ(x).
pub fn gamma<T: SpecialFloat>(x: T) -> T {
    gamma_raw(x).report()
}

/// ln|Γ(x)|.
pub fn gammaln_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    if x.is_nan() || x.is_infinite() {
        return Evaluation::ok(x.abs());
    }
    if is_nonpositive_integer(x) {
        return Evaluation::with_error(
            T::infinity(),
            SpecialError::new("gammaln", ErrorKind::Singular),
        );
    }
    let one = T::one();
    let r = if x > T::zero() {
        gamln(x)
    } else {
        // ln|Γ(x)| = ln π - ln|sin πx| - ln Γ(1-x)
        gamln(one - x).map(|l| T::from_f64(PI).ln() - sinpi(x).abs().ln() - l)
    };
    Evaluation::from_result("gammaln", r)
}

/// ln|Γ(x)|.
pub fn gammaln<T: SpecialFloat>(x: T) -> T {
    gammaln_raw(x).report()
}

/// Reciprocal gamma function 1/Γ(x), entire, zero at the poles of Γ.
pub fn rgamma<T: SpecialFloat>(x: T) -> T {
    rgamma_value(x)
}

/// Digamma function ψ(x) = Γ'(x)/Γ(x).
pub fn digamma_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    if x == T::zero() {
        let v = if x.is_sign_negative() {
            T::infinity()
        } else {
            T::neg_infinity()
        };
        return Evaluation::with_error(v, SpecialError::new("digamma", ErrorKind::Singular));
    }
    if is_nonpositive_integer(x) {
        return Evaluation::failed("digamma", ErrorKind::Singular);
    }
    if x == T::infinity() {
        return Evaluation::ok(x);
    }
    if x == T::neg_infinity() {
        return Evaluation::domain("digamma", "x = -inf");
    }
    Evaluation::ok(psi_value(x))
}

/// Digamma function ψ(x) = Γ'(x)/Γ(x).
pub fn digamma<T: SpecialFloat>(x: T) -> T {
    digamma_raw(x).report()
}

fn check_incomplete<T: SpecialFloat>(
    function: &'static str,
    a: T,
    x: T,
) -> Option<Evaluation<T>> {
    if a.is_nan() || x.is_nan() {
        return Some(Evaluation::ok(T::nan()));
    }
    if a < T::zero() || x < T::zero() {
        return Some(Evaluation::domain(function, "requires a >= 0 and x >= 0"));
    }
    if a == T::zero() && x == T::zero() {
        return Some(Evaluation::domain(function, "a and x both zero"));
    }
    None
}

/// Regularized lower incomplete gamma function P(a, x).
pub fn gammainc_raw<T: SpecialFloat>(a: T, x: T) -> Evaluation<T> {
    if let Some(ev) = check_incomplete("gammainc", a, x) {
        return ev;
    }
    if a == T::zero() || x.is_infinite() {
        return Evaluation::ok(T::one());
    }
    if a.is_infinite() {
        return Evaluation::ok(T::zero());
    }
    Evaluation::from_result("gammainc", igam::igam(a, x))
}

/// Regularized lower incomplete gamma function P(a, x).
pub fn gammainc<T: SpecialFloat>(a: T, x: T) -> T {
    gammainc_raw(a, x).report()
}

/// Regularized upper incomplete gamma function Q(a, x) = 1 - P(a, x).
pub fn gammaincc_raw<T: SpecialFloat>(a: T, x: T) -> Evaluation<T> {
    if let Some(ev) = check_incomplete("gammaincc", a, x) {
        return ev;
    }
    if a == T::zero() || x.is_infinite() {
        return Evaluation::ok(T::zero());
    }
    if a.is_infinite() {
        return Evaluation::ok(T::one());
    }
    Evaluation::from_result("gammaincc", igam::igamc(a, x))
}

/// Regularized upper incomplete gamma function Q(a, x) = 1 - P(a, x).
pub fn gammaincc<T: SpecialFloat>(a: T, x: T) -> T {
    gammaincc_raw(a, x).report()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn gamma_integers_are_exact() {
        assert_eq!(gamma(1.0_f64), 1.0);
        assert_eq!(gamma(5.0_f64), 24.0);
        assert_eq!(gamma(21.0_f64), 2432902008176640000.0);
    }

    #[test]
    fn gamma_reference() {
        // mpmath gamma
        assert!(rel(gamma(0.5_f64), 1.7724538509055160273) < 1e-15);
        assert!(rel(gamma(3.7_f64), 4.170651783796604) < 1e-14);
        assert!(rel(gamma(-2.5_f64), -0.94530872048294188123) < 1e-14);
        assert!(rel(gamma(150.5_f64), 4.6610726270973779e261) < 1e-13);
        assert!(rel(gamma(1e-5_f64), 99999.422794225559) < 1e-14);
    }

    #[test]
    fn gamma_poles_and_overflow() {
        let ev = gamma_raw(-3.0_f64);
        assert_eq!(ev.kind(), Some(ErrorKind::Singular));
        let ev = gamma_raw(200.0_f64);
        assert!(ev.value.is_infinite());
        assert_eq!(ev.kind(), Some(ErrorKind::Overflow));
        // Γ(30) fits in f32 even though 30^29.5 does not
        assert!(rel(gamma(30.0_f32) as f64, 8.841761993739701e30) < 1e-6);
        assert!(rel(gamma(30.5_f32) as f64, 4.8226969334909086e31) < 1e-5);
    }

    #[test]
    fn gammaln_both_sides() {
        assert!(rel(gammaln(0.5_f64), 0.57236494292470008707) < 1e-15);
        assert!(rel(gammaln(-2.5_f64), -0.056243716497674054) < 1e-13);
        assert!(rel(gammaln(1000.0_f64), 5905.2204232091812) < 1e-15);
        assert_eq!(gammaln(-1.0_f64), f64::INFINITY);
    }

    #[test]
    fn rgamma_is_entire() {
        assert_eq!(rgamma(0.0_f64), 0.0);
        assert_eq!(rgamma(-4.0_f64), 0.0);
        assert!(rel(rgamma(-2.5_f64), -1.0578554691520430) < 1e-14);
        assert!(rgamma(300.0_f64) >= 0.0);
    }

    #[test]
    fn digamma_reference() {
        // ψ(1) = -γ
        assert!(rel(digamma(1.0_f64), -0.57721566490153286061) < 1e-15);
        assert!(rel(digamma(0.1_f64), -10.423754940411076795) < 1e-14);
        assert!(rel(digamma(-0.5_f64), 0.03648997397857652056) < 1e-13);
        assert!(rel(digamma(30.0_f64), 3.3844381326855249) < 1e-15);
        assert_eq!(digamma_raw(-2.0_f64).kind(), Some(ErrorKind::Singular));
        assert_eq!(digamma(0.0_f64), f64::NEG_INFINITY);
    }

    #[test]
    fn incomplete_gamma_edges() {
        assert_eq!(gammainc(2.0_f64, 0.0), 0.0);
        assert_eq!(gammaincc(2.0_f64, 0.0), 1.0);
        assert_eq!(gammainc(0.0_f64, 1.0), 1.0);
        assert_eq!(gammainc(2.0_f64, f64::INFINITY), 1.0);
        assert_eq!(gammainc_raw(-1.0_f64, 1.0).kind(), Some(ErrorKind::Domain));
        assert!(gammaincc(1.0_f64, -1.0).is_nan());
    }

    #[test]
    fn incomplete_gamma_complement() {
        for (a, x) in [(0.5_f64, 0.2), (3.0, 2.5), (40.0, 45.0), (0.01, 3.0)] {
            let s = gammainc(a, x) + gammaincc(a, x);
            assert!((s - 1.0).abs() < 1e-14, "a={a}, x={x}");
        }
    }
}
