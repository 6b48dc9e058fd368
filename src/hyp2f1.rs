//! Gauss hypergeometric function 2F1(a, b; c; z).
//!
//! Degenerate parameter combinations are resolved first (terminating
//! series, poles of c, z = 0 and z = 1, closed forms). The rest go to the
//! transformation whose series variable is smallest in modulus, see
//! [`classify_hyp2f1`].

use num_complex::Complex;

use crate::algo::hypser;
use crate::gamma::{gamma_value, rgamma_value};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, SpecialError};
use crate::utils::is_nonpositive_integer;

/// Transformation used to evaluate 2F1 away from its special cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hyp2f1Regime {
    /// Power series in `z`.
    Maclaurin,
    /// Power series in `z/(z - 1)`.
    Pfaff,
    /// Connection formula in `1 - z`.
    OneMinusZ,
    /// Connection formula in `1/z`.
    OneOverZ,
    /// Pfaff, then the `1 - z` connection: series in `1/(1 - z)`.
    PfaffOneMinusZ,
    /// Pfaff, then the `1/z` connection: series in `1 - 1/z`.
    PfaffOneOverZ,
    /// López–Temme expansion in `z/(z - 2)`.
    LopezTemme,
}

/// Largest series variable accepted before falling back to López–Temme.
const REGIME_LIMIT: f64 = 0.75;

/// Pick the regime whose series variable has the smallest modulus.
///
/// Near `e^{±iπ/3}` every candidate is at least 1 in modulus and
/// [`Hyp2f1Regime::LopezTemme`] is used instead.
pub fn classify_hyp2f1<T: SpecialFloat>(z: Complex<T>) -> Hyp2f1Regime {
    let one = Complex::new(T::one(), T::zero());
    let candidates = [
        (z.norm(), Hyp2f1Regime::Maclaurin),
        ((z / (z - one)).norm(), Hyp2f1Regime::Pfaff),
        ((one - z).norm(), Hyp2f1Regime::OneMinusZ),
        (T::one() / z.norm(), Hyp2f1Regime::OneOverZ),
        (T::one() / (one - z).norm(), Hyp2f1Regime::PfaffOneMinusZ),
        ((one - one / z).norm(), Hyp2f1Regime::PfaffOneOverZ),
    ];
    let mut best = (T::infinity(), Hyp2f1Regime::LopezTemme);
    for (d, regime) in candidates {
        if d < best.0 {
            best = (d, regime);
        }
    }
    if best.0 > T::from_f64(REGIME_LIMIT) {
        Hyp2f1Regime::LopezTemme
    } else {
        best.1
    }
}

fn terminates<T: SpecialFloat>(a: T, b: T) -> bool {
    is_nonpositive_integer(a) && (!is_nonpositive_integer(b) || a >= b)
}

fn evaluate<T: SpecialFloat>(
    function: &'static str,
    a: T,
    b: T,
    c: T,
    z: Complex<T>,
) -> Evaluation<Complex<T>> {
    let zero = T::zero();
    let one = T::one();
    let real = |x: T| Complex::new(x, zero);

    if a.is_nan() || b.is_nan() || c.is_nan() || z.re.is_nan() || z.im.is_nan() {
        return Evaluation::ok(real(T::nan()));
    }
    if !z.re.is_finite() || !z.im.is_finite() {
        return Evaluation::domain(function, "z must be finite");
    }
    if a == zero || b == zero {
        return Evaluation::ok(real(one));
    }
    if is_nonpositive_integer(c) {
        let cancelled = (is_nonpositive_integer(a) && a >= c) || (is_nonpositive_integer(b) && b >= c);
        if !cancelled {
            return Evaluation::with_error(
                real(T::infinity()),
                SpecialError::new(function, ErrorKind::Singular),
            );
        }
    }
    if z.re == zero && z.im == zero {
        return Evaluation::ok(real(one));
    }
    if terminates(a, b) {
        return Evaluation::ok(hypser::polynomial(a, b, c, z));
    }
    if is_nonpositive_integer(b) {
        return Evaluation::ok(hypser::polynomial(b, a, c, z));
    }

    let w = real(one) - z;
    if z.re == one && z.im == zero {
        let m = c - a - b;
        if m > zero {
            let v = gamma_value(c) * gamma_value(m) * rgamma_value(c - a) * rgamma_value(c - b);
            return Evaluation::ok(real(v));
        }
        return Evaluation::with_error(
            real(T::infinity()),
            SpecialError::new(function, ErrorKind::Singular),
        );
    }
    if c == a {
        return Evaluation::ok(w.powf(-b));
    }
    if c == b {
        return Evaluation::ok(w.powf(-a));
    }
    if is_nonpositive_integer(c - a) {
        let p = hypser::polynomial(c - a, c - b, c, z);
        return Evaluation::ok(w.powf(c - a - b) * p);
    }
    if is_nonpositive_integer(c - b) {
        let p = hypser::polynomial(c - b, c - a, c, z);
        return Evaluation::ok(w.powf(c - a - b) * p);
    }

    let regime = classify_hyp2f1(z);
    log::trace!("{function}: regime {regime:?} at z = {z:?}");
    let result = match regime {
        Hyp2f1Regime::Maclaurin => hypser::maclaurin(a, b, c, z),
        Hyp2f1Regime::Pfaff => hypser::pfaff(hypser::maclaurin::<T>, a, b, c, z),
        Hyp2f1Regime::OneMinusZ => hypser::one_minus_z(a, b, c, z),
        Hyp2f1Regime::OneOverZ => hypser::one_over_z(a, b, c, z),
        Hyp2f1Regime::PfaffOneMinusZ => hypser::pfaff(hypser::one_minus_z::<T>, a, b, c, z),
        Hyp2f1Regime::PfaffOneOverZ => hypser::pfaff(hypser::one_over_z::<T>, a, b, c, z),
        Hyp2f1Regime::LopezTemme => hypser::lopez_temme(a, b, c, z),
    };
    match result {
        Ok(v) if v.re.is_finite() && v.im.is_finite() => Evaluation::ok(v),
        Ok(v) => Evaluation::with_error(v, SpecialError::new(function, ErrorKind::Overflow)),
        Err(kind) => Evaluation::failed(function, kind),
    }
}

/// Gauss hypergeometric function 2F1(a, b; c; z) for complex `z`.
pub fn hyp2f1_complex_raw<T: SpecialFloat>(a: T, b: T, c: T, z: Complex<T>) -> Evaluation<Complex<T>> {
    evaluate("hyp2f1", a, b, c, z)
}

/// Gauss hypergeometric function 2F1(a, b; c; z) for complex `z`.
pub fn hyp2f1_complex<T: SpecialFloat>(a: T, b: T, c: T, z: Complex<T>) -> Complex<T> {
    hyp2f1_complex_raw(a, b, c, z).report()
}

/// Gauss hypergeometric function 2F1(a, b; c; x) for real `x`.
///
/// Only terminating cases are defined for `x > 1`; elsewhere on that ray the
/// function is complex and NaN is returned with a `Domain` error.
pub fn hyp2f1_raw<T: SpecialFloat>(a: T, b: T, c: T, x: T) -> Evaluation<T> {
    if x > T::one()
        && a != T::zero()
        && b != T::zero()
        && !is_nonpositive_integer(a)
        && !is_nonpositive_integer(b)
    {
        return Evaluation::domain("hyp2f1", "real x > 1 is defined only for terminating series");
    }
    evaluate("hyp2f1", a, b, c, Complex::new(x, T::zero())).map(|v| v.re)
}

/// Gauss hypergeometric function 2F1(a, b; c; x) for real `x`.
pub fn hyp2f1<T: SpecialFloat>(a: T, b: T, c: T, x: T) -> T {
    hyp2f1_raw(a, b, c, x).report()
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn c64(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn regimes() {
        assert_eq!(classify_hyp2f1(c64(0.25, 0.0)), Hyp2f1Regime::Maclaurin);
        assert_eq!(classify_hyp2f1(c64(-0.9, 0.0)), Hyp2f1Regime::Pfaff);
        assert_eq!(classify_hyp2f1(c64(0.95, 0.0)), Hyp2f1Regime::OneMinusZ);
        assert_eq!(classify_hyp2f1(c64(4.0, 0.0)), Hyp2f1Regime::OneOverZ);
        assert_eq!(classify_hyp2f1(c64(-7.0, 0.0)), Hyp2f1Regime::PfaffOneMinusZ);
        assert_eq!(classify_hyp2f1(c64(2.0, 1.5)), Hyp2f1Regime::OneOverZ);
        assert_eq!(classify_hyp2f1(c64(0.5, 0.8660254037844386)), Hyp2f1Regime::LopezTemme);
    }

    #[test]
    fn real_reference_values() {
        // mpmath hyp2f1
        let cases = [
            (0.5_f64, 1.5, 2.0, 0.25, 1.1117323958533621_f64),
            (1.0, 2.0, 3.0, -0.9, 0.63739781192001289),
            (0.25, 0.5, 1.75, 0.95, 1.1213783538703202),
            (1.5, 2.5, 4.5, -7.0, 0.11741955667194743),
            (2.0, 3.0, 5.5, -0.5, 0.62865073022565712),
        ];
        for (a, b, c, x, expected) in cases {
            let v = hyp2f1(a, b, c, x);
            assert!((v - expected).abs() <= 1e-13 * expected.abs(), "{a} {b} {c} {x}: {v}");
        }
    }

    #[test]
    fn complex_reference_values() {
        let cases = [
            (0.5, 1.5, 2.0, c64(0.5, 0.8660254037844386), c64(0.94776834782214146, 0.3938461060887214)),
            (1.2, 0.8, 2.7, c64(2.0, 1.5), c64(0.62876706213857095, 0.80281539342121817)),
            (0.25, 1.75, 1.5, c64(0.9, -0.3), c64(1.2755974959224731, -0.5458769300065894)),
            (1.0, 1.0, 2.0, c64(-4.0, -3.0), c64(0.34695918200176301, -0.12511451143367622)),
        ];
        for (a, b, c, z, expected) in cases {
            let v = hyp2f1_complex(a, b, c, z);
            assert!((v - expected).norm() <= 1e-13 * expected.norm(), "{z}: {v}");
        }
    }

    #[test]
    fn special_cases() {
        assert_eq!(hyp2f1(0.0, 2.0, 3.0, 0.7), 1.0);
        assert_eq!(hyp2f1(1.5, 2.0, 3.0, 0.0), 1.0);
        // terminating series is defined beyond x = 1
        assert!((hyp2f1(-3.0_f64, 2.0, 1.5, 4.0) + 55.228571428571429).abs() < 1e-12);
        // Gauss sum
        assert!((hyp2f1(0.3_f64, 0.7, 2.5, 1.0) - 1.1480180708837366).abs() < 1e-14);
        // c == b: (1 - x)^{-a}
        assert!((hyp2f1(2.0_f64, 1.5, 1.5, 0.5) - 4.0).abs() < 1e-14);
    }

    #[test]
    fn singular_and_domain() {
        let ev = hyp2f1_raw(1.0_f64, 2.0, -2.0, 0.5);
        assert_eq!(ev.kind(), Some(ErrorKind::Singular));
        assert!(ev.value.is_infinite());
        // cancelled by a shorter polynomial
        assert!(hyp2f1_raw(-1.0, 2.0, -2.0, 0.5).is_ok());

        let ev = hyp2f1_raw(0.5, 0.5, 1.0, 1.0);
        assert_eq!(ev.kind(), Some(ErrorKind::Singular));

        let ev = hyp2f1_raw(0.5_f64, 1.5, 2.0, 2.0);
        assert_eq!(ev.kind(), Some(ErrorKind::Domain));
        assert!(ev.value.is_nan());

        assert!(hyp2f1(f64::NAN, 1.0, 2.0, 0.5).is_nan());
    }

    #[test]
    fn single_precision() {
        let v = hyp2f1(0.5_f32, 1.5, 2.0, 0.25);
        assert!((v - 1.1117324).abs() < 1e-5);
    }
}
