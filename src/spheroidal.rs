//! Spheroidal wave functions.
//!
//! Characteristic values for prolate and oblate geometry, the angular
//! function of the first kind, and the prolate radial functions of the
//! first and second kind. The `_nocv` forms compute the characteristic
//! value themselves; the `_cv` forms take one from [`prolate_segv`] /
//! [`oblate_segv`] so that repeated evaluations at the same `(m, n, c)`
//! skip the eigenproblem.

use crate::algo::spheroidal_coef::{
    angular, characteristic_value, radial_first, radial_second, Expansion, Shape,
};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, Pair};
use crate::utils::as_order;

/// Largest supported `n - m`.
const MAX_DEGREE_GAP: u32 = 198;

/// Validated `(m, n)`.
fn orders<T: SpecialFloat>(m: T, n: T) -> Result<(usize, usize), &'static str> {
    let (Some(m), Some(n)) = (as_order(m), as_order(n)) else {
        return Err("m and n must be non-negative integers");
    };
    if m > n {
        return Err("requires m <= n");
    }
    if n - m > MAX_DEGREE_GAP {
        return Err("n - m too large");
    }
    Ok((m as usize, n as usize))
}

fn segv<T: SpecialFloat>(function: &'static str, shape: Shape, m: T, n: T, c: T) -> Evaluation<T> {
    let (m, n) = match orders(m, n) {
        Ok(mn) => mn,
        Err(context) => return Evaluation::domain(function, context),
    };
    if c.is_nan() {
        return Evaluation::ok(c);
    }
    Evaluation::from_result(function, characteristic_value(shape, m, n, c))
}

/// Characteristic value λ_mn(c) of the prolate spheroidal wave functions.
pub fn prolate_segv_raw<T: SpecialFloat>(m: T, n: T, c: T) -> Evaluation<T> {
    segv("prolate_segv", Shape::Prolate, m, n, c)
}

/// Characteristic value λ_mn(c) of the prolate spheroidal wave functions.
pub fn prolate_segv<T: SpecialFloat>(m: T, n: T, c: T) -> T {
    prolate_segv_raw(m, n, c).report()
}

/// Characteristic value λ_mn(c) of the oblate spheroidal wave functions.
pub fn oblate_segv_raw<T: SpecialFloat>(m: T, n: T, c: T) -> Evaluation<T> {
    segv("oblate_segv", Shape::Oblate, m, n, c)
}

/// Characteristic value λ_mn(c) of the oblate spheroidal wave functions.
pub fn oblate_segv<T: SpecialFloat>(m: T, n: T, c: T) -> T {
    oblate_segv_raw(m, n, c).report()
}

// ── Angular functions ──

fn aswfa<T: SpecialFloat>(
    function: &'static str,
    shape: Shape,
    m: T,
    n: T,
    c: T,
    cv: Option<T>,
    x: T,
) -> Evaluation<Pair<T>> {
    let (m, n) = match orders(m, n) {
        Ok(mn) => mn,
        Err(context) => return Evaluation::domain(function, context),
    };
    if !(x.abs() < T::one()) {
        return Evaluation::domain(function, "requires |x| < 1");
    }
    if c.is_nan() || cv.is_some_and(|v| v.is_nan()) {
        return Evaluation::ok(Pair::new(T::nan(), T::nan()));
    }
    let result = match cv {
        Some(cv) => Ok(cv),
        None => characteristic_value(shape, m, n, c),
    }
    .and_then(|cv| Expansion::new(shape, m, n, c, cv))
    .and_then(|e| angular(&e, x));
    Evaluation::from_result(function, result)
}

/// Prolate angular function of the first kind `S_mn(c, x)` and its
/// derivative, `|x| < 1`.
pub fn prolate_aswfa_nocv_raw<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Evaluation<Pair<T>> {
    aswfa("prolate_aswfa_nocv", Shape::Prolate, m, n, c, None, x)
}

/// Prolate angular function of the first kind `S_mn(c, x)` and its
/// derivative, `|x| < 1`.
pub fn prolate_aswfa_nocv<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Pair<T> {
    prolate_aswfa_nocv_raw(m, n, c, x).report()
}

/// As [`prolate_aswfa_nocv`], with a precomputed characteristic value.
pub fn prolate_aswfa_cv_raw<T: SpecialFloat>(m: T, n: T, c: T, cv: T, x: T) -> Evaluation<Pair<T>> {
    aswfa("prolate_aswfa", Shape::Prolate, m, n, c, Some(cv), x)
}

/// As [`prolate_aswfa_nocv`], with a precomputed characteristic value.
pub fn prolate_aswfa_cv<T: SpecialFloat>(m: T, n: T, c: T, cv: T, x: T) -> Pair<T> {
    prolate_aswfa_cv_raw(m, n, c, cv, x).report()
}

/// Oblate angular function of the first kind and its derivative,
/// `|x| < 1`.
pub fn oblate_aswfa_nocv_raw<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Evaluation<Pair<T>> {
    aswfa("oblate_aswfa_nocv", Shape::Oblate, m, n, c, None, x)
}

/// Oblate angular function of the first kind and its derivative,
/// `|x| < 1`.
pub fn oblate_aswfa_nocv<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Pair<T> {
    oblate_aswfa_nocv_raw(m, n, c, x).report()
}

/// As [`oblate_aswfa_nocv`], with a precomputed characteristic value.
pub fn oblate_aswfa_cv_raw<T: SpecialFloat>(m: T, n: T, c: T, cv: T, x: T) -> Evaluation<Pair<T>> {
    aswfa("oblate_aswfa", Shape::Oblate, m, n, c, Some(cv), x)
}

/// As [`oblate_aswfa_nocv`], with a precomputed characteristic value.
pub fn oblate_aswfa_cv<T: SpecialFloat>(m: T, n: T, c: T, cv: T, x: T) -> Pair<T> {
    oblate_aswfa_cv_raw(m, n, c, cv, x).report()
}

// ── Radial functions ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    First,
    Second,
}

fn radial<T: SpecialFloat>(
    function: &'static str,
    kind: Kind,
    m: T,
    n: T,
    c: T,
    cv: Option<T>,
    x: T,
) -> Evaluation<Pair<T>> {
    let (m, n) = match orders(m, n) {
        Ok(mn) => mn,
        Err(context) => return Evaluation::domain(function, context),
    };
    if x.is_nan() || c.is_nan() || cv.is_some_and(|v| v.is_nan()) {
        return Evaluation::ok(Pair::new(T::nan(), T::nan()));
    }
    if !(x > T::one()) {
        return Evaluation::domain(function, "requires x > 1");
    }
    if !(c > T::zero()) {
        return Evaluation::domain(function, "requires c > 0");
    }
    let result = match cv {
        Some(cv) => Ok(cv),
        None => characteristic_value(Shape::Prolate, m, n, c),
    }
    .and_then(|cv| Expansion::new(Shape::Prolate, m, n, c, cv))
    .and_then(|e| match kind {
        Kind::First => radial_first(&e, c, x),
        Kind::Second => radial_second(&e, c, x),
    });
    match result {
        Ok(p) if p.is_nan() => Evaluation::failed(function, ErrorKind::NoConvergence),
        other => Evaluation::from_result(function, other),
    }
}

/// Prolate radial function of the first kind `R1_mn(c, x)` and its
/// derivative, `x > 1`.
pub fn prolate_radial1_nocv_raw<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Evaluation<Pair<T>> {
    radial("prolate_radial1_nocv", Kind::First, m, n, c, None, x)
}

/// Prolate radial function of the first kind `R1_mn(c, x)` and its
/// derivative, `x > 1`.
pub fn prolate_radial1_nocv<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Pair<T> {
    prolate_radial1_nocv_raw(m, n, c, x).report()
}

/// As [`prolate_radial1_nocv`], with a precomputed characteristic value.
pub fn prolate_radial1_cv_raw<T: SpecialFloat>(
    m: T,
    n: T,
    c: T,
    cv: T,
    x: T,
) -> Evaluation<Pair<T>> {
    radial("prolate_radial1", Kind::First, m, n, c, Some(cv), x)
}

/// As [`prolate_radial1_nocv`], with a precomputed characteristic value.
pub fn prolate_radial1_cv<T: SpecialFloat>(m: T, n: T, c: T, cv: T, x: T) -> Pair<T> {
    prolate_radial1_cv_raw(m, n, c, cv, x).report()
}

/// Prolate radial function of the second kind `R2_mn(c, x)` and its
/// derivative, `x > 1`.
pub fn prolate_radial2_nocv_raw<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Evaluation<Pair<T>> {
    radial("prolate_radial2_nocv", Kind::Second, m, n, c, None, x)
}

/// Prolate radial function of the second kind `R2_mn(c, x)` and its
/// derivative, `x > 1`.
pub fn prolate_radial2_nocv<T: SpecialFloat>(m: T, n: T, c: T, x: T) -> Pair<T> {
    prolate_radial2_nocv_raw(m, n, c, x).report()
}

/// As [`prolate_radial2_nocv`], with a precomputed characteristic value.
pub fn prolate_radial2_cv_raw<T: SpecialFloat>(
    m: T,
    n: T,
    c: T,
    cv: T,
    x: T,
) -> Evaluation<Pair<T>> {
    radial("prolate_radial2", Kind::Second, m, n, c, Some(cv), x)
}

/// As [`prolate_radial2_nocv`], with a precomputed characteristic value.
pub fn prolate_radial2_cv<T: SpecialFloat>(m: T, n: T, c: T, cv: T, x: T) -> Pair<T> {
    prolate_radial2_cv_raw(m, n, c, cv, x).report()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs()
    }

    #[test]
    fn segv_values() {
        assert!(close(prolate_segv(0.0, 0.0, 1.0), 0.3190000551468927, 1e-13));
        assert!(close(prolate_segv(1.0, 3.0, 2.5), 14.944430765965896, 1e-13));
        assert!(close(oblate_segv(0.0, 0.0, 1.0), -0.3486023994702691, 1e-13));
        assert!(close(oblate_segv(1.0, 2.0, 3.0), 1.8215414358343953, 1e-13));
        // c = 0 reduces to n(n + 1)
        assert!((prolate_segv(2.0_f64, 4.0, 0.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn radial_values() {
        let r1 = prolate_radial1_nocv(1.0, 1.0, 1.0, 1.5);
        assert!(close(r1.value, 0.3215679738028729, 1e-12));
        assert!(close(r1.derivative, 0.28515952085962304, 1e-12));
        let r2 = prolate_radial2_nocv(1.0, 1.0, 1.0, 1.5);
        assert!(close(r2.value, -0.9791917433386731, 1e-12));
        assert!(close(r2.derivative, 1.6194838854166778, 1e-12));

        let r1 = prolate_radial1_nocv(0.0, 0.0, 1.0, 2.0);
        assert!(close(r1.value, 0.5322603846816455, 1e-12));
        let r2 = prolate_radial2_nocv(2.0, 3.0, 3.0, 1.1);
        assert!(close(r2.value, -1.6732858443573477, 1e-11));
        assert!(close(r2.derivative, 17.69606305989596, 1e-11));
    }

    #[test]
    fn cv_variants_agree() {
        let cv = prolate_segv(0.0, 1.0, 2.0);
        let a = prolate_radial2_cv(0.0, 1.0, 2.0, cv, 1.2);
        let b = prolate_radial2_nocv(0.0, 1.0, 2.0, 1.2);
        assert_eq!(a, b);
        let a = prolate_aswfa_cv(1.0, 1.0, 1.0, prolate_segv(1.0, 1.0, 1.0), 0.3);
        assert_eq!(a, prolate_aswfa_nocv(1.0, 1.0, 1.0, 0.3));
    }

    #[test]
    fn angular_values() {
        let s = prolate_aswfa_nocv(1.0, 1.0, 1.0, 0.3);
        assert!(close(s.value, 0.9455714450603268, 1e-12));
        assert!(close(s.derivative, -0.3673348552391787, 1e-12));
        let s = prolate_aswfa_nocv(0.0, 2.0, 2.0, -0.6);
        assert!(close(s.value, 0.1719805350963662, 1e-12));
        let s = oblate_aswfa_nocv(0.0, 0.0, 1.0, 0.5);
        assert!(close(s.value, 1.0441336969542285, 1e-12));
    }

    #[test]
    fn domain_errors() {
        for ev in [
            prolate_radial2_nocv_raw(2.0_f64, 1.0, 1.0, 1.5),
            prolate_radial2_nocv_raw(0.5_f64, 1.0, 1.0, 1.5),
            prolate_radial1_nocv_raw(0.0_f64, 1.0, 1.0, 0.5),
            prolate_radial1_nocv_raw(0.0_f64, 1.0, 0.0, 1.5),
            prolate_aswfa_nocv_raw(0.0_f64, 1.0, 1.0, 1.0),
            prolate_aswfa_nocv_raw(0.0_f64, 300.0, 1.0, 0.5),
        ] {
            assert!(ev.value.is_nan());
            assert_eq!(ev.kind(), Some(ErrorKind::Domain));
        }
        assert_eq!(prolate_segv_raw(1.0_f64, 0.0, 1.0).kind(), Some(ErrorKind::Domain));
    }
}
