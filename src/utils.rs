//! Small numeric helpers shared by the kernels: overflow-safe complex
//! modulus and division, exact-at-integers trigonometry, and integrality
//! tests for order parameters.

use num_complex::Complex;

use crate::machine::SpecialFloat;

/// Multiply by i: (a+bi)·i = -b+ai.
#[inline]
pub(crate) fn mul_i<T: SpecialFloat>(c: Complex<T>) -> Complex<T> {
    Complex::new(-c.im, c.re)
}

/// Multiply by -i: (a+bi)·(-i) = b-ai.
#[inline]
pub(crate) fn mul_neg_i<T: SpecialFloat>(c: Complex<T>) -> Complex<T> {
    Complex::new(c.im, -c.re)
}

/// |z| without intermediate overflow or underflow.
///
/// Factors out the larger component: `max * sqrt(1 + (min/max)²)`.
#[inline]
pub(crate) fn zabs<T: SpecialFloat>(z: Complex<T>) -> T {
    let u = z.re.abs();
    let v = z.im.abs();
    if u + v == T::zero() {
        return T::zero();
    }
    let (big, small) = if u > v { (u, v) } else { (v, u) };
    let q = small / big;
    big * (T::one() + q * q).sqrt()
}

/// sin(πx), exactly zero at integers and exactly ±1 at half-integers.
///
/// The argument is reduced modulo 2 before multiplying by π, so large
/// arguments do not accumulate the rounding error of `(x * PI).sin()`.
#[inline]
pub(crate) fn sinpi<T: SpecialFloat>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);
    let one_half = T::from_f64(1.5);
    let pi = T::from_f64(core::f64::consts::PI);

    let (ax, sign) = if x < zero { (-x, -one) } else { (x, one) };
    let r = ax % two;

    if r == zero || r == one {
        return zero;
    }
    if r == half {
        return sign;
    }
    if r == one_half {
        return -sign;
    }

    let s = if r < half {
        (r * pi).sin()
    } else if r < one {
        ((one - r) * pi).sin()
    } else if r < one_half {
        -((r - one) * pi).sin()
    } else {
        -((two - r) * pi).sin()
    };
    sign * s
}

/// cos(πx), exactly zero at half-integers and exactly ±1 at integers.
#[inline]
pub(crate) fn cospi<T: SpecialFloat>(x: T) -> T {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);
    let one_half = T::from_f64(1.5);
    let pi = T::from_f64(core::f64::consts::PI);

    let r = x.abs() % two;

    if r == zero {
        return one;
    }
    if r == half || r == one_half {
        return zero;
    }
    if r == one {
        return -one;
    }

    if r < half {
        (r * pi).cos()
    } else if r < one {
        -((one - r) * pi).cos()
    } else if r < one_half {
        -((r - one) * pi).cos()
    } else {
        ((two - r) * pi).cos()
    }
}

/// Order parameter as an exact non-negative integer.
///
/// Returns `None` for negative, fractional, non-finite, or absurdly large
/// values; callers turn that into a domain error.
#[inline]
pub(crate) fn as_order<T: SpecialFloat>(x: T) -> Option<u32> {
    if !x.is_finite() || x < T::zero() || x.floor() != x || x > T::from_f64(1.0e6) {
        return None;
    }
    x.to_u32()
}

/// True for 0, -1, -2, ...
#[inline]
pub(crate) fn is_nonpositive_integer<T: SpecialFloat>(x: T) -> bool {
    x <= T::zero() && x.floor() == x
}

/// Nearest integer when `x` lies within a relative distance `1e-12` of it.
///
/// Connection formulas whose coefficients have poles at integer parameter
/// differences switch to their limiting forms inside this band.
#[inline]
pub(crate) fn near_integer<T: SpecialFloat>(x: T) -> Option<T> {
    let r = x.round();
    let band = T::from_f64(1.0e-12) * x.abs().max(T::one());
    if (x - r).abs() <= band {
        Some(r)
    } else {
        None
    }
}

/// (-1)^n
#[inline]
pub(crate) fn parity_sign<T: SpecialFloat>(n: u32) -> T {
    if n % 2 == 0 {
        T::one()
    } else {
        -T::one()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::{Complex32, Complex64};

    // ── complex helpers ──

    #[test]
    fn zabs_pythagorean() {
        assert_eq!(zabs(Complex64::new(0.0, 0.0)), 0.0);
        assert!((zabs(Complex64::new(3.0, 4.0)) - 5.0).abs() < 1e-15);
        assert!((zabs(Complex64::new(-5.0, 0.0)) - 5.0).abs() < 1e-15);
        assert!((zabs(Complex32::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn zabs_extreme_magnitudes() {
        let big = 1.0e154;
        let r = zabs(Complex64::new(big, big));
        assert!((r - big * 2.0_f64.sqrt()).abs() / r < 1e-15);

        let tiny = 1.0e-308;
        let r = zabs(Complex64::new(tiny, tiny));
        assert!(r > 0.0);
        assert!((r - tiny * 2.0_f64.sqrt()).abs() / r < 1e-15);
    }

    #[test]
    fn rotations() {
        let z = Complex64::new(2.0, -3.0);
        assert_eq!(mul_i(z), Complex64::new(3.0, 2.0));
        assert_eq!(mul_neg_i(z), Complex64::new(-3.0, -2.0));
    }

    // ── trigonometry ──

    #[test]
    fn sinpi_exact_points() {
        for n in -5..=5 {
            assert_eq!(sinpi(n as f64), 0.0);
        }
        assert_eq!(sinpi(0.5_f64), 1.0);
        assert_eq!(sinpi(1.5_f64), -1.0);
        assert_eq!(sinpi(-0.5_f64), -1.0);
        assert_eq!(sinpi(1e15_f64), 0.0);
        assert_eq!(sinpi(1.5_f32), -1.0);
    }

    #[test]
    fn sinpi_general() {
        assert!((sinpi(1.0_f64 / 6.0) - 0.5).abs() < 1e-15);
        assert!((sinpi(0.25_f64) - core::f64::consts::FRAC_1_SQRT_2).abs() < 1e-15);
    }

    #[test]
    fn cospi_exact_points() {
        for n in -5..=5 {
            assert_eq!(cospi(n as f64 + 0.5), 0.0);
        }
        assert_eq!(cospi(0.0_f64), 1.0);
        assert_eq!(cospi(1.0_f64), -1.0);
        assert_eq!(cospi(-2.0_f64), 1.0);
        assert_eq!(cospi(0.5_f32), 0.0);
        assert!((cospi(1.0_f64 / 3.0) - 0.5).abs() < 1e-15);
    }

    // ── integrality ──

    #[test]
    fn order_parsing() {
        assert_eq!(as_order(3.0_f64), Some(3));
        assert_eq!(as_order(0.0_f32), Some(0));
        assert_eq!(as_order(2.5_f64), None);
        assert_eq!(as_order(-1.0_f64), None);
        assert_eq!(as_order(f64::NAN), None);
        assert_eq!(as_order(f64::INFINITY), None);
    }

    #[test]
    fn integer_predicates() {
        assert!(is_nonpositive_integer(0.0_f64));
        assert!(is_nonpositive_integer(-3.0_f64));
        assert!(!is_nonpositive_integer(-2.5_f64));
        assert!(!is_nonpositive_integer(1.0_f64));
        assert_eq!(near_integer(2.0000000000001_f64), Some(2.0));
        assert_eq!(near_integer(2.001_f64), None);
        assert_eq!(parity_sign::<f64>(3), -1.0);
        assert_eq!(parity_sign::<f64>(4), 1.0);
    }
}
