//! Extended relative error between a computed and a reference value.
//!
//! Non-finite values are compared by classification: two NaNs, or two
//! infinities of the same sign, agree exactly. Any other mix of finite and
//! non-finite values is an infinite error.

use num_complex::Complex;
use num_traits::Float;

use crate::machine::SpecialFloat;

/// Values that can be scored against a reference.
pub trait ExtendedRelativeError: Copy {
    /// Error of `self` relative to `desired`, as a non-negative `f64`.
    fn extended_relative_error(self, desired: Self) -> f64;
}

/// Error class of a non-finite pair, or `None` if both are finite.
fn non_finite(actual: f64, desired: f64) -> Option<f64> {
    if actual.is_nan() || desired.is_nan() {
        return Some(if actual.is_nan() && desired.is_nan() { 0.0 } else { f64::INFINITY });
    }
    if actual.is_infinite() || desired.is_infinite() {
        return Some(if actual == desired { 0.0 } else { f64::INFINITY });
    }
    None
}

fn real_error(actual: f64, desired: f64) -> f64 {
    if let Some(e) = non_finite(actual, desired) {
        return e;
    }
    let mut diff = Float::abs(actual - desired);
    if diff.is_infinite() {
        // opposite signs near the overflow threshold
        diff = Float::abs(actual * 0.5 - desired * 0.5);
        if desired == 0.0 {
            return f64::INFINITY;
        }
        return 2.0 * (diff / Float::abs(desired));
    }
    if desired == 0.0 {
        return diff;
    }
    diff / Float::abs(desired)
}

impl<T: SpecialFloat> ExtendedRelativeError for T {
    fn extended_relative_error(self, desired: Self) -> f64 {
        real_error(self.widen(), desired.widen())
    }
}

impl<T: SpecialFloat> ExtendedRelativeError for Complex<T> {
    fn extended_relative_error(self, desired: Self) -> f64 {
        let (ar, ai) = (self.re.widen(), self.im.widen());
        let (dr, di) = (desired.re.widen(), desired.im.widen());
        let finite = ar.is_finite() && ai.is_finite() && dr.is_finite() && di.is_finite();
        if !finite {
            return Float::max(real_error(ar, dr), real_error(ai, di));
        }
        let mut diff = Float::hypot(ar - dr, ai - di);
        let scale = Float::hypot(dr, di);
        if diff.is_infinite() {
            diff = Float::hypot(ar * 0.5 - dr * 0.5, ai * 0.5 - di * 0.5);
            if scale == 0.0 {
                return f64::INFINITY;
            }
            return 2.0 * (diff / scale);
        }
        if scale == 0.0 {
            return diff;
        }
        diff / scale
    }
}

/// Extended relative error of `actual` against `desired`.
///
/// Returns 0 for an exact match (including matching non-finite classes),
/// `+inf` when only one side is finite, the absolute error when `desired`
/// is zero, and `|actual - desired| / |desired|` otherwise. Complex values
/// use the modulus of the difference.
pub fn extended_relative_error<V: ExtendedRelativeError>(actual: V, desired: V) -> f64 {
    actual.extended_relative_error(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::{Complex32, Complex64};

    #[test]
    fn exact_and_relative() {
        assert_eq!(extended_relative_error(1.5_f64, 1.5), 0.0);
        assert_eq!(extended_relative_error(1.1_f64, 1.0), (1.1_f64 - 1.0).abs());
        assert!((extended_relative_error(-2.0_f64, -4.0) - 0.5).abs() < 1e-16);
        assert!((extended_relative_error(2.5_f32, 2.0) - 0.25).abs() < 1e-7);
    }

    #[test]
    fn zero_reference_is_absolute() {
        assert_eq!(extended_relative_error(0.0_f64, 0.0), 0.0);
        assert_eq!(extended_relative_error(-0.0_f64, 0.0), 0.0);
        assert_eq!(extended_relative_error(1e-20_f64, 0.0), 1e-20);
    }

    #[test]
    fn non_finite_classes() {
        let nan = f64::NAN;
        let inf = f64::INFINITY;
        assert_eq!(extended_relative_error(nan, nan), 0.0);
        assert_eq!(extended_relative_error(inf, inf), 0.0);
        assert_eq!(extended_relative_error(-inf, -inf), 0.0);
        assert_eq!(extended_relative_error(inf, -inf), inf);
        assert_eq!(extended_relative_error(1.0, nan), inf);
        assert_eq!(extended_relative_error(nan, 1.0), inf);
        assert_eq!(extended_relative_error(inf, 1e308), inf);
        assert_eq!(extended_relative_error(1e308, inf), inf);
        assert_eq!(extended_relative_error(nan, inf), inf);
        assert_eq!(extended_relative_error(inf, nan), inf);
    }

    #[test]
    fn overflowing_difference_is_rescaled() {
        let e = extended_relative_error(f64::MAX, -f64::MAX);
        assert_eq!(e, 2.0);
    }

    #[test]
    fn complex_uses_modulus() {
        let d = Complex64::new(3.0, 4.0);
        let a = Complex64::new(3.0, 4.5);
        assert!((extended_relative_error(a, d) - 0.1).abs() < 1e-15);
        assert_eq!(extended_relative_error(d, d), 0.0);
        assert_eq!(
            extended_relative_error(Complex64::new(0.0, 1e-10), Complex64::new(0.0, 0.0)),
            1e-10
        );
        let c = Complex32::new(1.0, 1.0);
        assert_eq!(extended_relative_error(c, c), 0.0);
    }

    #[test]
    fn complex_non_finite_components() {
        let inf = f64::INFINITY;
        let nan = f64::NAN;
        let a = Complex64::new(inf, 1.0);
        assert_eq!(extended_relative_error(a, a), 0.0);
        assert_eq!(extended_relative_error(Complex64::new(nan, nan), Complex64::new(nan, nan)), 0.0);
        assert_eq!(extended_relative_error(Complex64::new(1.0, 1.0), Complex64::new(inf, 1.0)), inf);
        assert_eq!(extended_relative_error(Complex64::new(inf, 0.0), Complex64::new(-inf, 0.0)), inf);
    }

    #[test]
    fn symmetric_in_failure() {
        let pairs = [(f64::NAN, 1.0), (f64::INFINITY, 0.0), (f64::NEG_INFINITY, f64::INFINITY)];
        for (x, y) in pairs {
            assert_eq!(extended_relative_error(x, y), extended_relative_error(y, x));
        }
    }
}
