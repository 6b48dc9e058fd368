//! Machine constants and the `SpecialFloat` trait.
//!
//! Constants follow the D1MACH/I1MACH conventions used by the Fortran
//! special-function libraries; iteration caps are shared by every
//! kernel so that no loop runs unbounded.

use num_traits::Float;

use crate::types::Undefined;

/// Floating-point trait for special-function evaluation.
///
/// Implemented for `f64` and `f32`. Every public evaluator is generic over
/// this trait; kernels read their stopping tolerances and overflow
/// thresholds from it instead of hard-coding `f64` limits.
pub trait SpecialFloat: Float + Undefined + core::fmt::Debug + 'static {
    /// Machine epsilon (D1MACH(3)).
    const MACH_EPSILON: Self;
    /// Smallest positive normal number (D1MACH(1)).
    const MACH_TINY: Self;
    /// Largest representable number (D1MACH(2)).
    const MACH_HUGE: Self;
    /// Number of binary digits in the mantissa (I1MACH(14)).
    const MACH_DIGITS: i32;

    /// Iteration cap for power series and continued fractions.
    const MAX_ITER: usize = 10_000;
    /// Cap on the number of terms of the slowly converging spheroidal
    /// and hypergeometric expansions.
    const MAX_TERMS: usize = 3_000;

    /// Infallible conversion from f64.
    ///
    /// For f64 this is the identity; for f32 it rounds via `as f32`.
    /// Algorithm constants are written as f64 literals, so this
    /// conversion always succeeds for the supported types.
    fn from_f64(x: f64) -> Self;

    /// Lossless widening to f64, used by the error metric and the
    /// validation harness.
    fn widen(self) -> f64;

    /// ln(MACH_HUGE): arguments of `exp` above this overflow.
    fn log_huge() -> Self;

    /// ln(MACH_TINY): arguments of `exp` below this underflow.
    fn log_tiny() -> Self;

    /// `self * a + b`, fused when `std` provides a hardware `fma`.
    ///
    /// Used by the Horner loops of the polynomial starting guesses. The
    /// `no_std` build multiplies and adds separately, since libm's software
    /// FMA is slower than the rounding it saves.
    fn fma(self, a: Self, b: Self) -> Self;
}

impl SpecialFloat for f64 {
    const MACH_EPSILON: f64 = 2.220446049250313e-16;
    const MACH_TINY: f64 = 2.2250738585072014e-308;
    const MACH_HUGE: f64 = 1.7976931348623157e+308;
    const MACH_DIGITS: i32 = 53;

    #[inline]
    fn from_f64(x: f64) -> f64 {
        x
    }
    #[inline]
    fn widen(self) -> f64 {
        self
    }
    #[inline]
    fn log_huge() -> f64 {
        709.782712893384
    }
    #[inline]
    fn log_tiny() -> f64 {
        -708.3964185322641
    }

    #[cfg(feature = "std")]
    #[inline]
    fn fma(self, a: f64, b: f64) -> f64 {
        Float::mul_add(self, a, b)
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn fma(self, a: f64, b: f64) -> f64 {
        self * a + b
    }
}

#[allow(clippy::excessive_precision)]
impl SpecialFloat for f32 {
    const MACH_EPSILON: f32 = 1.1920929e-7;
    const MACH_TINY: f32 = 1.1754944e-38;
    const MACH_HUGE: f32 = 3.4028235e+38;
    const MACH_DIGITS: i32 = 24;

    #[inline]
    fn from_f64(x: f64) -> f32 {
        x as f32
    }
    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }
    #[inline]
    fn log_huge() -> f32 {
        88.72283
    }
    #[inline]
    fn log_tiny() -> f32 {
        -87.33654475055310
    }

    #[cfg(feature = "std")]
    #[inline]
    fn fma(self, a: f32, b: f32) -> f32 {
        Float::mul_add(self, a, b)
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn fma(self, a: f32, b: f32) -> f32 {
        self * a + b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_thresholds_bracket_exp_overflow() {
        assert!(f64::log_huge().exp().is_finite());
        assert!((f64::log_huge() + 1e-3).exp().is_infinite());
        assert!(f64::log_tiny().exp() >= f64::MACH_TINY * 0.999);
        assert!(f32::log_huge().exp().is_finite());
        assert!((f32::log_huge() + 1e-2).exp().is_infinite());
    }

    #[test]
    fn widen_is_exact() {
        assert_eq!(0.1_f32.widen(), 0.1_f32 as f64);
        assert_eq!(<f64 as SpecialFloat>::from_f64(0.25), 0.25);
    }
}
