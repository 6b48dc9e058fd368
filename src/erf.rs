//! Error function family: erf, erfc, erfcx, erfi, Dawson's integral, and
//! their complex extensions, all built on the Faddeeva function w(z).
//!
//! Small arguments use the Maclaurin series directly, since expressing
//! erf through 1 - exp(-z²) w(iz) cancels badly near the origin.

use num_complex::Complex;

use crate::algo::constants::{SQRT_PI, TWO_OVER_SQRT_PI};
use crate::algo::faddeeva::faddeeva;
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, SpecialError};
use crate::utils::{mul_i, mul_neg_i, zabs};

// ── Series helpers ──

/// Σ (-1)^n x^{2n+1} / (n! (2n+1)) · 2/√π
fn erf_series<T: SpecialFloat>(x: T) -> T {
    let x2 = x * x;
    let mut term = x;
    let mut s = x;
    for n in 1..60 {
        let nf = T::from_f64(n as f64);
        term = term * -x2 / nf;
        let t = term / (T::from_f64(2.0) * nf + T::one());
        s = s + t;
        if t.abs() <= T::MACH_EPSILON * s.abs() {
            break;
        }
    }
    T::from_f64(TWO_OVER_SQRT_PI) * s
}

fn erf_series_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    let z2 = z * z;
    let mut term = z;
    let mut s = z;
    for n in 1..60 {
        let nf = T::from_f64(n as f64);
        term = -term * z2 / nf;
        let t = term / (T::from_f64(2.0) * nf + T::one());
        s = s + t;
        if zabs(t) <= T::MACH_EPSILON * zabs(s) {
            break;
        }
    }
    s * T::from_f64(TWO_OVER_SQRT_PI)
}

/// Σ x^{2n+1} / (n! (2n+1)) · 2/√π
fn erfi_series<T: SpecialFloat>(x: T) -> T {
    let x2 = x * x;
    let mut term = x;
    let mut s = x;
    for n in 1..60 {
        let nf = T::from_f64(n as f64);
        term = term * x2 / nf;
        let t = term / (T::from_f64(2.0) * nf + T::one());
        s = s + t;
        if t.abs() <= T::MACH_EPSILON * s.abs() {
            break;
        }
    }
    T::from_f64(TWO_OVER_SQRT_PI) * s
}

/// D(z) = Σ (-2)^n z^{2n+1} / (2n+1)!!
fn dawsn_series_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    let z2 = z * z;
    let mut term = z;
    let mut s = z;
    for n in 1..60 {
        term = term * z2 * T::from_f64(-2.0) / T::from_f64((2 * n + 1) as f64);
        s = s + term;
        if zabs(term) <= T::MACH_EPSILON * zabs(s) {
            break;
        }
    }
    s
}

/// exp(-x²) with x² split as m² + (2mf + f²), m a multiple of 1/128, so the
/// rounding error of x² is not amplified by the exponential.
fn exp_neg_square<T: SpecialFloat>(x: T) -> T {
    let x = x.abs();
    let scale = T::from_f64(128.0);
    let m = (x * scale).round() / scale;
    let f = x - m;
    (-m * m).exp() * (-(T::from_f64(2.0) * m * f + f * f)).exp()
}

fn small<T: SpecialFloat>(x: T) -> bool {
    x < T::from_f64(0.5)
}

// ── Real arguments ──

/// Error function erf(x).
pub fn erf<T: SpecialFloat>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    if small(x.abs()) {
        return erf_series(x);
    }
    if x > T::zero() {
        T::one() - erfc(x)
    } else {
        erfc(-x) - T::one()
    }
}

/// Complementary error function erfc(x) = 1 - erf(x).
pub fn erfc<T: SpecialFloat>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    if small(x.abs()) {
        return T::one() - erf_series(x);
    }
    let ax = x.abs();
    let tail = exp_neg_square(ax) * faddeeva(Complex::new(T::zero(), ax)).re;
    if x > T::zero() {
        tail
    } else {
        T::from_f64(2.0) - tail
    }
}

/// Scaled complementary error function erfcx(x) = exp(x²) erfc(x).
pub fn erfcx_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    if x >= T::zero() || x.is_nan() {
        return Evaluation::ok(faddeeva(Complex::new(T::zero(), x)).re);
    }
    let x2 = x * x;
    if x2 > T::log_huge() - T::from_f64(core::f64::consts::LN_2) {
        return Evaluation::with_error(
            T::infinity(),
            SpecialError::new("erfcx", ErrorKind::Overflow),
        );
    }
    let two = T::from_f64(2.0);
    Evaluation::ok(two * x2.exp() - faddeeva(Complex::new(T::zero(), -x)).re)
}

/// Scaled complementary error function erfcx(x) = exp(x²) erfc(x).
pub fn erfcx<T: SpecialFloat>(x: T) -> T {
    erfcx_raw(x).report()
}

/// Imaginary error function erfi(x) = -i erf(ix).
pub fn erfi_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    if x.is_nan() {
        return Evaluation::ok(x);
    }
    if small(x.abs()) {
        return Evaluation::ok(erfi_series(x));
    }
    let im = faddeeva(Complex::new(x, T::zero())).im;
    let x2 = x * x;
    let v = if x2 > T::log_huge() {
        let h = (x2 / T::from_f64(2.0)).exp();
        h * (h * im)
    } else {
        x2.exp() * im
    };
    if v.is_infinite() {
        return Evaluation::with_error(v, SpecialError::new("erfi", ErrorKind::Overflow));
    }
    Evaluation::ok(v)
}

/// Imaginary error function erfi(x) = -i erf(ix).
pub fn erfi<T: SpecialFloat>(x: T) -> T {
    erfi_raw(x).report()
}

/// Dawson's integral D(x) = exp(-x²) ∫₀ˣ exp(t²) dt.
pub fn dawsn<T: SpecialFloat>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    if small(x.abs()) {
        return dawsn_series_complex(Complex::new(x, T::zero())).re;
    }
    T::from_f64(SQRT_PI / 2.0) * faddeeva(Complex::new(x, T::zero())).im
}

// ── Complex arguments ──

/// Faddeeva function w(z) = exp(-z²) erfc(-iz).
pub fn faddeeva_w<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    faddeeva(z)
}

/// erf(z) for complex z.
pub fn erf_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    let zero = T::zero();
    if z.im == zero {
        return Complex::new(erf(z.re), z.im);
    }
    if z.re == zero {
        return Complex::new(z.re, erfi(z.im));
    }
    if small(zabs(z)) {
        return erf_series_complex(z);
    }
    let one = Complex::from(T::one());
    let emz2 = (-z * z).exp();
    if z.re >= zero {
        one - emz2 * faddeeva(mul_i(z))
    } else {
        emz2 * faddeeva(mul_neg_i(z)) - one
    }
}

/// erfc(z) for complex z.
pub fn erfc_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    let zero = T::zero();
    if z.im == zero {
        return Complex::new(erfc(z.re), -z.im);
    }
    if small(zabs(z)) {
        return Complex::from(T::one()) - erf_series_complex(z);
    }
    let emz2 = (-z * z).exp();
    if z.re >= zero {
        emz2 * faddeeva(mul_i(z))
    } else {
        Complex::from(T::from_f64(2.0)) - emz2 * faddeeva(mul_neg_i(z))
    }
}

/// erfcx(z) = exp(z²) erfc(z) = w(iz) for complex z.
pub fn erfcx_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    faddeeva(mul_i(z))
}

/// erfi(z) = -i erf(iz) for complex z.
pub fn erfi_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    mul_neg_i(erf_complex(mul_i(z)))
}

/// Dawson's integral D(z) = (√π/2) i (exp(-z²) - w(z)) for complex z.
pub fn dawsn_complex<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    if z.im == T::zero() {
        return Complex::new(dawsn(z.re), z.im);
    }
    if small(zabs(z)) {
        return dawsn_series_complex(z);
    }
    mul_i((-z * z).exp() - faddeeva(z)) * T::from_f64(SQRT_PI / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    fn crel(a: Complex64, b: Complex64) -> f64 {
        (a - b).norm() / b.norm()
    }

    #[test]
    fn erf_and_erfc_reference() {
        // mpmath erf / erfc
        assert!(rel(erf(0.1_f64), 0.1124629160182848922) < 1e-15);
        assert!(rel(erf(1.5_f64), 0.9661051464753107271) < 1e-15);
        assert!(rel(erf(-2.0_f64), -0.9953222650189527342) < 1e-15);
        assert!(rel(erfc(0.3_f64), 0.6713732405408726) < 1e-15);
        assert!(rel(erfc(5.0_f64), 1.5374597944280348502e-12) < 1e-13);
        assert!(rel(erfc(-1.0_f64), 1.8427007929497148693) < 1e-15);
        assert!(rel(erfc(26.0_f64), 5.663192408856142e-296) < 1e-12);
    }

    #[test]
    fn erfcx_both_signs() {
        assert!(rel(erfcx(2.0_f64), 0.2553956763105057439) < 1e-15);
        assert!(rel(erfcx(-1.0_f64), 5.00898008076228346) < 1e-14);
        assert!(rel(erfcx(1e3_f64), 5.6418930145338765e-4) < 1e-14);
    }

    #[test]
    fn erfcx_overflow_reports() {
        let ev = erfcx_raw(-30.0_f64);
        assert!(ev.value.is_infinite());
        assert_eq!(ev.kind(), Some(ErrorKind::Overflow));
    }

    #[test]
    fn erfi_and_dawsn_reference() {
        // mpmath erfi
        assert!(rel(erfi(0.25_f64), 0.28808361979497198) < 1e-15);
        assert!(rel(erfi(1.5_f64), 4.5847332572844269) < 1e-14);
        assert!(rel(erfi(-3.0_f64), -1629.9946226015657) < 1e-14);
        // mpmath sqrt(pi)/2*exp(-x²)*erfi(x)
        assert!(rel(dawsn(0.1_f64), 0.09933599239785286) < 1e-15);
        assert!(rel(dawsn(2.0_f64), 0.30134038892379196) < 1e-14);
    }

    #[test]
    fn erfi_large_argument_overflows() {
        let ev = erfi_raw(40.0_f64);
        assert!(ev.value.is_infinite());
        assert_eq!(ev.kind(), Some(ErrorKind::Overflow));
        // splitting exp(x²) keeps x just above √(ln MAX) finite
        assert!(erfi(26.7_f64).is_finite());
    }

    #[test]
    fn complex_erf_family() {
        // mpmath erf/erfc at 1+2i and -0.3+0.1i
        let z = Complex64::new(1.0, 2.0);
        assert!(crel(erf_complex(z), Complex64::new(-0.5366435657785650, -5.0491437034470346)) < 1e-14);
        assert!(crel(erfc_complex(z), Complex64::new(1.5366435657785650, 5.0491437034470346)) < 1e-14);
        let z = Complex64::new(-0.3, 0.1);
        assert!(
            crel(erf_complex(z), Complex64::new(-0.33173512856039807, 0.10340864129817522)) < 1e-14
        );
    }

    #[test]
    fn erfi_complex_agrees_with_real() {
        for x in [0.2_f64, 1.5, -2.5, 6.0] {
            let c = erfi_complex(Complex64::new(x, 0.0));
            assert!(rel(c.re, erfi(x)) < 1e-14);
            assert_eq!(c.im, 0.0);
        }
        // erfi(iy) = i erf(y)
        let c = erfi_complex(Complex64::new(0.0, 0.7));
        assert!(c.re.abs() < 1e-300);
        assert!(rel(c.im, erf(0.7)) < 1e-15);
    }

    #[test]
    fn dawsn_complex_small_and_large() {
        // mpmath sqrt(pi)/2 * exp(-z²) * erfi(z)
        let z = Complex64::new(0.2, 0.3);
        assert!(crel(dawsn_complex(z), Complex64::new(0.23094061439052855, 0.29237509849745513)) < 1e-14);
        let z = Complex64::new(2.0, 1.0);
        assert!(crel(dawsn_complex(z), Complex64::new(0.16353940943453556, -0.15312457553712298)) < 1e-13);
    }

    #[test]
    fn f32_evaluation() {
        assert!((erf(0.5_f32) - 0.5204999).abs() < 1e-6);
        assert!((erfc(2.0_f32) - 0.004677735).abs() < 1e-8);
    }
}
