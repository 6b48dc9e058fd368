//! Kelvin functions of order zero and their derivatives.
//!
//! `ber x + i bei x = J0(x e^{3πi/4}) = I0(x e^{πi/4})`. Small arguments use
//! the power series in `(x/2)^4`; larger ones the Hankel expansion of `I_ν`
//! on the ray `arg w = π/4`.

use num_complex::Complex;

use crate::algo::constants::{FRAC_1_SQRT_2, PI};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation};

/// Switch from the power series to the asymptotic expansion.
const SERIES_LIMIT: f64 = 20.0;

/// Cap on the terms of the (divergent) asymptotic series.
const ASYMPTOTIC_TERMS: usize = 200;

#[derive(Debug, Clone, Copy)]
struct Kelvin<T> {
    ber: T,
    bei: T,
    berp: T,
    beip: T,
}

fn series<T: SpecialFloat>(x: T) -> Result<Kelvin<T>, ErrorKind> {
    let one = T::one();
    let h = x * T::from_f64(0.5);
    let h4 = h.powi(4);
    let tenth = T::MACH_EPSILON * T::from_f64(0.1);
    let mut out = Kelvin {
        ber: T::zero(),
        bei: T::zero(),
        berp: T::zero(),
        beip: T::zero(),
    };
    // (x/2)^{4k}/((2k)!)^2 and (x/2)^{4k+2}/((2k+1)!)^2
    let mut tb = one;
    let mut ti = h * h;
    for k in 0..T::MAX_TERMS {
        let sign = if k % 2 == 0 { one } else { -one };
        let kf = T::from_f64(k as f64);
        out.ber = out.ber + sign * tb;
        out.bei = out.bei + sign * ti;
        if x != T::zero() {
            let four = T::from_f64(4.0);
            out.berp = out.berp + sign * four * kf * tb / x;
            out.beip = out.beip + sign * (four * kf + T::from_f64(2.0)) * ti / x;
        }
        if k > 2 && tb.abs() <= tenth * out.ber.abs() && ti.abs() <= tenth * out.bei.abs() {
            return Ok(out);
        }
        let d1 = (T::from_f64(2.0) * kf + one) * (T::from_f64(2.0) * kf + T::from_f64(2.0));
        let d2 = (T::from_f64(2.0) * kf + T::from_f64(2.0)) * (T::from_f64(2.0) * kf + T::from_f64(3.0));
        tb = tb * h4 / (d1 * d1);
        ti = ti * h4 / (d2 * d2);
    }
    Err(ErrorKind::NoConvergence)
}

/// Hankel expansion of `I_ν(w)` for large `|w|`, `-π/2 < arg w < 3π/2`.
/// Only ν = 0 and ν = 1 are needed, for which `e^{iνπ} = ±1`.
fn asymptotic_i<T: SpecialFloat>(nu: u32, w: Complex<T>) -> Complex<T> {
    let one = T::one();
    let mu = T::from_f64(4.0 * f64::from(nu * nu));
    let mut alternating = Complex::new(T::zero(), T::zero());
    let mut plain = alternating;
    let mut t = Complex::new(one, T::zero());
    for k in 0..ASYMPTOTIC_TERMS {
        let sign = if k % 2 == 0 { one } else { -one };
        alternating = alternating + t * sign;
        plain = plain + t;
        let odd = T::from_f64((2 * k + 1) as f64);
        let next = t * (mu - odd * odd) / (w * T::from_f64(8.0 * (k + 1) as f64));
        if k > 0 && next.norm() >= t.norm() {
            break;
        }
        t = next;
        if t.norm() < T::MACH_EPSILON * T::from_f64(0.1) * plain.norm() {
            break;
        }
    }
    let pre = (w * T::from_f64(2.0 * PI)).sqrt().inv();
    let reflected = if nu % 2 == 0 {
        Complex::new(T::zero(), one)
    } else {
        Complex::new(T::zero(), -one)
    };
    w.exp() * pre * alternating + reflected * (-w).exp() * pre * plain
}

fn asymptotic<T: SpecialFloat>(x: T) -> Kelvin<T> {
    let r = T::from_f64(FRAC_1_SQRT_2);
    let e = Complex::new(r, r);
    let w = e * x;
    let b = asymptotic_i(0, w);
    // d/dx I0(x e) = e I1(x e)
    let bp = e * asymptotic_i(1, w);
    Kelvin {
        ber: b.re,
        bei: b.im,
        berp: bp.re,
        beip: bp.im,
    }
}

fn kelvin<T: SpecialFloat>(function: &'static str, x: T, pick: fn(&Kelvin<T>) -> T) -> Evaluation<T> {
    if x.is_nan() {
        return Evaluation::ok(x);
    }
    if x.is_infinite() {
        return Evaluation::failed(function, ErrorKind::Overflow);
    }
    let ax = x.abs();
    let mut k = if ax < T::from_f64(SERIES_LIMIT) {
        match series(ax) {
            Ok(k) => k,
            Err(kind) => return Evaluation::failed(function, kind),
        }
    } else {
        asymptotic(ax)
    };
    if x < T::zero() {
        k.berp = -k.berp;
        k.beip = -k.beip;
    }
    let v = pick(&k);
    if v.is_finite() {
        Evaluation::ok(v)
    } else {
        Evaluation::failed(function, ErrorKind::Overflow)
    }
}

/// Kelvin function `ber x`.
pub fn ber_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    kelvin("ber", x, |k| k.ber)
}

/// Kelvin function `ber x`.
pub fn ber<T: SpecialFloat>(x: T) -> T {
    ber_raw(x).report()
}

/// Kelvin function `bei x`.
pub fn bei_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    kelvin("bei", x, |k| k.bei)
}

/// Kelvin function `bei x`.
pub fn bei<T: SpecialFloat>(x: T) -> T {
    bei_raw(x).report()
}

/// Derivative of `ber x`.
pub fn berp_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    kelvin("berp", x, |k| k.berp)
}

/// Derivative of `ber x`.
pub fn berp<T: SpecialFloat>(x: T) -> T {
    berp_raw(x).report()
}

/// Derivative of `bei x`.
pub fn beip_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    kelvin("beip", x, |k| k.beip)
}

/// Derivative of `bei x`.
pub fn beip<T: SpecialFloat>(x: T) -> T {
    beip_raw(x).report()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        (a - b).abs() / b.abs()
    }

    #[test]
    fn series_region() {
        // mpmath ber, bei and their derivatives
        let cases = [
            (0.5, [0.99902346399083826, 0.062493218382199459, -0.0078120761475077336, 0.24991862111621022]),
            (1.5, [0.92107218354625576, 0.55756006230308669, -0.21001101733128838, 0.73025067390027341]),
            (10.0, [138.84046594163265, 56.370458553906638, 51.195258393599611, 135.30930171596461]),
            (19.5, [59956.933112233757, 64879.423497279548, -5048.1894820274383, 86609.054284958993]),
        ];
        for (x, r) in cases {
            assert!(rel(ber(x), r[0]) < 1e-12, "ber({x})");
            assert!(rel(bei(x), r[1]) < 1e-12, "bei({x})");
            assert!(rel(berp(x), r[2]) < 1e-11, "berp({x})");
            assert!(rel(beip(x), r[3]) < 1e-12, "beip({x})");
        }
    }

    #[test]
    fn asymptotic_region() {
        // errors are measured against the envelope e^{x/√2}/√(2πx)
        let x = 40.0;
        let env = (x / 2.0_f64.sqrt()).exp() / (2.0 * PI * x).sqrt();
        let r = [-112596696872.07407, 45628130285.641258, -110470788109.8525, -47933243273.888905];
        let v = [ber(x), bei(x), berp(x), beip(x)];
        for i in 0..4 {
            assert!((v[i] - r[i]).abs() < 1e-12 * env, "component {i}");
        }

        let x = 25.0;
        let env = (x / 2.0_f64.sqrt()).exp() / (2.0 * PI * x).sqrt();
        assert!((ber(x) - 9797.7169497354903).abs() < 1e-11 * env);
        assert!(rel(bei(x), -3808789.9114440357) < 1e-12);
        assert!(rel(berp(x), 2700522.3179499553) < 1e-12);
    }

    #[test]
    fn parity() {
        assert!(rel(ber(-3.0), -0.22138024959869389) < 1e-13);
        assert!(rel(bei(-3.0), 1.9375867852660428) < 1e-13);
        assert!(rel(berp(-3.0), 1.5698466322294042) < 1e-13);
        assert!(rel(beip(-3.0), -0.88048232405786145) < 1e-13);
        assert_eq!(ber(0.0), 1.0);
        assert_eq!(berp(0.0), 0.0);
        assert_eq!(bei(0.0), 0.0);
        assert!(ber_raw(0.0_f64).is_ok());
    }

    #[test]
    fn non_finite() {
        assert!(ber(f64::NAN).is_nan());
        assert_eq!(berp_raw(f64::INFINITY).kind(), Some(ErrorKind::Overflow));
        assert_eq!(ber_raw(2000.0_f64).kind(), Some(ErrorKind::Overflow));
        assert!((ber(1.5_f32) - 0.9210722).abs() < 1e-6);
    }
}
