//! Inverse error functions.
//!
//! Giles' single-precision polynomial ("Approximating the erfinv function",
//! GPU Computing Gems, 2011) supplies the starting point; Newton steps on
//! erf (central region) or on ln erfc (tails) polish it to full precision.
//! Working in ln erfc keeps the tail iteration well conditioned down to the
//! smallest subnormal arguments.

#![allow(clippy::excessive_precision)]

use crate::algo::constants::SQRT_PI;
use crate::erf::{erf, erfcx_raw};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, SpecialError};

const NEWTON_STEPS: usize = 50;

#[rustfmt::skip]
const GILES_CENTRAL: [f64; 9] = [
    2.81022636e-08, 3.43273939e-07, -3.5233877e-06, -4.39150654e-06, 0.00021858087,
    -0.00125372503, -0.00417768164, 0.246640727, 1.50140941,
];

#[rustfmt::skip]
const GILES_TAIL: [f64; 9] = [
    -0.000200214257, 0.000100950558, 0.00134934322, -0.00367342844, 0.00573950773,
    -0.0076224613, 0.00943887047, 1.00167406, 2.83297682,
];

/// Giles' approximation to erfinv(t), with w = -ln((1-t)(1+t)).
fn giles<T: SpecialFloat>(t: T, w: T) -> T {
    let (coeffs, w) = if w < T::from_f64(5.0) {
        (&GILES_CENTRAL, w - T::from_f64(2.5))
    } else {
        (&GILES_TAIL, w.sqrt() - T::from_f64(3.0))
    };
    let mut p = T::from_f64(coeffs[0]);
    for c in &coeffs[1..] {
        p = p.fma(w, T::from_f64(*c));
    }
    p * t
}

/// erfinv(t) for |t| ≤ 1/2, Newton on erf.
fn central<T: SpecialFloat>(t: T) -> T {
    let one = T::one();
    let w = -((one - t) * (one + t)).ln();
    let mut x = giles(t, w);
    let scale = T::from_f64(2.0 / SQRT_PI);
    for _ in 0..NEWTON_STEPS {
        let f = erf(x) - t;
        let dx = f / (scale * (-x * x).exp());
        x = x - dx;
        if dx.abs() <= T::MACH_EPSILON * x.abs() {
            break;
        }
    }
    x
}

/// erfcinv(y) for 0 < y ≤ 1/2, Newton on ln erfc.
fn tail<T: SpecialFloat>(y: T) -> T {
    let one = T::one();
    let two = T::from_f64(2.0);
    let sqrt_pi = T::from_f64(SQRT_PI);
    let mut x = if y > T::from_f64(1e-3) {
        let w = -(y * (two - y)).ln();
        giles(one - y, w)
    } else {
        let x0 = (-y.ln()).sqrt();
        (-(y * x0 * sqrt_pi).ln()).sqrt()
    };
    let ly = y.ln();
    for _ in 0..NEWTON_STEPS {
        let ex = erfcx_raw(x).value;
        let g = -x * x + ex.ln() - ly;
        let dx = g * sqrt_pi / two * ex;
        x = x + dx;
        if dx.abs() <= T::MACH_EPSILON * x.abs() {
            break;
        }
    }
    x
}

/// Inverse error function: erf(erfinv(x)) = x for x in [-1, 1].
pub fn erfinv_raw<T: SpecialFloat>(x: T) -> Evaluation<T> {
    let one = T::one();
    if x.is_nan() {
        return Evaluation::ok(x);
    }
    if x.abs() > one {
        return Evaluation::domain("erfinv", "argument outside [-1, 1]");
    }
    if x == one {
        return Evaluation::with_error(
            T::infinity(),
            SpecialError::new("erfinv", ErrorKind::Singular),
        );
    }
    if x == -one {
        return Evaluation::with_error(
            T::neg_infinity(),
            SpecialError::new("erfinv", ErrorKind::Singular),
        );
    }
    if x.abs() <= T::from_f64(0.5) {
        return Evaluation::ok(central(x));
    }
    let v = tail(one - x.abs());
    Evaluation::ok(if x < T::zero() { -v } else { v })
}

/// Inverse error function: erf(erfinv(x)) = x for x in [-1, 1].
pub fn erfinv<T: SpecialFloat>(x: T) -> T {
    erfinv_raw(x).report()
}

/// Inverse complementary error function: erfc(erfcinv(y)) = y for y in [0, 2].
pub fn erfcinv_raw<T: SpecialFloat>(y: T) -> Evaluation<T> {
    let one = T::one();
    let two = T::from_f64(2.0);
    if y.is_nan() {
        return Evaluation::ok(y);
    }
    if y < T::zero() || y > two {
        return Evaluation::domain("erfcinv", "argument outside [0, 2]");
    }
    if y == T::zero() {
        return Evaluation::with_error(
            T::infinity(),
            SpecialError::new("erfcinv", ErrorKind::Singular),
        );
    }
    if y == two {
        return Evaluation::with_error(
            T::neg_infinity(),
            SpecialError::new("erfcinv", ErrorKind::Singular),
        );
    }
    let v = if y > one {
        let r = two - y;
        if r <= T::from_f64(0.5) {
            -tail(r)
        } else {
            -central(one - r)
        }
    } else if y >= T::from_f64(0.5) {
        central(one - y)
    } else {
        tail(y)
    };
    Evaluation::ok(v)
}

/// Inverse complementary error function: erfc(erfcinv(y)) = y for y in [0, 2].
pub fn erfcinv<T: SpecialFloat>(y: T) -> T {
    erfcinv_raw(y).report()
}
