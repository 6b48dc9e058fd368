//! Real Bessel functions of integer order, as whole sequences.
//!
//! `J_0..J_n` come from Miller's backward recurrence normalised by
//! `J_0 + 2ΣJ_2k = 1`; `Y_0`, `Y_1` from the Neumann series over the same
//! sequence, then forward recurrence for higher orders (stable for Y).
//! Spherical `j_n` follow the same pattern with `j_0 = sin x / x` as the
//! normalisation.
//!
//! All routines take `x >= 0`; callers reflect negative arguments.

use alloc::vec::Vec;

use crate::algo::constants::{EULER, PI};
use crate::algo::tridiag::try_zeroed;
use crate::machine::SpecialFloat;
use crate::types::ErrorKind;

/// Orders beyond this are refused rather than allocated.
const MAX_START: usize = 1 << 22;

/// Starting index for Miller's recurrence that gives J_0..J_n to full
/// precision at `x`.
fn miller_start<T: SpecialFloat>(n: usize, x: T) -> Result<usize, ErrorKind> {
    let xm = x.to_usize().ok_or(ErrorKind::Loss)?;
    let m = n.max(xm);
    if m > MAX_START {
        return Err(ErrorKind::Loss);
    }
    let extra = 16 + T::from_f64(40.0 * (m + 1) as f64).sqrt().to_usize().unwrap_or(0);
    Ok(2 * ((m + extra) / 2))
}

/// Run a three-term recurrence `f_{k-1} = (2k + shift)/x · f_k - f_{k+1}`
/// downward from `start`, rescaling on the way so nothing overflows.
/// Returns the unnormalised values `f_0..=f_start`.
fn backward<T: SpecialFloat>(start: usize, x: T, shift: f64) -> Result<Vec<T>, ErrorKind> {
    let mut out = try_zeroed(start + 1)?;
    let big = T::MACH_HUGE.sqrt();
    let shrink = big.recip();
    let mut above = T::zero();
    let mut here = T::MACH_TINY.sqrt();
    out[start] = here;
    for k in (1..=start).rev() {
        let below = T::from_f64(2.0 * k as f64 + shift) / x * here - above;
        above = here;
        here = below;
        out[k - 1] = below;
        if below.abs() > big {
            for v in out[k - 1..].iter_mut() {
                *v = *v * shrink;
            }
            above = above * shrink;
            here = here * shrink;
        }
    }
    Ok(out)
}

/// J_0..=J_start at `x > 0`, normalised.
fn miller<T: SpecialFloat>(start: usize, x: T) -> Result<Vec<T>, ErrorKind> {
    let mut f = backward(start, x, 0.0)?;
    let two = T::from_f64(2.0);
    let norm = f
        .iter()
        .step_by(2)
        .skip(1)
        .fold(f[0], |acc, &v| acc + two * v);
    for v in f.iter_mut() {
        *v = *v / norm;
    }
    Ok(f)
}

/// `[J_0(x), ..., J_nmax(x)]` for `x >= 0`.
pub(crate) fn jn_sequence<T: SpecialFloat>(nmax: usize, x: T) -> Result<Vec<T>, ErrorKind> {
    if x == T::zero() {
        let mut out = try_zeroed(nmax + 1)?;
        out[0] = T::one();
        return Ok(out);
    }
    let start = miller_start(nmax + 1, x)?;
    let mut j = miller(start, x)?;
    j.truncate(nmax + 1);
    Ok(j)
}

/// `(Y_0(x), Y_1(x))` for `x > 0` from the Neumann series.
fn y01<T: SpecialFloat>(x: T) -> Result<(T, T), ErrorKind> {
    let start = miller_start(1, x)?;
    let j = miller(start, x)?;
    let two = T::from_f64(2.0);
    let l = (x / two).ln() + T::from_f64(EULER);

    let mut s0 = T::zero();
    let mut s1 = T::zero();
    let mut sign = -T::one();
    let mut k = 1;
    while 2 * k + 1 < j.len() {
        let kf = T::from_f64(k as f64);
        s0 = s0 + sign * j[2 * k] / kf;
        s1 = s1 - sign * T::from_f64((2 * k + 1) as f64) / (kf * (kf + T::one())) * j[2 * k + 1];
        sign = -sign;
        k += 1;
    }
    let scale = two / T::from_f64(PI);
    let y0 = (l * j[0] - two * s0) * scale;
    let y1 = ((l - T::one()) * j[1] - j[0] / x + s1) * scale;
    Ok((y0, y1))
}

/// `[Y_0(x), ..., Y_nmax(x)]` for `x >= 0`. Orders that overflow are `-inf`.
pub(crate) fn yn_sequence<T: SpecialFloat>(nmax: usize, x: T) -> Result<Vec<T>, ErrorKind> {
    let mut out = try_zeroed(nmax.max(1) + 1)?;
    if x == T::zero() {
        out.iter_mut().for_each(|v| *v = T::neg_infinity());
        out.truncate(nmax + 1);
        return Ok(out);
    }
    let (y0, y1) = y01(x)?;
    out[0] = y0;
    out[1] = y1;
    forward(&mut out, x);
    out.truncate(nmax + 1);
    Ok(out)
}

/// Fill `out[2..]` by `Y_{k+1} = 2k/x · Y_k - Y_{k-1}`, pinning the tail to
/// `-inf` once it overflows.
fn forward<T: SpecialFloat>(out: &mut [T], x: T) {
    for k in 1..out.len() - 1 {
        let next = T::from_f64(2.0 * k as f64) / x * out[k] - out[k - 1];
        if !next.is_finite() {
            out[k + 1..].iter_mut().for_each(|v| *v = T::neg_infinity());
            return;
        }
        out[k + 1] = next;
    }
}

/// `[j_0(x), ..., j_nmax(x)]` for `x >= 0`.
pub(crate) fn spherical_jn_sequence<T: SpecialFloat>(
    nmax: usize,
    x: T,
) -> Result<Vec<T>, ErrorKind> {
    if x == T::zero() {
        let mut out = try_zeroed(nmax + 1)?;
        out[0] = T::one();
        return Ok(out);
    }
    let start = miller_start(nmax + 1, x)?;
    let mut f = backward(start, x, 1.0)?;
    let (s, c) = x.sin_cos();
    let j0 = s / x;
    let j1 = (s / x - c) / x;
    let scale = if j0.abs() >= j1.abs() {
        j0 / f[0]
    } else {
        j1 / f[1]
    };
    f.truncate(nmax + 1);
    for v in f.iter_mut() {
        *v = *v * scale;
    }
    Ok(f)
}

/// Derivatives of a cylinder-function sequence: `C_0' = -C_1`,
/// `C_k' = C_{k-1} - k/x · C_k`. The last entry of `f` is only used as
/// `C_1` when the sequence has two elements.
pub(crate) fn cylinder_derivatives<T: SpecialFloat>(f: &[T], x: T) -> Result<Vec<T>, ErrorKind> {
    let mut d = try_zeroed(f.len())?;
    if f.len() < 2 {
        return Ok(d);
    }
    d[0] = -f[1];
    for k in 1..f.len() {
        d[k] = f[k - 1] - T::from_f64(k as f64) / x * f[k];
    }
    Ok(d)
}

/// Derivatives of a spherical sequence: `c_0' = -c_1`,
/// `c_k' = c_{k-1} - (k+1)/x · c_k`.
pub(crate) fn spherical_derivatives<T: SpecialFloat>(
    f: &[T],
    x: T,
) -> Result<Vec<T>, ErrorKind> {
    let mut d = try_zeroed(f.len())?;
    if f.len() < 2 {
        return Ok(d);
    }
    d[0] = -f[1];
    for k in 1..f.len() {
        d[k] = f[k - 1] - T::from_f64((k + 1) as f64) / x * f[k];
    }
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn j_matches_reference() {
        // mpmath besselj
        let j = jn_sequence(10, 2.5_f64).unwrap();
        assert!(rel(j[0], -0.048383776468197996) < 1e-13);
        assert!(rel(j[1], 0.49709410246427404) < 1e-14);
        assert!(rel(j[10], 2.2247284173983833e-06) < 1e-13);

        let j = jn_sequence(3, 40.0_f64).unwrap();
        assert!((j[3] + 0.1261448155058208).abs() < 1e-14);
    }

    #[test]
    fn y_matches_reference() {
        // mpmath bessely
        let y = yn_sequence(5, 2.5_f64).unwrap();
        assert!(rel(y[0], 0.49807035961523189) < 1e-13);
        assert!(rel(y[1], 0.14591813796678577) < 1e-13);
        assert!(rel(y[5], -3.8301760007407519) < 1e-13);

        let y = yn_sequence(1, 0.01_f64).unwrap();
        assert!(rel(y[0], -3.005455637083645) < 1e-13);
    }

    #[test]
    fn zero_argument() {
        let j = jn_sequence(3, 0.0_f64).unwrap();
        assert_eq!(j, vec![1.0, 0.0, 0.0, 0.0]);
        let y = yn_sequence(2, 0.0_f64).unwrap();
        assert!(y.iter().all(|v| *v == f64::NEG_INFINITY));
    }

    #[test]
    fn spherical_matches_reference() {
        // j_n(x) = sqrt(pi/(2x)) J_{n+1/2}(x)
        let j = spherical_jn_sequence(6, 1.5_f64).unwrap();
        assert!(rel(j[0], 0.66499665773603633) < 1e-14);
        assert!(rel(j[6], 7.817400966152658e-05) < 1e-13);
    }

    #[test]
    fn wronskian() {
        // J_{n+1} Y_n - J_n Y_{n+1} = 2/(πx)
        let x = 7.3_f64;
        let j = jn_sequence(12, x).unwrap();
        let y = yn_sequence(12, x).unwrap();
        for n in 0..12 {
            let w = j[n + 1] * y[n] - j[n] * y[n + 1];
            assert!(rel(w, 2.0 / (core::f64::consts::PI * x)) < 1e-12, "n={n}");
        }
    }

    #[test]
    fn derivatives() {
        let x = 2.5_f64;
        let j = jn_sequence(4, x).unwrap();
        let d = cylinder_derivatives(&j, x).unwrap();
        assert!((d[0] + j[1]).abs() < 1e-16);
        // J_1' = (J_0 - J_2)/2
        assert!((d[1] - 0.5 * (j[0] - j[2])).abs() < 1e-15);
    }
}
