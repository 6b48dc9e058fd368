//! Spheroidal wave function expansions.
//!
//! The angular function is expanded in associated Legendre functions and
//! the radial functions in spherical Bessel functions, both with the same
//! coefficients `d_r` (r of the parity of n - m). They satisfy the
//! three-term recurrence
//!
//! `α_r d_{r+2} + (β_r - λ) d_r + γ_r d_{r-2} = 0`
//!
//! whose symmetrised tridiagonal form yields the characteristic value λ.
//! The coefficients are normalised as in Flammer (1957), so that the
//! angular function matches `P_n^m` at the origin.

#![allow(clippy::too_many_arguments)]

use alloc::vec::Vec;

use crate::algo::bessel::{spherical_derivatives, spherical_jn_sequence};
use crate::algo::tridiag::{eigenvalue, eigenvector, try_zeroed};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Pair};

/// Extra backward continued-fraction steps beyond the last coefficient
/// that is actually used.
const TAIL_GUARD: usize = 40;

/// Prolate (c² > 0) or oblate (c² < 0) geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Prolate,
    Oblate,
}

impl Shape {
    fn c_squared<T: SpecialFloat>(self, c: T) -> T {
        match self {
            Shape::Prolate => c * c,
            Shape::Oblate => -c * c,
        }
    }
}

/// Recurrence coefficients `(α_r, β_r, γ_r)`.
fn recurrence<T: SpecialFloat>(m: usize, r: usize, cc: T) -> (T, T, T) {
    let (m, r) = (m as f64, r as f64);
    let g = |v: f64| T::from_f64(v);
    let alpha = g((2.0 * m + r + 2.0) * (2.0 * m + r + 1.0))
        / g((2.0 * m + 2.0 * r + 3.0) * (2.0 * m + 2.0 * r + 5.0))
        * cc;
    let beta = g((m + r) * (m + r + 1.0))
        + g(2.0 * (m + r) * (m + r + 1.0) - 2.0 * m * m - 1.0)
            / g((2.0 * m + 2.0 * r - 1.0) * (2.0 * m + 2.0 * r + 3.0))
            * cc;
    let gamma = g(r * (r - 1.0)) / g((2.0 * m + 2.0 * r - 3.0) * (2.0 * m + 2.0 * r - 1.0)) * cc;
    (alpha, beta, gamma)
}

/// Number of coefficients kept in the eigenproblem.
fn term_count<T: SpecialFloat>(m: usize, n: usize, c: T) -> Result<usize, ErrorKind> {
    let extra = (T::from_f64(0.5 * (n - m) as f64) + c.abs())
        .to_usize()
        .ok_or(ErrorKind::NoConvergence)?;
    let count = 45 + extra;
    if count > T::MAX_TERMS {
        return Err(ErrorKind::NoConvergence);
    }
    Ok(count)
}

/// Characteristic value λ_mn(c).
pub(crate) fn characteristic_value<T: SpecialFloat>(
    shape: Shape,
    m: usize,
    n: usize,
    c: T,
) -> Result<T, ErrorKind> {
    let cc = shape.c_squared(c);
    let ip = (n - m) % 2;
    let count = term_count(m, n, c)?;
    let mut d = try_zeroed(count)?;
    let mut e = try_zeroed(count - 1)?;
    for i in 0..count {
        let r = ip + 2 * i;
        let (alpha, beta, _) = recurrence(m, r, cc);
        d[i] = beta;
        if i + 1 < count {
            let (_, _, gamma_next) = recurrence(m, r + 2, cc);
            e[i] = (alpha * gamma_next).sqrt();
        }
    }
    eigenvalue(&d, &e, (n - m) / 2)
}

/// Ratios `d_i / d_{i-1}` for `i` in `from..=top`, from the backward
/// continued fraction started at `top`.
fn tail_ratios<T: SpecialFloat>(
    m: usize,
    ip: usize,
    cc: T,
    cv: T,
    from: usize,
    top: usize,
) -> Result<Vec<T>, ErrorKind> {
    let mut ratios = try_zeroed(top + 1)?;
    let mut ratio = T::zero();
    for i in (from..=top).rev() {
        let (alpha, beta, gamma) = recurrence(m, ip + 2 * i, cc);
        ratio = -gamma / (beta - cv + alpha * ratio);
        ratios[i] = ratio;
    }
    Ok(ratios)
}

fn dominant<T: SpecialFloat>(v: &[T]) -> usize {
    v.iter()
        .enumerate()
        .fold((0, T::zero()), |best, (k, &x)| {
            if x.abs() > best.1 {
                (k, x.abs())
            } else {
                best
            }
        })
        .0
}

/// Flammer-normalised expansion coefficients `d_r`, r = ip, ip + 2, ...
#[derive(Debug, Clone)]
pub(crate) struct Expansion<T> {
    pub(crate) m: usize,
    pub(crate) n: usize,
    /// Parity of n - m; the first coefficient is `d_ip`.
    pub(crate) ip: usize,
    pub(crate) cc: T,
    pub(crate) cv: T,
    pub(crate) d: Vec<T>,
}

impl<T: SpecialFloat> Expansion<T> {
    pub(crate) fn new(shape: Shape, m: usize, n: usize, c: T, cv: T) -> Result<Self, ErrorKind> {
        let cc = shape.c_squared(c);
        let ip = (n - m) % 2;
        let count = term_count(m, n, c)?;

        let mut v = if c == T::zero() {
            let mut v = try_zeroed(count)?;
            v[(n - m) / 2] = T::one();
            v
        } else {
            let mut sub = try_zeroed(count - 1)?;
            let mut diag = try_zeroed(count)?;
            let mut sup = try_zeroed(count - 1)?;
            for i in 0..count {
                let r = ip + 2 * i;
                let (alpha, beta, _) = recurrence(m, r, cc);
                diag[i] = beta;
                if i + 1 < count {
                    sup[i] = alpha;
                    sub[i] = recurrence(m, r + 2, cc).2;
                }
            }
            eigenvector(&sub, &diag, &sup, cv)?
        };

        // Past the dominant coefficient the inverse-iteration vector is
        // only as good as its truncation; the continued fraction is not.
        let j = dominant(&v);
        let top = count + TAIL_GUARD;
        let ratios = tail_ratios(m, ip, cc, cv, j + 1, top)?;
        for i in j + 1..count {
            v[i] = v[i - 1] * ratios[i];
        }
        v.try_reserve(TAIL_GUARD).map_err(|_| ErrorKind::Memory)?;
        let floor = v[j].abs() * T::MACH_EPSILON * T::from_f64(1e-30);
        let mut i = count;
        while i < top && v[i - 1].abs() > floor {
            let next = v[i - 1] * ratios[i];
            v.push(next);
            i += 1;
        }

        normalise(&mut v, m, n, ip)?;
        Ok(Expansion {
            m,
            n,
            ip,
            cc,
            cv,
            d: v,
        })
    }

    /// `Σ d_r (2m + r)! / r!`, the radial normalisation.
    fn radial_denominator(&self) -> T {
        let m = self.m;
        let mut weight = T::one();
        let mut sum = T::zero();
        for (i, &dv) in self.d.iter().enumerate() {
            let r = self.ip + 2 * i;
            sum = sum + dv * weight;
            weight = weight * radial_weight_step(m, r);
        }
        sum
    }
}

/// `(2m + r + 2)! r! / ((2m + r)! (r + 2)!)`
fn radial_weight_step<T: SpecialFloat>(m: usize, r: usize) -> T {
    T::from_f64(((2 * m + r + 2) * (2 * m + r + 1)) as f64) / T::from_f64(((r + 2) * (r + 1)) as f64)
}

/// Scale `d` so that `Σ d_r P_{m+r}^m(0)` (or its derivative for odd
/// n - m) equals `P_n^m(0)` (resp. its derivative).
fn normalise<T: SpecialFloat>(d: &mut [T], m: usize, n: usize, ip: usize) -> Result<(), ErrorKind> {
    let target_index = (n - m) / 2;
    let mut tau = T::one();
    let mut sum = T::zero();
    let mut target = T::zero();
    for (i, &dv) in d.iter().enumerate() {
        let r = ip + 2 * i;
        let signed = if i % 2 == 0 { tau } else { -tau };
        sum = sum + dv * signed;
        if i == target_index {
            target = signed;
        }
        tau = tau
            * if ip == 0 {
                T::from_f64((r + 2 * m + 1) as f64) / T::from_f64((r + 2) as f64)
            } else {
                T::from_f64((r + 2 * m + 2) as f64) / T::from_f64((r + 1) as f64)
            };
    }
    if sum == T::zero() || !sum.is_finite() {
        return Err(ErrorKind::NoConvergence);
    }
    let scale = target / sum;
    d.iter_mut().for_each(|v| *v = *v * scale);
    Ok(())
}

/// `P_l^m(x)` and derivatives for l = m..=lmax, |x| < 1, without the
/// Condon–Shortley phase.
fn legendre<T: SpecialFloat>(m: usize, lmax: usize, x: T) -> Result<(Vec<T>, Vec<T>), ErrorKind> {
    let len = lmax - m + 1;
    let mut p = try_zeroed(len)?;
    let mut dp = try_zeroed(len)?;
    let one = T::one();
    let s = ((one - x) * (one + x)).sqrt();

    let mut pmm = one;
    for i in 1..=m {
        pmm = pmm * T::from_f64((2 * i - 1) as f64) * s;
    }
    p[0] = pmm;
    if len > 1 {
        p[1] = x * T::from_f64((2 * m + 1) as f64) * pmm;
    }
    for i in 2..len {
        let l = m + i - 1;
        p[i] = (T::from_f64((2 * l + 1) as f64) * x * p[i - 1] - T::from_f64((l + m) as f64) * p[i - 2])
            / T::from_f64((l - m + 1) as f64);
    }
    // (x² - 1) P_l' = l x P_l - (l + m) P_{l-1}
    let denom = x * x - one;
    for i in 0..len {
        let l = m + i;
        let prev = if i > 0 { p[i - 1] } else { T::zero() };
        dp[i] = (T::from_f64(l as f64) * x * p[i] - T::from_f64((l + m) as f64) * prev) / denom;
    }
    Ok((p, dp))
}

/// Angular function of the first kind `S_mn(c, x)` and its derivative.
pub(crate) fn angular<T: SpecialFloat>(e: &Expansion<T>, x: T) -> Result<Pair<T>, ErrorKind> {
    let lmax = e.m + e.ip + 2 * (e.d.len() - 1);
    let (p, dp) = legendre(e.m, lmax, x)?;
    let mut s = T::zero();
    let mut ds = T::zero();
    for (i, &dv) in e.d.iter().enumerate() {
        let k = e.ip + 2 * i;
        s = s + dv * p[k];
        ds = ds + dv * dp[k];
    }
    Ok(Pair::new(s, ds))
}

/// `(1 - 1/x²)^{m/2}` and its derivative.
fn radial_prefactor<T: SpecialFloat>(m: usize, x: T) -> (T, T) {
    if m == 0 {
        return (T::one(), T::zero());
    }
    let one = T::one();
    let a = (((x - one) * (x + one)).sqrt() / x).powi(m as i32);
    let da = a * T::from_f64(m as f64) / (x * (x * x - one));
    (a, da)
}

/// `(-1)^((r - (n - m)) / 2)` for the i-th coefficient.
fn radial_sign<T: SpecialFloat>(e: &Expansion<T>, i: usize) -> T {
    let shift = (e.n - e.m - e.ip) / 2;
    if (i + shift) % 2 == 0 {
        T::one()
    } else {
        -T::one()
    }
}

/// Prolate radial function of the first kind `R1_mn(c, x)`, x > 1.
pub(crate) fn radial_first<T: SpecialFloat>(
    e: &Expansion<T>,
    c: T,
    x: T,
) -> Result<Pair<T>, ErrorKind> {
    let cx = c * x;
    let nmax = e.m + e.ip + 2 * e.d.len() + 2;
    let j = spherical_jn_sequence(nmax, cx)?;
    let dj = spherical_derivatives(&j, cx)?;

    let mut weight = T::one();
    let mut s = T::zero();
    let mut ds = T::zero();
    for (i, &dv) in e.d.iter().enumerate() {
        let r = e.ip + 2 * i;
        let coef = radial_sign(e, i) * dv * weight;
        s = s + coef * j[e.m + r];
        ds = ds + coef * dj[e.m + r] * c;
        weight = weight * radial_weight_step(e.m, r);
    }
    let den = e.radial_denominator();
    let (a, da) = radial_prefactor(e.m, x);
    Ok(Pair::new(a * s / den, (da * s + a * ds) / den))
}

/// Prolate radial function of the second kind `R2_mn(c, x)`, x > 1.
///
/// The spherical y_k grow factorially with k while d_r decays, so the
/// series is generated from term ratios; the coefficients past the dominant
/// one come from the continued fraction. More than `MAX_TERMS` terms is a
/// convergence failure.
pub(crate) fn radial_second<T: SpecialFloat>(
    e: &Expansion<T>,
    c: T,
    x: T,
) -> Result<Pair<T>, ErrorKind> {
    let max_terms = T::MAX_TERMS;
    let eps = T::MACH_EPSILON;
    let m = e.m;
    let cx = c * x;
    let j = dominant(&e.d);
    let ratios = tail_ratios(m, e.ip, e.cc, e.cv, 1, max_terms + TAIL_GUARD)?;

    // y_{k-1} and y_k at k = m + ip
    let (sn, cs) = cx.sin_cos();
    let y0 = -cs / cx;
    let y1 = (-cs / cx - sn) / cx;
    let mut k = m + e.ip;
    let (mut y_prev, mut y_k) = if k == 0 {
        (sn / cx, y0)
    } else {
        let (mut a, mut b) = (y0, y1);
        for kk in 1..k {
            let next = T::from_f64((2 * kk + 1) as f64) / cx * b - a;
            a = b;
            b = next;
        }
        (a, b)
    };

    let mut dv = e.d[0];
    let mut term = radial_sign(e, 0) * dv * y_k;
    let mut dterm = radial_sign(e, 0) * dv * (y_prev - T::from_f64((k + 1) as f64) / cx * y_k);
    let mut s = T::zero();
    let mut ds = T::zero();
    let mut i = 0;
    loop {
        let r = e.ip + 2 * i;
        s = s + term;
        ds = ds + dterm * c;
        if i > j + 2 && term.abs() <= eps * s.abs() && dterm.abs() * c <= eps * ds.abs() {
            break;
        }
        i += 1;
        if i >= max_terms {
            return Err(ErrorKind::NoConvergence);
        }
        let (step, next_d) = if i <= j && i < e.d.len() {
            (e.d[i] / dv, e.d[i])
        } else {
            (ratios[i], T::one())
        };
        let y_a = T::from_f64((2 * k + 1) as f64) / cx * y_k - y_prev;
        let y_b = T::from_f64((2 * k + 3) as f64) / cx * y_a - y_k;
        term = -term * step * radial_weight_step::<T>(m, r) * (y_b / y_k);
        dterm = term * (y_a / y_b - T::from_f64((k + 3) as f64) / cx);
        if !(term.is_finite() && dterm.is_finite()) {
            return Err(ErrorKind::NoConvergence);
        }
        let norm = y_b.abs();
        y_prev = y_a / norm;
        y_k = y_b / norm;
        k += 2;
        dv = next_d;
    }

    let den = e.radial_denominator();
    let (a, da) = radial_prefactor(m, x);
    Ok(Pair::new(a * s / den, (da * s + a * ds) / den))
}
