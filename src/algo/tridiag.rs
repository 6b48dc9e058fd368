//! Tridiagonal eigenproblems.
//!
//! The Mathieu and spheroidal characteristic values are eigenvalues of
//! (symmetrisable) tridiagonal matrices. The k-th eigenvalue is isolated by
//! Sturm-sequence bisection; its eigenvector by a few steps of inverse
//! iteration with a partially pivoted tridiagonal solve.

use alloc::vec::Vec;

use crate::machine::SpecialFloat;
use crate::types::ErrorKind;

const BISECTION_STEPS: usize = 200;
const INVERSE_ITERATIONS: usize = 3;

/// `n` zeros, or `Memory` if the allocation cannot be made.
pub(crate) fn try_zeroed<T: SpecialFloat>(n: usize) -> Result<Vec<T>, ErrorKind> {
    let mut v = Vec::new();
    v.try_reserve_exact(n).map_err(|_| ErrorKind::Memory)?;
    v.resize(n, T::zero());
    Ok(v)
}

/// Number of eigenvalues below `x` of the symmetric tridiagonal matrix
/// with diagonal `d` and off-diagonal `e`.
pub(crate) fn sturm_count<T: SpecialFloat>(d: &[T], e: &[T], x: T) -> usize {
    let eps = T::MACH_EPSILON;
    let mut count = 0;
    let mut q = d[0] - x;
    if q < T::zero() {
        count += 1;
    }
    for i in 1..d.len() {
        if q == T::zero() {
            q = eps * (e[i - 1].abs() + eps);
        }
        q = d[i] - x - e[i - 1] * e[i - 1] / q;
        if q < T::zero() {
            count += 1;
        }
    }
    count
}

/// Gershgorin interval containing every eigenvalue.
fn gershgorin<T: SpecialFloat>(d: &[T], e: &[T]) -> (T, T) {
    let n = d.len();
    let mut lo = T::infinity();
    let mut hi = T::neg_infinity();
    for i in 0..n {
        let left = if i > 0 { e[i - 1].abs() } else { T::zero() };
        let right = if i + 1 < n { e[i].abs() } else { T::zero() };
        lo = lo.min(d[i] - left - right);
        hi = hi.max(d[i] + left + right);
    }
    (lo, hi)
}

/// The `k`-th smallest eigenvalue (0-based) of the symmetric tridiagonal
/// matrix `(d, e)`, by bisection.
pub(crate) fn eigenvalue<T: SpecialFloat>(d: &[T], e: &[T], k: usize) -> Result<T, ErrorKind> {
    if k >= d.len() || e.len() + 1 < d.len() {
        return Err(ErrorKind::Arg);
    }
    let half = T::from_f64(0.5);
    let two_eps = T::from_f64(2.0) * T::MACH_EPSILON;
    let (mut lo, mut hi) = gershgorin(d, e);
    if !(lo.is_finite() && hi.is_finite()) {
        return Err(ErrorKind::Other);
    }
    for _ in 0..BISECTION_STEPS {
        let mid = half * (lo + hi);
        if mid == lo || mid == hi {
            break;
        }
        if sturm_count(d, e, mid) > k {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo <= two_eps * lo.abs().max(hi.abs()) {
            break;
        }
    }
    Ok(half * (lo + hi))
}

/// Solve `A x = rhs` for the tridiagonal `A` with sub-diagonal `sub`,
/// diagonal `diag` and super-diagonal `sup`, using Gaussian elimination
/// with partial pivoting. Zero pivots are replaced by machine epsilon so a
/// singular shift still yields a (large) solution.
pub(crate) fn solve<T: SpecialFloat>(
    sub: &[T],
    diag: &[T],
    sup: &[T],
    rhs: &[T],
) -> Result<Vec<T>, ErrorKind> {
    let n = diag.len();
    let eps = T::MACH_EPSILON;
    // rows of U: u0 on the diagonal, u1 and u2 on the two super-diagonals
    let mut u0 = try_zeroed(n)?;
    let mut u1 = try_zeroed(n)?;
    let mut u2 = try_zeroed(n)?;
    let mut r = try_zeroed(n)?;
    r.copy_from_slice(rhs);
    u0[0] = diag[0];
    if n > 1 {
        u1[0] = sup[0];
    }
    for i in 0..n.saturating_sub(1) {
        let next_diag = diag[i + 1];
        let next_sup = if i + 2 < n { sup[i + 1] } else { T::zero() };
        let lower = sub[i];
        let mult;
        if lower.abs() > u0[i].abs() {
            mult = u0[i] / lower;
            let (o1, o2) = (u1[i], u2[i]);
            u0[i] = lower;
            u1[i] = next_diag;
            u2[i] = next_sup;
            r.swap(i, i + 1);
            u0[i + 1] = o1 - mult * next_diag;
            u1[i + 1] = o2 - mult * next_sup;
        } else {
            if u0[i] == T::zero() {
                u0[i] = eps;
            }
            mult = lower / u0[i];
            u0[i + 1] = next_diag - mult * u1[i];
            u1[i + 1] = next_sup - mult * u2[i];
        }
        r[i + 1] = r[i + 1] - mult * r[i];
    }
    if u0[n - 1] == T::zero() {
        u0[n - 1] = eps;
    }

    let mut x = try_zeroed(n)?;
    for i in (0..n).rev() {
        let mut s = r[i];
        if i + 1 < n {
            s = s - u1[i] * x[i + 1];
        }
        if i + 2 < n {
            s = s - u2[i] * x[i + 2];
        }
        x[i] = s / u0[i];
    }
    Ok(x)
}

/// Unit eigenvector for the eigenvalue `lambda` of the tridiagonal matrix
/// `(sub, diag, sup)`.
pub(crate) fn eigenvector<T: SpecialFloat>(
    sub: &[T],
    diag: &[T],
    sup: &[T],
    lambda: T,
) -> Result<Vec<T>, ErrorKind> {
    let n = diag.len();
    let mut shifted = try_zeroed(n)?;
    for (s, &d) in shifted.iter_mut().zip(diag) {
        *s = d - lambda;
    }
    let mut v = try_zeroed(n)?;
    v.iter_mut().for_each(|t| *t = T::one());
    for _ in 0..INVERSE_ITERATIONS {
        let x = solve(sub, &shifted, sup, &v)?;
        let norm = x.iter().fold(T::zero(), |acc, &t| acc + t * t).sqrt();
        if !(norm.is_finite() && norm > T::zero()) {
            return Err(ErrorKind::NoConvergence);
        }
        for (t, xi) in v.iter_mut().zip(x) {
            *t = xi / norm;
        }
    }
    Ok(v)
}
