//! Characteristic values and Fourier coefficients of Mathieu functions.
//!
//! For q >= 0 the four solution families each reduce to a tridiagonal
//! eigenproblem on their Fourier coefficients:
//!
//! | family | function | harmonics |
//! |---|---|---|
//! | `EvenCosine` | ce_2n | cos 2kx |
//! | `OddCosine` | ce_2n+1 | cos (2k+1)x |
//! | `OddSine` | se_2n+1 | sin (2k+1)x |
//! | `EvenSine` | se_2n+2 | sin (2k+2)x |
//!
//! Coefficients are normalised so that (1/π)∫ce² = (1/π)∫se² = 1 over a
//! period, with signs fixed by ce_m(0, q) > 0 and se_m'(0, q) > 0.

use alloc::vec::Vec;

use crate::algo::constants::FRAC_1_SQRT_2;
use crate::algo::tridiag::{eigenvalue, eigenvector, try_zeroed};
use crate::machine::SpecialFloat;
use crate::types::ErrorKind;

/// Parity class of a Mathieu function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    EvenCosine,
    OddCosine,
    OddSine,
    EvenSine,
}

impl Family {
    /// Family of ce_m.
    pub(crate) fn cosine(m: u32) -> Self {
        if m % 2 == 0 {
            Family::EvenCosine
        } else {
            Family::OddCosine
        }
    }

    /// Family of se_m, `m >= 1`.
    pub(crate) fn sine(m: u32) -> Self {
        if m % 2 == 0 {
            Family::EvenSine
        } else {
            Family::OddSine
        }
    }

    pub(crate) fn is_sine(self) -> bool {
        matches!(self, Family::OddSine | Family::EvenSine)
    }

    /// Harmonic carried by coefficient `k`.
    pub(crate) fn harmonic(self, k: usize) -> usize {
        match self {
            Family::EvenCosine => 2 * k,
            Family::OddCosine | Family::OddSine => 2 * k + 1,
            Family::EvenSine => 2 * k + 2,
        }
    }

    /// Position of order `m` in the family's eigenvalue ordering.
    pub(crate) fn index(self, m: u32) -> usize {
        let m = m as usize;
        match self {
            Family::EvenCosine => m / 2,
            Family::OddCosine | Family::OddSine => (m - 1) / 2,
            Family::EvenSine => m / 2 - 1,
        }
    }
}

/// Truncation order for the coefficient matrix.
pub(crate) fn matrix_size<T: SpecialFloat>(m: u32, q: T) -> usize {
    let grow = (T::from_f64(2.0) * q.abs().sqrt()).to_usize().unwrap_or(0);
    m as usize / 2 + 25 + grow
}

/// Symmetric tridiagonal `(diagonal, off-diagonal)` whose eigenvalues are
/// the characteristic values of `family`.
///
/// `EvenCosine` is symmetrised by scaling A_0 by √2, so its first
/// off-diagonal entry is √2·q.
fn matrix<T: SpecialFloat>(family: Family, q: T, n: usize) -> Result<(Vec<T>, Vec<T>), ErrorKind> {
    if !q.is_finite() {
        return Err(ErrorKind::NoConvergence);
    }
    let mut d = try_zeroed(n)?;
    let mut e = try_zeroed(n.saturating_sub(1))?;
    for (k, dk) in d.iter_mut().enumerate() {
        let h = T::from_f64(family.harmonic(k) as f64);
        *dk = h * h;
    }
    e.iter_mut().for_each(|v| *v = q);
    match family {
        Family::EvenCosine => {
            if let Some(first) = e.first_mut() {
                *first = T::from_f64(2.0).sqrt() * q;
            }
        }
        Family::OddCosine => d[0] = d[0] + q,
        Family::OddSine => d[0] = d[0] - q,
        Family::EvenSine => {}
    }
    Ok((d, e))
}

/// Characteristic value a_m(q) or b_m(q) for `q >= 0`.
pub(crate) fn characteristic_value<T: SpecialFloat>(
    family: Family,
    m: u32,
    q: T,
) -> Result<T, ErrorKind> {
    let n = matrix_size(m, q);
    let (d, e) = matrix(family, q, n)?;
    eigenvalue(&d, &e, family.index(m))
}

/// A Mathieu function as a truncated Fourier series.
#[derive(Debug, Clone)]
pub(crate) struct FourierSeries<T> {
    pub(crate) family: Family,
    pub(crate) coefficients: Vec<T>,
}

impl<T: SpecialFloat> FourierSeries<T> {
    /// Value and derivative at `x` radians.
    pub(crate) fn eval(&self, x: T) -> (T, T) {
        let mut f = T::zero();
        let mut df = T::zero();
        for (k, &c) in self.coefficients.iter().enumerate() {
            let h = T::from_f64(self.family.harmonic(k) as f64);
            let (s, co) = (h * x).sin_cos();
            if self.family.is_sine() {
                f = f + c * s;
                df = df + c * h * co;
            } else {
                f = f + c * co;
                df = df - c * h * s;
            }
        }
        (f, df)
    }
}

/// Normalised Fourier coefficients of the order
/// `m` member of `family`, `q >= 0`.
pub(crate) fn fourier_series<T: SpecialFloat>(
    family: Family,
    m: u32,
    q: T,
) -> Result<FourierSeries<T>, ErrorKind> {
    let n = matrix_size(m, q);
    let (d, e) = matrix(family, q, n)?;
    let characteristic = eigenvalue(&d, &e, family.index(m))?;
    let mut v = eigenvector(&e, &d, &e, characteristic)?;
    if family == Family::EvenCosine {
        v[0] = v[0] * T::from_f64(FRAC_1_SQRT_2);
    }

    // ce(0) = ΣA, se'(0) = Σ h·B
    let anchor = v.iter().enumerate().fold(T::zero(), |acc, (k, &c)| {
        if family.is_sine() {
            acc + T::from_f64(family.harmonic(k) as f64) * c
        } else {
            acc + c
        }
    });
    if anchor < T::zero() {
        v.iter_mut().for_each(|c| *c = -*c);
    }
    Ok(FourierSeries {
        family,
        coefficients: v,
    })
}
