//! Kernels for the Gauss hypergeometric function 2F1(a, b; c; z).
//!
//! Every kernel is a power series in some transformed variable: the
//! Maclaurin series itself, the connection formulas around z = 1 and
//! z = ∞ (with their digamma limit forms when the parameter difference
//! is an integer), and the López–Temme expansion in z/(z - 2), which
//! converges near e^{±iπ/3} where all the others are slow.

use num_complex::Complex;

use crate::gamma::{gamma_value, psi_value, rgamma_value};
use crate::machine::SpecialFloat;
use crate::types::ErrorKind;
use crate::utils::{is_nonpositive_integer, near_integer};

type C<T> = Complex<T>;

fn real<T: SpecialFloat>(x: T) -> C<T> {
    Complex::new(x, T::zero())
}

fn converged<T: SpecialFloat>(term: C<T>, sum: C<T>) -> bool {
    term.norm() <= T::MACH_EPSILON * sum.norm()
}

fn factorial<T: SpecialFloat>(n: usize) -> T {
    (2..=n).fold(T::one(), |acc, k| acc * T::from_f64(k as f64))
}

/// ψ(x)/Γ(x), finite at the poles: (-1)^{k+1} k! at x = -k.
fn psi_over_gamma<T: SpecialFloat>(x: T) -> T {
    if is_nonpositive_integer(x) {
        let k = (-x).to_usize().unwrap_or(0);
        let f: T = factorial(k);
        return if k % 2 == 0 { -f } else { f };
    }
    psi_value(x) * rgamma_value(x)
}

/// Maclaurin series, |z| < 1.
pub(crate) fn maclaurin<T: SpecialFloat>(a: T, b: T, c: T, z: C<T>) -> Result<C<T>, ErrorKind> {
    let one = T::one();
    let mut s = real(one);
    let mut t = s;
    for k in 0..T::MAX_TERMS {
        let k = T::from_f64(k as f64);
        t = t * z * ((a + k) * (b + k) / ((c + k) * (k + one)));
        s = s + t;
        if converged(t, s) {
            return Ok(s);
        }
    }
    Err(ErrorKind::NoConvergence)
}

/// Terminating series for `a` a non-positive integer.
pub(crate) fn polynomial<T: SpecialFloat>(a: T, b: T, c: T, z: C<T>) -> C<T> {
    let n = (-a).to_usize().unwrap_or(0);
    let one = T::one();
    let mut s = real(one);
    let mut t = s;
    for k in 0..n {
        let k = T::from_f64(k as f64);
        t = t * z * ((a + k) * (b + k) / ((c + k) * (k + one)));
        s = s + t;
    }
    s
}

/// Pfaff transformation: `(1 - z)^{-a} F(a, c - b; c; z/(z - 1))` with
/// `kernel` evaluating the transformed function.
pub(crate) fn pfaff<T: SpecialFloat>(
    kernel: fn(T, T, T, C<T>) -> Result<C<T>, ErrorKind>,
    a: T,
    b: T,
    c: T,
    z: C<T>,
) -> Result<C<T>, ErrorKind> {
    let one = real(T::one());
    let w = z / (z - one);
    Ok((one - z).powf(-a) * kernel(a, c - b, c, w)?)
}

/// Connection formula around z = 1 (DLMF 15.8.4), |1 - z| < 1.
pub(crate) fn one_minus_z<T: SpecialFloat>(a: T, b: T, c: T, z: C<T>) -> Result<C<T>, ErrorKind> {
    let one = T::one();
    let m = c - a - b;
    let w = real(one) - z;
    if let Some(mi) = near_integer(m) {
        let c = a + b + mi;
        if mi < T::zero() {
            // Euler: F(a, b; c; z) = (1 - z)^{c-a-b} F(c - a, c - b; c; z)
            let k = (-mi).to_i32().ok_or(ErrorKind::Other)?;
            return Ok(w.powi(-k) * one_minus_z(c - a, c - b, c, z)?);
        }
        let mi = mi.to_usize().ok_or(ErrorKind::Other)?;
        return one_minus_z_integer(a, b, mi, z);
    }
    let gc = gamma_value(c);
    let t1 = maclaurin(a, b, one - m, w)?
        * (gc * gamma_value(m) * rgamma_value(c - a) * rgamma_value(c - b));
    let t2 = w.powf(m)
        * maclaurin(c - a, c - b, m + one, w)?
        * (gc * gamma_value(-m) * rgamma_value(a) * rgamma_value(b));
    Ok(t1 + t2)
}

/// Limit of the z = 1 connection formula for c = a + b + m, m = 0, 1, ...
/// (DLMF 15.8.10).
fn one_minus_z_integer<T: SpecialFloat>(a: T, b: T, m: usize, z: C<T>) -> Result<C<T>, ErrorKind> {
    let one = T::one();
    let fm = T::from_f64(m as f64);
    let w = real(one) - z;
    let c = a + b + fm;
    let gc = gamma_value(c);

    let mut s1 = real(T::zero());
    if m > 0 {
        let mut t = real(one);
        for n in 0..m {
            s1 = s1 + t;
            if n + 1 < m {
                let nf = T::from_f64(n as f64);
                t = t * w * ((a + nf) * (b + nf) / ((nf + one) * (one - fm + nf)));
            }
        }
        s1 = s1 * (gc * gamma_value(fm) * rgamma_value(a + fm) * rgamma_value(b + fm));
    }

    let lw = w.ln();
    let rab = rgamma_value(a) * rgamma_value(b);
    let mut t = real(one / factorial::<T>(m));
    let mut s2 = real(T::zero());
    let mut done = false;
    for n in 0..T::MAX_TERMS {
        let nf = T::from_f64(n as f64);
        let psis = -psi_value(nf + one) - psi_value(nf + fm + one)
            + psi_value(a + nf + fm)
            + psi_value(b + nf + fm);
        let term = t * (lw + real(psis)) * rab;
        s2 = s2 + term;
        if n > 0 && converged(term, s2) {
            done = true;
            break;
        }
        t = t * w * ((a + fm + nf) * (b + fm + nf) / ((nf + one) * (nf + fm + one)));
    }
    if !done {
        return Err(ErrorKind::NoConvergence);
    }
    let zm1 = z - real(one);
    Ok(s1 - zm1.powi(m as i32) * s2 * gc)
}

/// Connection formula around z = ∞ (DLMF 15.8.2), |z| > 1.
pub(crate) fn one_over_z<T: SpecialFloat>(a: T, b: T, c: T, z: C<T>) -> Result<C<T>, ErrorKind> {
    let one = T::one();
    let d = b - a;
    if let Some(di) = near_integer(d) {
        let (a, di) = if di < T::zero() { (a + di, -di) } else { (a, di) };
        let m = di.to_usize().ok_or(ErrorKind::Other)?;
        return one_over_z_integer(a, m, c, z);
    }
    let mz = -z;
    let iz = real(one) / z;
    let gc = gamma_value(c);
    let t1 = mz.powf(-a)
        * maclaurin(a, a - c + one, one - d, iz)?
        * (gc * gamma_value(d) * rgamma_value(b) * rgamma_value(c - a));
    let t2 = mz.powf(-b)
        * maclaurin(b, b - c + one, one + d, iz)?
        * (gc * gamma_value(-d) * rgamma_value(a) * rgamma_value(c - b));
    Ok(t1 + t2)
}

/// Limit of the z = ∞ connection formula for b = a + m, m = 0, 1, ...
/// (DLMF 15.8.8). Poles of Γ(c - a - m - n) are crossed with ψ/Γ.
fn one_over_z_integer<T: SpecialFloat>(a: T, m: usize, c: T, z: C<T>) -> Result<C<T>, ErrorKind> {
    let one = T::one();
    let fm = T::from_f64(m as f64);
    let mz = -z;
    let iz = real(one) / z;
    let gc = gamma_value(c);
    let ram = rgamma_value(a + fm);

    let mut s1 = real(T::zero());
    if m > 0 {
        let mut t = real(one);
        for n in 0..m {
            let nf = T::from_f64(n as f64);
            s1 = s1 + t * (gamma_value(fm - nf) * rgamma_value(c - a - nf));
            t = t * iz * ((a + nf) / (nf + one));
        }
        s1 = s1 * mz.powf(-a) * (gc * ram);
    }

    let lz = mz.ln();
    // (a)_m / m!
    let pochhammer = (0..m).fold(one, |acc, k| {
        let k = T::from_f64(k as f64);
        acc * (a + k) / (k + one)
    });
    let sign_m = if m % 2 == 0 { one } else { -one };
    let mut t = real(pochhammer);
    let mut u = t * (sign_m * rgamma_value(c - a - fm));
    let mut w: Option<C<T>> = None;
    let mut s2 = real(T::zero());
    let mut done = false;
    for n in 0..T::MAX_TERMS {
        let nf = T::from_f64(n as f64);
        let x = c - a - fm - nf;
        let term = if is_nonpositive_integer(x) {
            let wv = *w.get_or_insert_with(|| {
                let sign = if (n + m) % 2 == 0 { one } else { -one };
                t * (sign * psi_over_gamma(x))
            });
            -wv
        } else {
            let psis = psi_value(one + fm + nf) + psi_value(one + nf)
                - psi_value(a + fm + nf)
                - psi_value(x);
            u * (lz + real(psis))
        };
        s2 = s2 + term;
        if n > 0 && converged(term, s2) {
            done = true;
            break;
        }
        let r = iz * ((a + fm + nf) / ((nf + fm + one) * (nf + one)));
        let grow = one - c + a + fm + nf;
        t = t * r;
        u = u * r * grow;
        if let Some(wv) = w.as_mut() {
            *wv = *wv * r * grow;
        }
    }
    if !done {
        return Err(ErrorKind::NoConvergence);
    }
    Ok(s1 + mz.powf(-a - fm) * s2 * (gc * ram))
}

/// López & Temme (2013) expansion in w = z/(z - 2):
/// `F = (1 - z/2)^{-a} Σ (a)_n/n! Φ_n w^n` with Φ_n from a three-term
/// recurrence. Converges for Re z < 1, uniformly near e^{±iπ/3}.
pub(crate) fn lopez_temme<T: SpecialFloat>(a: T, b: T, c: T, z: C<T>) -> Result<C<T>, ErrorKind> {
    let one = T::one();
    let two = T::from_f64(2.0);
    let w = z / (z - real(two));
    let mut phi_prev = one;
    let mut phi = one - two * b / c;
    let mut t = w * a;
    let mut s = real(one) + t * phi;
    let mut done = false;
    for n in 1..T::MAX_TERMS {
        let nf = T::from_f64(n as f64);
        let phi_next = (nf * phi_prev - (two * b - c) * phi) / (c + nf);
        phi_prev = phi;
        phi = phi_next;
        t = t * w * ((a + nf) / (nf + one));
        let term = t * phi;
        s = s + term;
        if converged(term, s) {
            done = true;
            break;
        }
    }
    if !done {
        return Err(ErrorKind::NoConvergence);
    }
    Ok((real(one) - z / two).powf(-a) * s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn close(a: Complex64, b: Complex64, tol: f64) -> bool {
        (a - b).norm() <= tol * b.norm()
    }

    #[test]
    fn maclaurin_elementary() {
        // F(1, 1; 2; z) = -ln(1 - z)/z
        let z = Complex64::new(0.3, 0.2);
        let expected = -(Complex64::new(1.0, 0.0) - z).ln() / z;
        assert!(close(maclaurin(1.0, 1.0, 2.0, z).unwrap(), expected, 1e-15));
    }

    #[test]
    fn polynomial_terminates() {
        // F(-2, b; c; z) = 1 - 2bz/c + b(b+1)z²/(c(c+1))
        let z = Complex64::new(2.0, 0.0);
        let (b, c) = (1.5, 3.0);
        let expected = 1.0 - 2.0 * b * 2.0 / c + b * (b + 1.0) * 4.0 / (c * (c + 1.0));
        assert!((polynomial(-2.0, b, c, z).re - expected).abs() < 1e-15);
    }

    #[test]
    fn connection_formulas_agree_with_maclaurin() {
        let z = Complex64::new(0.6, 0.1);
        let direct = maclaurin(0.3, 1.7, 2.9, z).unwrap();
        assert!(close(one_minus_z(0.3, 1.7, 2.9, z).unwrap(), direct, 1e-13));
        // integer c - a - b
        let direct = maclaurin(0.3, 1.7, 4.0, z).unwrap();
        assert!(close(one_minus_z(0.3, 1.7, 4.0, z).unwrap(), direct, 1e-13));
        let direct = maclaurin(0.3, 1.7, 2.0, z).unwrap();
        assert!(close(one_minus_z(0.3, 1.7, 2.0, z).unwrap(), direct, 1e-13));
    }

    #[test]
    fn one_over_z_matches_reference() {
        // mpmath hyp2f1
        let z = Complex64::new(-3.0, 1.0);
        let v = one_over_z(0.5, 1.25, 2.5, z).unwrap();
        assert!(close(v, Complex64::new(0.65321284567817053, 0.055585078204043842), 1e-13));
        // integer b - a
        let v = one_over_z(0.5, 2.5, 2.25, z).unwrap();
        assert!(close(v, Complex64::new(0.46386461304945316, 0.059496729908530877), 1e-13));
    }

    #[test]
    fn lopez_temme_near_critical_points() {
        let z = Complex64::from_polar(1.0, core::f64::consts::FRAC_PI_3);
        let v = lopez_temme(0.7, 1.3, 2.2, z).unwrap();
        assert!(close(v, Complex64::new(0.94821211547363067, 0.43911301777056319), 1e-13));
    }
}
