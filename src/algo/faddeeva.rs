//! Faddeeva function w(z) = exp(-z²) erfc(-iz).
//!
//! Poppe & Wijers, ACM TOMS Algorithm 680. The first quadrant is split into
//! three regions by the scaled modulus ρ² = (x/6.3)² + (y/4.4)²:
//! a Taylor series for erf near the origin (ρ² < 0.085264), Laplace
//! continued fraction far out (ρ² > 1), and a Taylor series with the
//! continued fraction as its convergence accelerator in between.
//! The other quadrants follow from w(-z) = 2exp(-z²) - w(z) and
//! w(z̄) = conj(w(-z)).

use num_complex::Complex;

use crate::algo::constants::TWO_OVER_SQRT_PI;
use crate::machine::SpecialFloat;

/// Region of the first quadrant selected by the scaled modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Taylor,
    ContinuedFraction,
    Accelerated,
}

fn region<T: SpecialFloat>(qrho: T) -> Region {
    if qrho < T::from_f64(0.085264) {
        Region::Taylor
    } else if qrho > T::one() {
        Region::ContinuedFraction
    } else {
        Region::Accelerated
    }
}

/// Compute w(z).
///
/// In the lower half-plane the reflection term `2exp(-z²)` overflows once
/// `y² - x²` exceeds the exponent range; the result is then non-finite.
pub(crate) fn faddeeva<T: SpecialFloat>(z: Complex<T>) -> Complex<T> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);
    let factor = T::from_f64(TWO_OVER_SQRT_PI);

    let xi = z.re;
    let yi = z.im;
    let xabs = xi.abs();
    let yabs = yi.abs();
    let x = xabs / T::from_f64(6.3);
    let y = yabs / T::from_f64(4.4);

    let mut qrho = x * x + y * y;
    let xquad = xabs * xabs - yabs * yabs;
    let yquad = two * xabs * yabs;

    let reg = region(qrho);
    let (mut u, mut v);
    // exp(-z²) for the first-quadrant point, reused by the reflection
    let (mut u2, mut v2) = (zero, zero);

    if reg == Region::Taylor {
        qrho = (one - T::from_f64(0.85) * y) * qrho.sqrt();
        let n = (T::from_f64(6.0) + T::from_f64(72.0) * qrho)
            .round()
            .to_usize()
            .unwrap_or(6);
        let mut j = T::from_f64((2 * n + 1) as f64);
        let mut xsum = one / j;
        let mut ysum = zero;
        for i in (1..=n).rev() {
            let fi = T::from_f64(i as f64);
            j = j - two;
            let xaux = (xsum * xquad - ysum * yquad) / fi;
            ysum = (xsum * yquad + ysum * xquad) / fi;
            xsum = xaux + one / j;
        }
        let u1 = -factor * (xsum * yabs + ysum * xabs) + one;
        let v1 = factor * (xsum * xabs - ysum * yabs);
        let daux = (-xquad).exp();
        u2 = daux * yquad.cos();
        v2 = -daux * yquad.sin();
        u = u1 * u2 - v1 * v2;
        v = u1 * v2 + v1 * u2;
    } else {
        let (h, kapn, nu) = if reg == Region::ContinuedFraction {
            qrho = qrho.sqrt();
            let nu = (T::from_f64(3.0)
                + T::from_f64(1442.0) / (T::from_f64(26.0) * qrho + T::from_f64(77.0)))
            .to_usize()
            .unwrap_or(3);
            (zero, 0usize, nu)
        } else {
            qrho = (one - y) * (one - qrho).sqrt();
            let h = T::from_f64(1.88) * qrho;
            let kapn = (T::from_f64(7.0) + T::from_f64(34.0) * qrho)
                .round()
                .to_usize()
                .unwrap_or(7);
            let nu = (T::from_f64(16.0) + T::from_f64(26.0) * qrho)
                .round()
                .to_usize()
                .unwrap_or(16);
            (h, kapn, nu)
        };

        let accelerate = h > zero;
        let h2 = two * h;
        let mut qlambda = if accelerate {
            h2.powi(kapn as i32)
        } else {
            zero
        };

        let (mut rx, mut ry, mut sx, mut sy) = (zero, zero, zero, zero);
        for n in (0..=nu).rev() {
            let np1 = T::from_f64((n + 1) as f64);
            let tx = yabs + h + np1 * rx;
            let ty = xabs - np1 * ry;
            let c = half / (tx * tx + ty * ty);
            rx = c * tx;
            ry = c * ty;
            if accelerate && n <= kapn {
                let tx = qlambda + sx;
                sx = rx * tx - ry * sy;
                sy = ry * tx + rx * sy;
                qlambda = qlambda / h2;
            }
        }

        if accelerate {
            u = factor * sx;
            v = factor * sy;
        } else {
            u = factor * rx;
            v = factor * ry;
        }
        if yabs == zero {
            u = (-xabs * xabs).exp();
        }
    }

    if yi < zero {
        if reg == Region::Taylor {
            u2 = two * u2;
            v2 = two * v2;
        } else {
            let w1 = two * xquad.exp();
            u2 = w1 * yquad.cos();
            v2 = -w1 * yquad.sin();
        }
        u = u2 - u;
        v = v2 - v;
        if xi > zero {
            v = -v;
        }
    } else if xi < zero {
        v = -v;
    }

    Complex::new(u, v)
}
