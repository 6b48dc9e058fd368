//! Wright's generalized Bessel function
//! `Φ(a, b; x) = Σ_k x^k / (k! Γ(a k + b))` for `a, b, x >= 0`.
//!
//! All terms are positive and their logarithms are concave in `k`, so the
//! series has a single peak near `k = t₀ / a`, where `t₀ = (a x)^{1/(1+a)}`
//! is the saddle point of the Hankel integral. Which kernel runs is decided
//! by [`classify_wright_bessel`]:
//!
//! | regime | condition |
//! |---|---|
//! | `Series` | peak index at most 10⁴; summed from `k = 0` |
//! | `Asymptotic` | otherwise, when `t₀ >= max(100, 30 b²)` |
//! | `CentredSeries` | otherwise; summed outward from the peak |
//!
//! The series are summed in log space relative to the largest term. The
//! ratio of consecutive terms needs `ln Γ(z + a) - ln Γ(z)`, which is
//! evaluated from the Stirling remainder for large `z` to avoid
//! cancellation.

use crate::algo::constants::LN_2PI;
use crate::algo::gamln::{gamln, stirling_series};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, SpecialError};

/// Terms summed in each direction before giving up.
const MAX_TERMS: usize = 200_000;
/// Largest peak index summed from `k = 0`.
const SERIES_MAX_PEAK: f64 = 1.0e4;
/// Smallest saddle point `t₀` for the asymptotic expansion.
const ASYMPTOTIC_MIN_T0: f64 = 100.0;
/// The expansion also needs `t₀ >= ASYMPTOTIC_B_SCALE · b²`.
const ASYMPTOTIC_B_SCALE: f64 = 30.0;

/// Correction coefficients of the asymptotic expansion,
///
/// `Φ ~ t₀^{1/2-b} e^Z / √(2π(1+a)) · (1 + Σ_k c_k / t₀^k)`,
///
/// with `Z = (1 + a) t₀ / a`. Each `c_k = N_k(a, b) / (D_k (1+a)^k)`; `N_k`
/// is stored by powers of `b`, each entry a polynomial in `a` (ascending).
/// Derived by Laplace's method at the saddle point; for `a = b = 1` they
/// reduce to the Hankel coefficients of `I_0(2√x)`.
const WRIGHT_C: [(f64, &[&[f64]]); 4] = [
    (24.0, &[&[-2.0, -5.0, -2.0], &[12.0, 12.0], &[-12.0]]),
    (
        1152.0,
        &[
            &[4.0, -28.0, -87.0, -28.0, 4.0],
            &[48.0, 216.0, 24.0, -144.0],
            &[-96.0, 120.0, 480.0],
            &[-96.0, -480.0],
            &[144.0],
        ],
    ),
    (
        414720.0,
        &[
            &[1112.0, 6036.0, -8934.0, -38953.0, -8934.0, 6036.0, 1112.0],
            &[-2160.0, 28800.0, 106020.0, -17820.0, -89280.0, 3600.0],
            &[-13680.0, -70560.0, 102060.0, 231840.0, -65520.0],
            &[11520.0, -90720.0, -211680.0, 161280.0],
            &[21600.0, 75600.0, -151200.0],
            &[-8640.0, 60480.0],
            &[-8640.0],
        ],
    ),
    (
        39813120.0,
        &[
            &[
                -9136.0, 430496.0, 2055608.0, -1245112.0, -8204587.0, -1245112.0, 2055608.0,
                430496.0, -9136.0,
            ],
            &[
                -266880.0, -1654464.0, 6471648.0, 24003888.0, -7433040.0, -21265056.0,
                2686272.0, 373632.0,
            ],
            &[
                205824.0, -5491008.0, -19741248.0, 28480944.0, 48359232.0, -26296128.0,
                551424.0,
            ],
            &[
                1163520.0, 5448960.0, -27927360.0, -41624640.0, 56966400.0, -7453440.0,
            ],
            &[-362880.0, 10281600.0, 14968800.0, -52617600.0, 15120000.0],
            &[-1257984.0, -1886976.0, 23659776.0, -13257216.0],
            &[0.0, -5080320.0, 5806080.0],
            &[414720.0, -1244160.0],
            &[103680.0],
        ],
    ),
];

/// Kernel selected for `(a, b, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrightRegime {
    /// `x == 0`: `1/Γ(b)`.
    Origin,
    /// `a == 0`: `e^x / Γ(b)`.
    Exponential,
    /// Power series summed from `k = 0`.
    Series,
    /// Power series summed outward from its largest term.
    CentredSeries,
    /// Wright's exponential asymptotic expansion.
    Asymptotic,
}

/// Saddle point `t₀ = (a x)^{1/(1+a)}` of the Hankel integral.
fn saddle<T: SpecialFloat>(a: T, x: T) -> T {
    ((a.ln() + x.ln()) / (T::one() + a)).exp()
}

/// Kernel used for `a, b, x >= 0` (finite).
pub fn classify_wright_bessel<T: SpecialFloat>(a: T, b: T, x: T) -> WrightRegime {
    if x == T::zero() {
        return WrightRegime::Origin;
    }
    if a == T::zero() {
        return WrightRegime::Exponential;
    }
    let t0 = saddle(a, x);
    if t0 / a <= T::from_f64(SERIES_MAX_PEAK) {
        return WrightRegime::Series;
    }
    let threshold = T::from_f64(ASYMPTOTIC_MIN_T0).max(T::from_f64(ASYMPTOTIC_B_SCALE) * b * b);
    if t0 >= threshold {
        WrightRegime::Asymptotic
    } else {
        WrightRegime::CentredSeries
    }
}

/// `ln Γ(z + a) - ln Γ(z)` for `z > 0`, `a >= 0`.
fn lgamma_diff<T: SpecialFloat>(z: T, a: T) -> Result<T, ErrorKind> {
    if a == T::zero() {
        return Ok(T::zero());
    }
    if z >= T::from_f64(10.0) {
        let half = T::from_f64(0.5);
        return Ok((z + a - half) * (a / z).ln_1p() + a * z.ln() - a + stirling_series(z + a)
            - stirling_series(z));
    }
    Ok(gamln(z + a)? - gamln(z)?)
}

/// Running `ln Σ e^{l}`, kept as the largest exponent plus the sum of the
/// other terms relative to it.
struct LogSum<T> {
    max: T,
    rest: T,
}

impl<T: SpecialFloat> LogSum<T> {
    fn new(l: T) -> Self {
        Self {
            max: l,
            rest: T::zero(),
        }
    }

    /// Add `e^l`; returns the new term relative to the running total.
    fn push(&mut self, l: T) -> T {
        let one = T::one();
        if l > self.max {
            self.rest = (self.rest + one) * (self.max - l).exp();
            self.max = l;
            return one;
        }
        let r = (l - self.max).exp();
        self.rest = self.rest + r;
        r / (one + self.rest)
    }

    fn ln(&self) -> T {
        self.max + self.rest.ln_1p()
    }
}

/// Add the terms after index `k`, whose log is `lt`, until they are past the
/// peak and negligible.
fn sum_upward<T: SpecialFloat>(
    sum: &mut LogSum<T>,
    (a, b, lx): (T, T, T),
    mut lt: T,
    mut k: usize,
) -> Result<(), ErrorKind> {
    let half_eps = T::MACH_EPSILON * T::from_f64(0.5);
    for _ in 0..MAX_TERMS {
        let z = a * T::from_f64(k as f64) + b;
        let next = lt + lx - T::from_f64((k + 1) as f64).ln() - lgamma_diff(z, a)?;
        k += 1;
        if sum.push(next) < half_eps && next < lt {
            return Ok(());
        }
        lt = next;
    }
    Err(ErrorKind::NoConvergence)
}

/// Add the terms before index `k`, whose log is `lt`, down to `k = 0` or
/// until they are negligible.
fn sum_downward<T: SpecialFloat>(
    sum: &mut LogSum<T>,
    (a, b, lx): (T, T, T),
    mut lt: T,
    mut k: usize,
) -> Result<(), ErrorKind> {
    let half_eps = T::MACH_EPSILON * T::from_f64(0.5);
    for _ in 0..MAX_TERMS {
        // 1/Γ(0) = 0 drops the k = 0 term
        if k == 0 || (k == 1 && b == T::zero()) {
            return Ok(());
        }
        let z = a * T::from_f64((k - 1) as f64) + b;
        let prev = lt - lx + T::from_f64(k as f64).ln() + lgamma_diff(z, a)?;
        k -= 1;
        if sum.push(prev) < half_eps && prev < lt {
            return Ok(());
        }
        lt = prev;
    }
    Err(ErrorKind::NoConvergence)
}

/// `ln Φ` by the series from `k = 0`.
fn log_series<T: SpecialFloat>(a: T, b: T, x: T) -> Result<T, ErrorKind> {
    let lx = x.ln();
    let (lt, k) = if b > T::zero() {
        (-gamln(b)?, 0)
    } else {
        (lx - gamln(a)?, 1)
    };
    let mut sum = LogSum::new(lt);
    sum_upward(&mut sum, (a, b, lx), lt, k)?;
    Ok(sum.ln())
}

/// Index of the largest term: the root of `ln x = ln k + a ln(a k + b)`,
/// by Newton's method in `ln k` (the function is concave and decreasing
/// there, so the iteration converges from any start).
fn peak_index<T: SpecialFloat>(a: T, b: T, x: T) -> usize {
    let one = T::one();
    let lx = x.ln();
    let mut u = (saddle(a, x) / a).max(one).ln();
    for _ in 0..100 {
        let k = u.exp();
        let s = a * k + b;
        let step = (lx - u - a * s.ln()) / (-one - a * a * k / s);
        u = u - step;
        if step.abs() < T::from_f64(1e-12) {
            break;
        }
    }
    u.exp().round().to_usize().unwrap_or(1).max(1)
}

/// `ln Φ` by the series summed both ways from its largest term.
fn log_centred_series<T: SpecialFloat>(a: T, b: T, x: T) -> Result<T, ErrorKind> {
    let lx = x.ln();
    let k = peak_index(a, b, x);
    let kf = T::from_f64(k as f64);
    let lt = kf * lx - gamln(kf + T::one())? - gamln(a * kf + b)?;
    let mut sum = LogSum::new(lt);
    sum_upward(&mut sum, (a, b, lx), lt, k)?;
    sum_downward(&mut sum, (a, b, lx), lt, k)?;
    Ok(sum.ln())
}

/// `c_k(a, b)` from one row of [`WRIGHT_C`].
fn wright_coefficient<T: SpecialFloat>((scale, rows): (f64, &[&[f64]]), a: T, b: T) -> T {
    let poly = |c: &[f64], t: T| {
        c.iter()
            .rev()
            .fold(T::zero(), |acc, &v| acc.fma(t, T::from_f64(v)))
    };
    let numerator = rows.iter().rev().fold(T::zero(), |acc, row| acc.fma(b, poly(*row, a)));
    let order = (rows.len() - 1) / 2;
    numerator / (T::from_f64(scale) * (T::one() + a).powi(order as i32))
}

/// `ln Φ` by Wright's exponential asymptotic expansion.
fn log_asymptotic<T: SpecialFloat>(a: T, b: T, x: T) -> T {
    let half = T::from_f64(0.5);
    let one = T::one();
    let t0 = saddle(a, x);
    let z = t0 * (one + a) / a;
    let mut correction = T::zero();
    let mut power = one;
    for row in WRIGHT_C {
        power = power / t0;
        correction = correction + wright_coefficient(row, a, b) * power;
    }
    z + (half - b) * t0.ln() - half * (T::from_f64(LN_2PI) + (one + a).ln()) + correction.ln_1p()
}

fn log_wright<T: SpecialFloat>(a: T, b: T, x: T) -> Result<T, ErrorKind> {
    let prefactor = || -> Result<T, ErrorKind> {
        if b > T::zero() {
            Ok(-gamln(b)?)
        } else {
            Ok(T::neg_infinity())
        }
    };
    match classify_wright_bessel(a, b, x) {
        WrightRegime::Origin => prefactor(),
        WrightRegime::Exponential => Ok(x + prefactor()?),
        WrightRegime::Series => log_series(a, b, x),
        WrightRegime::CentredSeries => log_centred_series(a, b, x),
        WrightRegime::Asymptotic => Ok(log_asymptotic(a, b, x)),
    }
}

fn check<T: SpecialFloat>(function: &'static str, a: T, b: T, x: T) -> Option<Evaluation<T>> {
    if a.is_nan() || b.is_nan() || x.is_nan() {
        return Some(Evaluation::ok(T::nan()));
    }
    if a < T::zero() || b < T::zero() || x < T::zero() {
        return Some(Evaluation::domain(function, "requires a, b, x >= 0"));
    }
    if x.is_infinite() {
        return Some(Evaluation::ok(T::infinity()));
    }
    None
}

/// Wright's generalized Bessel function `Φ(a, b; x)`.
pub fn wright_bessel_raw<T: SpecialFloat>(a: T, b: T, x: T) -> Evaluation<T> {
    const NAME: &str = "wright_bessel";
    if let Some(ev) = check(NAME, a, b, x) {
        return ev;
    }
    match log_wright(a, b, x) {
        Ok(l) if l > T::log_huge() => Evaluation::with_error(
            T::infinity(),
            SpecialError::new(NAME, ErrorKind::Overflow),
        ),
        Ok(l) if l.is_finite() && l < T::log_tiny() => Evaluation::with_error(
            l.exp(),
            SpecialError::new(NAME, ErrorKind::Underflow),
        ),
        Ok(l) => Evaluation::ok(l.exp()),
        Err(kind) => Evaluation::failed(NAME, kind),
    }
}

/// Wright's generalized Bessel function `Φ(a, b; x)`.
pub fn wright_bessel<T: SpecialFloat>(a: T, b: T, x: T) -> T {
    wright_bessel_raw(a, b, x).report()
}

/// Natural logarithm of `Φ(a, b; x)`, finite well past the point where
/// [`wright_bessel`] overflows.
pub fn log_wright_bessel_raw<T: SpecialFloat>(a: T, b: T, x: T) -> Evaluation<T> {
    const NAME: &str = "log_wright_bessel";
    if let Some(ev) = check(NAME, a, b, x) {
        return ev;
    }
    Evaluation::from_result(NAME, log_wright(a, b, x))
}

/// Natural logarithm of `Φ(a, b; x)`.
pub fn log_wright_bessel<T: SpecialFloat>(a: T, b: T, x: T) -> T {
    log_wright_bessel_raw(a, b, x).report()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(a: f64, b: f64) -> f64 {
        (a - b).abs() / b.abs()
    }

    #[test]
    fn reference_values() {
        // mpmath sums of x^k/(k! Γ(ak+b))
        let cases = [
            (0.5, 1.0, 2.0, 6.6906279405071441, 1.9007077322924446),
            (1.0, 2.0, 10.0, 26.239858778249044, 3.2672795821349211),
            (2.5, 0.0, 3.0, 2.4466724536815411, 0.89472891922045235),
            (1.5, 0.5, 1e-3, 0.56518973400525649, -0.57059379180937561),
        ];
        for (a, b, x, value, log_value) in cases {
            assert!(rel(wright_bessel(a, b, x), value) < 1e-13, "Φ({a}, {b}; {x})");
            assert!(rel(log_wright_bessel(a, b, x), log_value) < 1e-13, "ln Φ({a}, {b}; {x})");
        }
    }

    #[test]
    fn large_arguments() {
        assert!(rel(log_wright_bessel(0.2, 5.0, 500.0), 260.0461941081308) < 1e-14);
        assert!(rel(wright_bessel(0.2, 5.0, 500.0), 8.6422562847984705e+112) < 1e-12);
        assert!(rel(log_wright_bessel(1.0, 1.0, 1000.0), 60.255094572585394) < 1e-14);

        let ev = wright_bessel_raw(0.1, 1.0, 1000.0);
        assert_eq!(ev.kind(), Some(ErrorKind::Overflow));
        assert!((log_wright_bessel(0.1_f64, 1.0, 1000.0) - 720.66593255908058).abs() < 1e-10);

        let ev = wright_bessel_raw(1.0, 200.0, 1.0);
        assert_eq!(ev.kind(), Some(ErrorKind::Underflow));
        assert_eq!(ev.value, 0.0);
        assert!(rel(log_wright_bessel(1.0, 200.0, 1.0), -857.92866988804444) < 1e-13);
    }

    #[test]
    fn regime_table() {
        assert_eq!(classify_wright_bessel(1.0, 1.0, 0.0), WrightRegime::Origin);
        assert_eq!(classify_wright_bessel(0.0, 1.0, 5.0), WrightRegime::Exponential);
        assert_eq!(classify_wright_bessel(0.5, 1.0, 1e4), WrightRegime::Series);
        assert_eq!(classify_wright_bessel(1.0, 1.0, 1e8), WrightRegime::Asymptotic);
        assert_eq!(classify_wright_bessel(0.5, 20.0, 1e7), WrightRegime::Asymptotic);
        assert_eq!(classify_wright_bessel(0.5, 40.0, 1e7), WrightRegime::CentredSeries);
        assert_eq!(classify_wright_bessel(1e-4, 1.0, 1e6), WrightRegime::CentredSeries);
    }

    #[test]
    fn very_large_arguments() {
        // mpmath: the terms around the largest one, summed at 40 digits
        let cases = [
            (0.5, 1.0, 1e4, 873.24468097804343041),
            (0.1, 1.0, 1e5, 47611.220968388567224),
            (1.0, 1.0, 1e8, 19994.129323940683521),
            (1.0, 0.0, 1e8, 20003.339639312034675),
            (0.01, 1.0, 1e6, 921965.84039546637614),
            (0.05, 10.0, 1e7, 5620831.0152995919902),
            (1e-4, 1.0, 1e6, 999636.36681575966154),
            (1e-4, 0.0, 1e6, 999640.97152497533137),
            (0.005, 0.5, 2e4, 19643.797435977055366),
        ];
        for (a, b, x, expected) in cases {
            let ev = log_wright_bessel_raw(a, b, x);
            assert_eq!(ev.error, None, "ln Φ({a}, {b}; {x})");
            assert!(rel(ev.value, expected) < 1e-13, "ln Φ({a}, {b}; {x})");
        }
        let ev = wright_bessel_raw(1.0, 1.0, 1e8);
        assert_eq!(ev.kind(), Some(ErrorKind::Overflow));
    }

    #[test]
    fn asymptotic_coefficients_match_bessel_i0() {
        // Φ(1, 1; x) = I_0(2√x): c_k = (1/16, 9/512, 75/8192, 3675/524288)
        let expected = [1.0 / 16.0, 9.0 / 512.0, 75.0 / 8192.0, 3675.0 / 524288.0];
        for (row, c) in WRIGHT_C.into_iter().zip(expected) {
            assert!(rel(wright_coefficient(row, 1.0_f64, 1.0), c) < 1e-14);
        }
    }

    #[test]
    fn degenerate_parameters() {
        // x = 0: 1/Γ(b)
        assert!(rel(wright_bessel(1.5, 4.0, 0.0), 1.0 / 6.0) < 1e-15);
        // a = 0: e^x/Γ(b)
        assert!(rel(wright_bessel(0.0, 3.0, 2.0), 2.0_f64.exp() / 2.0) < 1e-15);
        assert_eq!(wright_bessel(0.0, 0.0, 2.0), 0.0);
        assert_eq!(log_wright_bessel(1.0, 0.0, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn domain() {
        let ev = wright_bessel_raw(-0.5_f64, 1.0, 1.0);
        assert_eq!(ev.kind(), Some(ErrorKind::Domain));
        assert!(ev.value.is_nan());
        assert_eq!(log_wright_bessel_raw(1.0, 1.0, -1.0).kind(), Some(ErrorKind::Domain));
        assert!(wright_bessel(f64::NAN, 1.0, 1.0).is_nan());
    }
}
