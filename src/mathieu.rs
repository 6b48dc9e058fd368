//! Mathieu functions.
//!
//! Characteristic values `a_m(q)` / `b_m(q)`, the periodic functions
//! `ce_m(x, q)` / `se_m(x, q)` (angle in degrees) and the modified (radial)
//! functions of the first and second kind. Negative `q` is reduced to
//! positive `q` by the DLMF 28.2.26 / 28.2.34 reflections; which identity
//! applies is decided by [`classify_cem`] / [`classify_sem`].

use crate::algo::bessel::{cylinder_derivatives, jn_sequence, yn_sequence};
use crate::algo::constants::PI;
use crate::algo::mathieu_coef::{characteristic_value, fourier_series, Family};
use crate::machine::SpecialFloat;
use crate::types::{ErrorKind, Evaluation, Pair};
use crate::utils::{as_order, parity_sign};

/// How an evaluation at `(m, q, x)` is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflection {
    /// `q >= 0`: evaluate the requested family directly.
    Direct,
    /// `q < 0`: evaluate the cosine-type function at `(-q, 90° - x)` and
    /// scale the value by `sign`, the derivative by `-sign`.
    Cosine { sign: i8 },
    /// As `Cosine`, through the sine-type function.
    Sine { sign: i8 },
}

impl Reflection {
    fn sign<T: SpecialFloat>(self) -> T {
        match self {
            Reflection::Cosine { sign } | Reflection::Sine { sign } if sign < 0 => -T::one(),
            _ => T::one(),
        }
    }
}

/// Reflection rule for `ce_m` (and `a_m`) at `q`.
pub fn classify_cem<T: SpecialFloat>(m: u32, q: T) -> Reflection {
    if q >= T::zero() {
        return Reflection::Direct;
    }
    let sign = if (m / 2) % 2 == 0 { 1 } else { -1 };
    if m % 2 == 0 {
        Reflection::Cosine { sign }
    } else {
        Reflection::Sine { sign }
    }
}

/// Reflection rule for `se_m` (and `b_m`) at `q`.
pub fn classify_sem<T: SpecialFloat>(m: u32, q: T) -> Reflection {
    if q >= T::zero() {
        return Reflection::Direct;
    }
    if m % 2 == 0 {
        let sign = if (m / 2) % 2 == 0 { -1 } else { 1 };
        Reflection::Sine { sign }
    } else {
        let sign = if (m / 2) % 2 == 0 { 1 } else { -1 };
        Reflection::Cosine { sign }
    }
}

/// Kernel failures surface as `Memory` when allocation failed and `Other`
/// for anything else.
fn kernel_failure(kind: ErrorKind) -> ErrorKind {
    match kind {
        ErrorKind::Memory => ErrorKind::Memory,
        _ => ErrorKind::Other,
    }
}

fn lift<V: crate::types::Undefined>(
    function: &'static str,
    result: Result<V, ErrorKind>,
) -> Evaluation<V> {
    Evaluation::from_result(function, result.map_err(kernel_failure))
}

/// Family evaluated under `rule`; `direct` is the family of the requested
/// function.
fn reflected_family(rule: Reflection, direct: fn(u32) -> Family, order: u32) -> Family {
    match rule {
        Reflection::Direct => direct(order),
        Reflection::Cosine { .. } => Family::cosine(order),
        Reflection::Sine { .. } => Family::sine(order),
    }
}

// ── Characteristic values ──

fn characteristic<T: SpecialFloat>(
    function: &'static str,
    rule: Reflection,
    direct: fn(u32) -> Family,
    order: u32,
    q: T,
) -> Evaluation<T> {
    let family = reflected_family(rule, direct, order);
    lift(function, characteristic_value(family, order, q.abs()))
}

/// Characteristic value `a_m(q)` of the even Mathieu function `ce_m`.
pub fn cem_cva_raw<T: SpecialFloat>(m: T, q: T) -> Evaluation<T> {
    let Some(order) = as_order(m) else {
        return Evaluation::domain("mathieu_a", "m must be a non-negative integer");
    };
    if q.is_nan() {
        return Evaluation::ok(q);
    }
    characteristic("mathieu_a", classify_cem(order, q), Family::cosine, order, q)
}

/// Characteristic value `a_m(q)` of the even Mathieu function `ce_m`.
pub fn cem_cva<T: SpecialFloat>(m: T, q: T) -> T {
    cem_cva_raw(m, q).report()
}

/// Characteristic value `b_m(q)` of the odd Mathieu function `se_m`.
pub fn sem_cva_raw<T: SpecialFloat>(m: T, q: T) -> Evaluation<T> {
    let order = match as_order(m) {
        Some(order) if order >= 1 => order,
        _ => return Evaluation::domain("mathieu_b", "m must be a positive integer"),
    };
    if q.is_nan() {
        return Evaluation::ok(q);
    }
    characteristic("mathieu_b", classify_sem(order, q), Family::sine, order, q)
}

/// Characteristic value `b_m(q)` of the odd Mathieu function `se_m`.
pub fn sem_cva<T: SpecialFloat>(m: T, q: T) -> T {
    sem_cva_raw(m, q).report()
}

// ── Periodic functions ──

fn periodic<T: SpecialFloat>(family: Family, order: u32, q: T, x: T) -> Result<Pair<T>, ErrorKind> {
    let series = fourier_series(family, order, q)?;
    let (f, d) = series.eval(x * T::from_f64(PI / 180.0));
    Ok(Pair::new(f, d))
}

/// `ce_m` / `se_m` at `q < 0` through the function of `rule` at
/// `(-q, 90° - x)`. Failures keep the name of the function called.
fn reflected<T: SpecialFloat>(
    function: &'static str,
    rule: Reflection,
    direct: fn(u32) -> Family,
    order: u32,
    q: T,
    x: T,
) -> Evaluation<Pair<T>> {
    let sign: T = rule.sign();
    let mirror = T::from_f64(90.0) - x;
    let family = reflected_family(rule, direct, order);
    lift(function, periodic(family, order, -q, mirror)).map(|p| p.scaled(sign, -sign))
}

/// Even periodic Mathieu function `ce_m(x, q)` and its derivative, `x` in
/// degrees.
pub fn cem_raw<T: SpecialFloat>(m: T, q: T, x: T) -> Evaluation<Pair<T>> {
    let Some(order) = as_order(m) else {
        return Evaluation::domain("mathieu_cem", "m must be a non-negative integer");
    };
    if q.is_nan() || x.is_nan() {
        return Evaluation::ok(Pair::new(T::nan(), T::nan()));
    }
    match classify_cem(order, q) {
        Reflection::Direct => lift("mathieu_cem", periodic(Family::cosine(order), order, q, x)),
        rule => reflected("mathieu_cem", rule, Family::cosine, order, q, x),
    }
}

/// Even periodic Mathieu function `ce_m(x, q)` and its derivative, `x` in
/// degrees.
pub fn cem<T: SpecialFloat>(m: T, q: T, x: T) -> Pair<T> {
    cem_raw(m, q, x).report()
}

/// Odd periodic Mathieu function `se_m(x, q)` and its derivative, `x` in
/// degrees. `se_0` is identically zero.
pub fn sem_raw<T: SpecialFloat>(m: T, q: T, x: T) -> Evaluation<Pair<T>> {
    let Some(order) = as_order(m) else {
        return Evaluation::domain("mathieu_sem", "m must be a non-negative integer");
    };
    if order == 0 {
        return Evaluation::ok(Pair::new(T::zero(), T::zero()));
    }
    if q.is_nan() || x.is_nan() {
        return Evaluation::ok(Pair::new(T::nan(), T::nan()));
    }
    match classify_sem(order, q) {
        Reflection::Direct => lift("mathieu_sem", periodic(Family::sine(order), order, q, x)),
        rule => reflected("mathieu_sem", rule, Family::sine, order, q, x),
    }
}

/// Odd periodic Mathieu function `se_m(x, q)` and its derivative, `x` in
/// degrees. `se_0` is identically zero.
pub fn sem<T: SpecialFloat>(m: T, q: T, x: T) -> Pair<T> {
    sem_raw(m, q, x).report()
}

// ── Modified functions ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    First,
    Second,
}

/// `C_k` for any integer `k`, from a table of non-negative orders.
fn signed_order<T: SpecialFloat>(table: &[T], k: isize) -> T {
    let n = k.unsigned_abs();
    if k >= 0 || n % 2 == 0 {
        table[n]
    } else {
        -table[n]
    }
}

/// Bessel-product expansion of the modified Mathieu functions:
///
/// `Mc(z) = (-1)^p / (ε_s c_s) Σ_l (-1)^l c_l [J_{l-s}(u1) C_{l+s+o}(u2)
///          ± J_{l+s+o}(u1) C_{l-s}(u2)]`
///
/// with `u1 = √q e^{-z}`, `u2 = √q e^{z}`, `C = J` or `Y`, and `s` the
/// index of the dominant Fourier coefficient.
fn modified<T: SpecialFloat>(
    family: Family,
    kind: Kind,
    order: u32,
    q: T,
    z: T,
) -> Result<Pair<T>, ErrorKind> {
    let series = fourier_series(family, order, q)?;
    let c = &series.coefficients;

    let h = q.sqrt();
    let u1 = h * (-z).exp();
    let u2 = h * z.exp();

    let s = c
        .iter()
        .enumerate()
        .fold((0, T::zero()), |best, (k, &v)| {
            if v.abs() > best.1 {
                (k, v.abs())
            } else {
                best
            }
        })
        .0;
    let offset = match family {
        Family::EvenCosine => 0,
        Family::OddCosine | Family::OddSine => 1,
        Family::EvenSine => 2,
    };
    let pair_sign = if family.is_sine() { -T::one() } else { T::one() };

    let top = c.len() + s + offset;
    let j = jn_sequence(top, u1)?;
    let dj = cylinder_derivatives(&j, u1)?;
    let cyl = match kind {
        Kind::First => jn_sequence(top, u2)?,
        Kind::Second => yn_sequence(top, u2)?,
    };
    let dcyl = cylinder_derivatives(&cyl, u2)?;

    let mut f = T::zero();
    let mut df = T::zero();
    let mut sign = T::one();
    for (l, &cl) in c.iter().enumerate() {
        let a = l as isize - s as isize;
        let b = (l + s + offset) as isize;
        let p = sign * cl;
        sign = -sign;

        let t1 = signed_order(&j, a) * signed_order(&cyl, b);
        let t2 = pair_sign * signed_order(&j, b) * signed_order(&cyl, a);
        let d1 = -u1 * signed_order(&dj, a) * signed_order(&cyl, b)
            + u2 * signed_order(&j, a) * signed_order(&dcyl, b);
        let d2 = pair_sign
            * (-u1 * signed_order(&dj, b) * signed_order(&cyl, a)
                + u2 * signed_order(&j, b) * signed_order(&dcyl, a));

        let term = p * (t1 + t2);
        let dterm = p * (d1 + d2);
        if !(term.is_finite() && dterm.is_finite()) {
            // past the dominant coefficient the remaining terms are
            // negligible even when a Bessel factor has overflowed
            if l > s {
                break;
            }
            return Err(ErrorKind::Overflow);
        }
        f = f + term;
        df = df + dterm;
    }

    let eps_s = if family == Family::EvenCosine && s == 0 {
        T::from_f64(2.0)
    } else {
        T::one()
    };
    let factor = parity_sign::<T>(family.index(order) as u32) / (eps_s * c[s]);
    Ok(Pair::new(f * factor, df * factor))
}

fn modified_entry<T: SpecialFloat>(
    function: &'static str,
    family_of: fn(u32) -> Family,
    min_order: u32,
    kind: Kind,
    m: T,
    q: T,
    z: T,
) -> Evaluation<Pair<T>> {
    let order = match as_order(m) {
        Some(order) if order >= min_order => order,
        _ => return Evaluation::domain(function, "invalid order m"),
    };
    if q < T::zero() {
        return Evaluation::domain(function, "q must be non-negative");
    }
    if q.is_nan() || z.is_nan() {
        return Evaluation::ok(Pair::new(T::nan(), T::nan()));
    }
    if q == T::zero() {
        return match kind {
            // the series collapses to J_0(0)² for m = 0
            Kind::First => {
                let v = if order == 0 { T::one() } else { T::zero() };
                Evaluation::ok(Pair::new(v, T::zero()))
            }
            Kind::Second => Evaluation::failed(function, ErrorKind::Singular),
        };
    }
    lift(function, modified(family_of(order), kind, order, q, z))
}

/// Even modified Mathieu function of the first kind `Mc^(1)_m(z, q)` and
/// its derivative.
pub fn mcm1_raw<T: SpecialFloat>(m: T, q: T, z: T) -> Evaluation<Pair<T>> {
    modified_entry("mathieu_modcem1", Family::cosine, 0, Kind::First, m, q, z)
}

/// Even modified Mathieu function of the first kind `Mc^(1)_m(z, q)` and
/// its derivative.
pub fn mcm1<T: SpecialFloat>(m: T, q: T, z: T) -> Pair<T> {
    mcm1_raw(m, q, z).report()
}

/// Odd modified Mathieu function of the first kind `Ms^(1)_m(z, q)` and
/// its derivative.
pub fn msm1_raw<T: SpecialFloat>(m: T, q: T, z: T) -> Evaluation<Pair<T>> {
    modified_entry("mathieu_modsem1", Family::sine, 1, Kind::First, m, q, z)
}

/// Odd modified Mathieu function of the first kind `Ms^(1)_m(z, q)` and
/// its derivative.
pub fn msm1<T: SpecialFloat>(m: T, q: T, z: T) -> Pair<T> {
    msm1_raw(m, q, z).report()
}

/// Even modified Mathieu function of the second kind `Mc^(2)_m(z, q)` and
/// its derivative.
pub fn mcm2_raw<T: SpecialFloat>(m: T, q: T, z: T) -> Evaluation<Pair<T>> {
    modified_entry("mathieu_modcem2", Family::cosine, 0, Kind::Second, m, q, z)
}

/// Even modified Mathieu function of the second kind `Mc^(2)_m(z, q)` and
/// its derivative.
pub fn mcm2<T: SpecialFloat>(m: T, q: T, z: T) -> Pair<T> {
    mcm2_raw(m, q, z).report()
}

/// Odd modified Mathieu function of the second kind `Ms^(2)_m(z, q)` and
/// its derivative.
pub fn msm2_raw<T: SpecialFloat>(m: T, q: T, z: T) -> Evaluation<Pair<T>> {
    modified_entry("mathieu_modsem2", Family::sine, 1, Kind::Second, m, q, z)
}

/// Odd modified Mathieu function of the second kind `Ms^(2)_m(z, q)` and
/// its derivative.
pub fn msm2<T: SpecialFloat>(m: T, q: T, z: T) -> Pair<T> {
    msm2_raw(m, q, z).report()
}
