//! Natural logarithm of the Gamma function and its Stirling remainder.
//!
//! Integer arguments 1..100 come from a table. Arguments within 1/2 of 1
//! or 2 use the ζ-series for ln Γ(1+a), which keeps full relative accuracy
//! where ln Γ crosses zero. Everything else goes through Stirling's
//! expansion after an upward shift.

#![allow(clippy::excessive_precision)]
#![allow(clippy::approx_constant)]

use crate::algo::constants::{EULER, LN_2PI, R1M5, ZETA_MINUS_ONE};
use crate::machine::SpecialFloat;
use crate::types::ErrorKind;

/// ln(Γ(n)) for n = 1, 2, ..., 100.
///
/// Integer arguments up to 100 are answered from this table.
#[rustfmt::skip]
const GLN_TABLE: [f64; 100] = [
    0.00000000000000000e+00,  0.00000000000000000e+00,  // Γ(1)=1, Γ(2)=1
    6.93147180559945309e-01,  1.79175946922805500e+00,  // Γ(3)=2, Γ(4)=6
    3.17805383034794562e+00,  4.78749174278204599e+00,
    6.57925121201010100e+00,  8.52516136106541430e+00,
    1.06046029027452502e+01,  1.28018274800814696e+01,
    1.51044125730755153e+01,  1.75023078458738858e+01,
    1.99872144956618861e+01,  2.25521638531234229e+01,
    2.51912211827386815e+01,  2.78992713838408916e+01,
    3.06718601060806728e+01,  3.35050734501368889e+01,
    3.63954452080330536e+01,  3.93398841871994940e+01,
    4.23356164607534850e+01,  4.53801388984769080e+01,
    4.84711813518352239e+01,  5.16066755677643736e+01,
    5.47847293981123192e+01,  5.80036052229805199e+01,
    6.12617017610020020e+01,  6.45575386270063311e+01,
    6.78897431371815350e+01,  7.12570389671680090e+01,
    7.46582363488301644e+01,  7.80922235533153106e+01,
    8.15579594561150372e+01,  8.50544670175815174e+01,
    8.85808275421976788e+01,  9.21361756036870925e+01,
    9.57196945421432025e+01,  9.93306124547874269e+01,
    1.02968198614513813e+02,  1.06631760260643459e+02,
    1.10320639714757395e+02,  1.14034211781461703e+02,
    1.17771881399745072e+02,  1.21533081515438634e+02,
    1.25317271149356895e+02,  1.29123933639127215e+02,
    1.32952575035616310e+02,  1.36802722637326368e+02,
    1.40673923648234259e+02,  1.44565743946344886e+02,
    1.48477766951773032e+02,  1.52409592584497358e+02,
    1.56360836303078785e+02,  1.60331128216630907e+02,
    1.64320112263195181e+02,  1.68327445448427652e+02,
    1.72352797139162802e+02,  1.76395848406997352e+02,
    1.80456291417543771e+02,  1.84533828861449491e+02,
    1.88628173423671591e+02,  1.92739047287844902e+02,
    1.96866181672889994e+02,  2.01009316399281527e+02,
    2.05168199482641199e+02,  2.09342586752536836e+02,
    2.13532241494563261e+02,  2.17736934113954227e+02,
    2.21956441819130334e+02,  2.26190548323727593e+02,
    2.30439043565776952e+02,  2.34701723442818268e+02,
    2.38978389561834323e+02,  2.43268849002982714e+02,
    2.47572914096186884e+02,  2.51890402209723194e+02,
    2.56221135550009525e+02,  2.60564940971863209e+02,
    2.64921649798552801e+02,  2.69291097651019823e+02,
    2.73673124285693704e+02,  2.78067573440366143e+02,
    2.82474292687630396e+02,  2.86893133295426994e+02,
    2.91323950094270308e+02,  2.95766601350760624e+02,
    3.00220948647014132e+02,  3.04686856765668715e+02,
    3.09164193580146922e+02,  3.13652829949879062e+02,
    3.18152639620209327e+02,  3.22663499126726177e+02,
    3.27185287703775217e+02,  3.31717887196928473e+02,
    3.36261181979198477e+02,  3.40815058870799018e+02,
    3.45379407062266854e+02,  3.49954118040770237e+02,
    3.54539085519440809e+02,  3.59134205369575399e+02,
];

/// Coefficients of the asymptotic expansion for ln(Γ(z)).
///
/// These are related to the Bernoulli numbers B_{2k}:
///   CF(k) = B_{2k} / (2k * (2k-1))
/// for k = 1, 2, ..., 22.
#[rustfmt::skip]
const CF_TABLE: [f64; 22] = [
     8.33333333333333333e-02,   // B2/(1*2)    = 1/12
    -2.77777777777777778e-03,   // B4/(3*4)    = -1/360
     7.93650793650793651e-04,   // B6/(5*6)
    -5.95238095238095238e-04,   // B8/(7*8)
     8.41750841750841751e-04,   // B10/(9*10)
    -1.91752691752691753e-03,   // B12/(11*12)
     6.41025641025641026e-03,   // B14/(13*14)
    -2.95506535947712418e-02,   // B16/(15*16)
     1.79644372368830573e-01,   // B18/(17*18)
    -1.39243221690590112e+00,   // B20/(19*20)
     1.34028640441683920e+01,   // B22/(21*22)
    -1.56848284626002017e+02,
     2.19310333333333333e+03,
    -3.61087712537249894e+04,
     6.91472268851313067e+05,
    -1.52382215394074162e+07,
     3.82900751391414141e+08,
    -1.08822660357843911e+10,
     3.47320283765002252e+11,
    -1.23696021422692745e+13,
     4.88788064793079335e+14,
    -2.13203339609193739e+16,
];

/// Stirling remainder S(z) = ln Γ(z) - [(z - 1/2) ln z - z + ln(2π)/2].
///
/// Asymptotic in 1/z; accurate to working precision once z is above the
/// shift threshold used by [`gamln`] (7 for f64).
pub(crate) fn stirling_series<T: SpecialFloat>(z: T) -> T {
    let two = T::from_f64(2.0);
    let wdtol = (two * T::MACH_EPSILON).max(T::from_f64(0.5e-18));

    let zp_init = T::one() / z;
    let t1 = T::from_f64(CF_TABLE[0]) * zp_init;
    let mut s = t1;
    if zp_init < wdtol {
        return s;
    }

    let zsq = zp_init * zp_init;
    let tst = t1 * wdtol;
    let mut zp = zp_init;
    for cf in &CF_TABLE[1..] {
        zp = zp * zsq;
        let trm = T::from_f64(*cf) * zp;
        if trm.abs() < tst {
            break;
        }
        s = s + trm;
    }
    s
}

/// Smallest argument for which the Stirling series converges to working
/// precision: 1 + int(1.8 + 0.3875·(min(R1M5·DIGITS, 20) - 3)).
fn stirling_threshold<T: SpecialFloat>() -> T {
    let rln = T::from_f64(R1M5) * T::from_f64(T::MACH_DIGITS as f64);
    let fln = rln.min(T::from_f64(20.0)).max(T::from_f64(3.0)) - T::from_f64(3.0);
    (T::from_f64(1.8) + T::from_f64(0.3875) * fln).floor() + T::one()
}

/// ln Γ(1 + a) for |a| ≤ 1/2 from the ζ-series
/// -γa + (a - ln(1+a)) + Σ_{k≥2} (ζ(k) - 1)(-a)^k / k.
fn lgam1p_series<T: SpecialFloat>(a: T) -> T {
    let mut s = T::zero();
    let mut p = -a;
    for (k, zm1) in (2..).zip(ZETA_MINUS_ONE.iter()) {
        p = p * -a;
        let t = T::from_f64(*zm1) * p / T::from_f64(k as f64);
        s = s + t;
        if t.abs() < T::MACH_EPSILON * s.abs() {
            break;
        }
    }
    -T::from_f64(EULER) * a + (a - a.ln_1p()) + s
}

/// ln Γ(1 + a), accurate near a = 0 and a = 1.
pub(crate) fn lgam1p<T: SpecialFloat>(a: T) -> Result<T, ErrorKind> {
    let half = T::from_f64(0.5);
    let one = T::one();
    if a.abs() <= half {
        Ok(lgam1p_series(a))
    } else if (a - one).abs() < half {
        Ok(a.ln() + lgam1p_series(a - one))
    } else {
        gamln(one + a)
    }
}

/// Compute ln(Γ(z)) for z > 0.
///
/// Returns `ErrorKind::Domain` for z ≤ 0; callers that need the real
/// log-gamma on the negative axis apply the reflection formula first.
pub(crate) fn gamln<T: SpecialFloat>(z: T) -> Result<T, ErrorKind> {
    let zero = T::zero();
    let one = T::one();
    let two = T::from_f64(2.0);
    let half = T::from_f64(0.5);

    if z <= zero {
        return Err(ErrorKind::Domain);
    }
    if !z.is_finite() {
        // NaN or +inf propagate
        return Ok(z);
    }

    if z <= T::from_f64(100.0) && z.floor() == z {
        if let Some(n) = z.to_usize() {
            return Ok(T::from_f64(GLN_TABLE[n - 1]));
        }
    }

    if (z - one).abs() <= half {
        return Ok(lgam1p_series(z - one));
    }
    if (z - two).abs() <= half {
        return Ok((z - one).ln() + lgam1p_series(z - two));
    }

    // Push z above the threshold with Γ(z+n) = z(z+1)…(z+n-1)·Γ(z)
    let zmin = stirling_threshold::<T>();
    let mut zdmy = z;
    let mut product = one;
    while zdmy < zmin {
        product = product * zdmy;
        zdmy = zdmy + one;
    }

    let tlg = zdmy.ln();
    let con = T::from_f64(LN_2PI);
    Ok(zdmy * (tlg - one) + half * (con - tlg) + stirling_series(zdmy) - product.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gamln_integers() {
        assert_eq!(gamln(1.0_f64).unwrap(), 0.0);
        assert_eq!(gamln(2.0_f64).unwrap(), 0.0);
        assert!((gamln(3.0_f64).unwrap() - 2.0_f64.ln()).abs() < 1e-15);
        assert!((gamln(7.0_f64).unwrap() - 720.0_f64.ln()).abs() < 1e-13);
        assert!((gamln(100.0_f64).unwrap() - 3.59134205369575399e+02).abs() < 1e-10);
        // 101 is past the table and goes through Stirling
        assert!((gamln(101.0_f64).unwrap() - 363.73937555556347).abs() < 1e-9);
    }

    #[test]
    fn gamln_relative_accuracy_near_zeros() {
        // mpmath loggamma
        let cases = [
            (0.9_f64, 0.0663762397347429544),
            (1.5, -0.120782237635245222),
            (2.1, 0.0454377385444851790),
            (2.25, 0.124871714892396594),
            (1.0000001, -5.77215582991850710e-8),
        ];
        for (z, expected) in cases {
            let v = gamln(z).unwrap();
            assert!(((v - expected) / expected).abs() < 1e-14, "z={z}: {v}");
        }
    }

    #[test]
    fn gamln_small_and_half_integer() {
        assert!((gamln(0.5_f64).unwrap() - 0.5 * core::f64::consts::PI.ln()).abs() < 1e-14);
        assert!((gamln(0.1_f64).unwrap() - 2.2527126517342059).abs() < 1e-13);
        assert!((gamln(0.001_f64).unwrap() - 6.90717888538385366).abs() < 1e-13);
    }

    #[test]
    fn gamln_large() {
        let val = gamln(150.0_f64).unwrap();
        let expected: f64 = (1..150).map(|k| (k as f64).ln()).sum();
        assert!((val - expected).abs() / expected < 1e-14);
    }

    #[test]
    fn gamln_rejects_nonpositive() {
        assert_eq!(gamln(-1.0_f64), Err(ErrorKind::Domain));
        assert_eq!(gamln(0.0_f64), Err(ErrorKind::Domain));
        assert!(gamln(f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn gamln_f32() {
        let val = gamln(3.0_f32).unwrap();
        assert!((val - 2.0_f32.ln()).abs() < 1e-6);
        let val = gamln(5.5_f32).unwrap();
        assert!((val - 3.957813967618717).abs() < 1e-5);
    }

    #[test]
    fn lgam1p_matches_reference() {
        let cases = [
            (0.1_f64, -0.0498724412598397618),
            (-0.2, 0.152059678399837546),
            (1.3, 0.154189454959630475),
            (-0.7, 1.09579799481807537),
        ];
        for (a, expected) in cases {
            let v = lgam1p(a).unwrap();
            assert!(((v - expected) / expected).abs() < 1e-14, "a={a}: {v}");
        }
    }

    #[test]
    fn stirling_series_leading_term() {
        // S(z) ≈ 1/(12z) - 1/(360z³)
        let z = 50.0_f64;
        let approx = 1.0 / (12.0 * z) - 1.0 / (360.0 * z * z * z);
        assert!((stirling_series(z) - approx).abs() < 1e-12);
    }
}
