//! Shared numerical constants used by multiple kernels.
//!
//! Module-specific tables remain in their respective files.

#![allow(clippy::excessive_precision)]
#![allow(clippy::approx_constant)]

/// π
pub(crate) const PI: f64 = 3.14159265358979324e+00;

/// √π
pub(crate) const SQRT_PI: f64 = 1.77245385090551603e+00;

/// 2/√π
pub(crate) const TWO_OVER_SQRT_PI: f64 = 1.12837916709551257e+00;

/// ln(2π)
pub(crate) const LN_2PI: f64 = 1.83787706640934548e+00;

/// Euler–Mascheroni constant γ.
pub(crate) const EULER: f64 = 5.77215664901532861e-01;

/// log₁₀(2), the D1MACH(5) value for binary IEEE 754.
pub(crate) const R1M5: f64 = 0.30102999566398120;

/// 1/√2
pub(crate) const FRAC_1_SQRT_2: f64 = 7.07106781186547524e-01;

/// ζ(k) - 1 for k = 2, 3, ..., 30.
#[rustfmt::skip]
pub(crate) const ZETA_MINUS_ONE: [f64; 29] = [
    6.449340668482264e-01, 2.020569031595943e-01, 8.232323371113819e-02,
    3.692775514336993e-02, 1.734306198444914e-02, 8.349277381922827e-03,
    4.077356197944340e-03, 2.008392826082214e-03, 9.945751278180853e-04,
    4.941886041194645e-04, 2.460865533080483e-04, 1.227133475784891e-04,
    6.124813505870483e-05, 3.058823630702049e-05, 1.528225940865187e-05,
    7.637197637899763e-06, 3.817293264999840e-06, 1.908212716553939e-06,
    9.539620338727962e-07, 4.769329867878064e-07, 2.384505027277330e-07,
    1.192199259653111e-07, 5.960818905125948e-08, 2.980350351465228e-08,
    1.490155482836504e-08, 7.450711789835430e-09, 3.725334024788457e-09,
    1.862659723513049e-09, 9.313274324196682e-10,
];
