//! Special functions with regime dispatch, generic over `f32` and `f64`.
//!
//! Every function picks among several numerically distinct kernels (power
//! series, continued fractions, connection formulas, asymptotic expansions,
//! recurrences and tridiagonal eigenproblems) by the range of its inputs.
//!
//! - Gauss hypergeometric [`hyp2f1`] / [`hyp2f1_complex`]
//! - Mathieu characteristic values and functions: [`cem_cva`], [`sem_cva`],
//!   [`cem`], [`sem`], [`mcm1`], [`msm1`], [`mcm2`], [`msm2`]
//! - Spheroidal wave functions: [`prolate_segv`], [`prolate_aswfa_nocv`],
//!   [`prolate_radial1_nocv`], [`prolate_radial2_nocv`] and friends
//! - Error function family: [`erf`], [`erfc`], [`erfcx`], [`erfi`],
//!   [`dawsn`], [`faddeeva_w`], [`erfinv`], [`erfcinv`]
//! - Gamma family and chi-square: [`gamma`], [`gammaln`], [`digamma`],
//!   [`gammainc`], [`gammaincc`], [`chdtr`], [`chdtrc`]
//! - Kelvin functions [`ber`], [`bei`], [`berp`], [`beip`]
//! - Wright's generalized Bessel function [`wright_bessel`],
//!   [`log_wright_bessel`]
//!
//! # Errors
//!
//! Nothing panics across the API. A failed evaluation returns NaN (or ±∞ at
//! poles and on overflow). The plain functions forward the error record to
//! the [`log`] facade; each fallible function also has a `_raw` twin
//! returning an [`Evaluation`] with the error attached:
//!
//! ```
//! use special_fns::{cem_cva_raw, ErrorKind};
//!
//! let ev = cem_cva_raw(1.5_f64, 2.0);
//! assert!(ev.value.is_nan());
//! assert_eq!(ev.kind(), Some(ErrorKind::Domain));
//! ```
//!
//! # Features
//!
//! - `std` (default): implies `alloc`. Without it the crate is `no_std`.
//! - `alloc`: the Mathieu and spheroidal families, which solve tridiagonal
//!   eigenproblems of input-dependent size.
//! - `validation` (default): golden-table harness in [`validation`].

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod machine;
pub mod metrics;
pub mod status;
pub mod types;

mod algo;
mod utils;

mod erf;
mod erfinv;
mod gamma;
mod hyp2f1;
mod kelvin;
#[cfg(feature = "alloc")]
mod mathieu;
#[cfg(feature = "alloc")]
mod spheroidal;
mod stats;
mod wright_bessel;

#[cfg(feature = "validation")]
pub mod validation;

pub use machine::SpecialFloat;
pub use metrics::{extended_relative_error, ExtendedRelativeError};
#[cfg(feature = "alloc")]
pub use status::ErrorLog;
pub use status::{ErrorSink, LogSink, Silent};
pub use types::{ErrorKind, Evaluation, Pair, SpecialError};

pub use erf::{
    dawsn, dawsn_complex, erf, erf_complex, erfc, erfc_complex, erfcx, erfcx_complex, erfcx_raw,
    erfi, erfi_complex, erfi_raw, faddeeva_w,
};
pub use erfinv::{erfcinv, erfcinv_raw, erfinv, erfinv_raw};
pub use gamma::{
    digamma, digamma_raw, gamma, gamma_raw, gammainc, gammainc_raw, gammaincc, gammaincc_raw,
    gammaln, gammaln_raw, rgamma,
};
pub use hyp2f1::{
    classify_hyp2f1, hyp2f1, hyp2f1_complex, hyp2f1_complex_raw, hyp2f1_raw, Hyp2f1Regime,
};
pub use kelvin::{bei, bei_raw, beip, beip_raw, ber, ber_raw, berp, berp_raw};
#[cfg(feature = "alloc")]
pub use mathieu::{
    cem, cem_cva, cem_cva_raw, cem_raw, classify_cem, classify_sem, mcm1, mcm1_raw, mcm2,
    mcm2_raw, msm1, msm1_raw, msm2, msm2_raw, sem, sem_cva, sem_cva_raw, sem_raw, Reflection,
};
#[cfg(feature = "alloc")]
pub use spheroidal::{
    oblate_aswfa_cv, oblate_aswfa_cv_raw, oblate_aswfa_nocv, oblate_aswfa_nocv_raw, oblate_segv,
    oblate_segv_raw, prolate_aswfa_cv, prolate_aswfa_cv_raw, prolate_aswfa_nocv,
    prolate_aswfa_nocv_raw, prolate_radial1_cv, prolate_radial1_cv_raw, prolate_radial1_nocv,
    prolate_radial1_nocv_raw, prolate_radial2_cv, prolate_radial2_cv_raw, prolate_radial2_nocv,
    prolate_radial2_nocv_raw, prolate_segv, prolate_segv_raw,
};
pub use stats::{chdtr, chdtr_raw, chdtrc, chdtrc_raw};
pub use wright_bessel::{
    classify_wright_bessel, log_wright_bessel, log_wright_bessel_raw, wright_bessel,
    wright_bessel_raw, WrightRegime,
};
