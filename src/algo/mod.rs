//! Numerical kernels behind the public dispatchers.
//!
//! Kernels return `Result<_, ErrorKind>` and never log; the dispatchers in
//! the parent modules validate inputs, pick a kernel and attach the function
//! name to any failure.

pub(crate) mod constants;
pub(crate) mod faddeeva;
pub(crate) mod gamln;
pub(crate) mod hypser;
pub(crate) mod igam;

// tridiagonal eigenproblems and Bessel sequences for Mathieu and spheroidal
#[cfg(feature = "alloc")]
pub(crate) mod bessel;
#[cfg(feature = "alloc")]
pub(crate) mod mathieu_coef;
#[cfg(feature = "alloc")]
pub(crate) mod spheroidal_coef;
#[cfg(feature = "alloc")]
pub(crate) mod tridiag;
