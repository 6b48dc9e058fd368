//! Core types shared by every evaluator: the error taxonomy, the tagged
//! evaluation record, and the value/derivative pair.

use core::fmt;

use num_complex::Complex;

use crate::machine::SpecialFloat;

/// Classification of an evaluation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Argument outside the valid range, or non-integer where an integer
    /// order is required.
    Domain,
    /// Evaluation at a pole.
    Singular,
    /// Result magnitude exceeds the representable range.
    Overflow,
    /// Result magnitude is below the smallest normal number.
    Underflow,
    /// Too many iterations were needed.
    Slow,
    /// Precision was lost in the evaluation.
    Loss,
    /// Iteration cap reached before the stopping criterion was met.
    NoConvergence,
    /// No result could be obtained.
    NoResult,
    /// Working memory could not be reserved.
    Memory,
    /// Invalid argument passed to an internal routine.
    Arg,
    /// Unclassified kernel failure.
    Other,
}

impl ErrorKind {
    /// Short human-readable description.
    pub const fn message(self) -> &'static str {
        match self {
            ErrorKind::Domain => "domain error",
            ErrorKind::Singular => "singularity",
            ErrorKind::Overflow => "overflow",
            ErrorKind::Underflow => "underflow",
            ErrorKind::Slow => "too many iterations required",
            ErrorKind::Loss => "loss of precision",
            ErrorKind::NoConvergence => "no convergence",
            ErrorKind::NoResult => "no result obtained",
            ErrorKind::Memory => "memory allocation failed",
            ErrorKind::Arg => "invalid input argument",
            ErrorKind::Other => "other error",
        }
    }

    /// Whether the kind describes an expected property of the input
    /// (pole, domain, range) rather than a shortcoming of the algorithm.
    pub const fn is_routine(self) -> bool {
        matches!(
            self,
            ErrorKind::Domain | ErrorKind::Singular | ErrorKind::Overflow | ErrorKind::Underflow
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl core::error::Error for ErrorKind {}

/// Error record attached to an [`Evaluation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecialError {
    /// Public name of the function that failed (e.g. `"cem_cva"`).
    pub function: &'static str,
    /// Failure class.
    pub kind: ErrorKind,
    /// Optional detail, such as the violated constraint.
    pub context: Option<&'static str>,
}

impl SpecialError {
    pub const fn new(function: &'static str, kind: ErrorKind) -> Self {
        Self {
            function,
            kind,
            context: None,
        }
    }

    pub const fn with_context(mut self, context: &'static str) -> Self {
        self.context = Some(context);
        self
    }
}

impl fmt::Display for SpecialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.function, self.kind)?;
        if let Some(context) = self.context {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl core::error::Error for SpecialError {}

/// Values that have a canonical "undefined" representation, used as the
/// result of a failed evaluation.
pub trait Undefined {
    fn undefined() -> Self;
}

impl Undefined for f64 {
    #[inline]
    fn undefined() -> Self {
        f64::NAN
    }
}

impl Undefined for f32 {
    #[inline]
    fn undefined() -> Self {
        f32::NAN
    }
}

impl<T: SpecialFloat> Undefined for Complex<T> {
    #[inline]
    fn undefined() -> Self {
        Complex::new(T::nan(), T::nan())
    }
}

impl<T: SpecialFloat> Undefined for Pair<T> {
    #[inline]
    fn undefined() -> Self {
        Pair::new(T::nan(), T::nan())
    }
}

/// Result of an evaluation, returned by `_raw` functions
/// (e.g., [`cem_cva_raw`](crate::cem_cva_raw)).
///
/// The value is always present: on failure it is NaN (or ±∞ for poles and
/// overflow) and `error` describes why. Plain functions (`cem_cva`, `hyp2f1`,
/// …) forward the error to the `log` facade and return only the value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct Evaluation<V> {
    /// Computed value, or the failure sentinel.
    pub value: V,
    /// Error raised during the evaluation, if any.
    pub error: Option<SpecialError>,
}

impl<V> Evaluation<V> {
    /// Successful evaluation.
    #[inline]
    pub const fn ok(value: V) -> Self {
        Self { value, error: None }
    }

    /// Evaluation that produced `value` but raised `error`.
    #[inline]
    pub const fn with_error(value: V, error: SpecialError) -> Self {
        Self {
            value,
            error: Some(error),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Kind of the attached error, if any.
    #[inline]
    pub fn kind(&self) -> Option<ErrorKind> {
        self.error.map(|e| e.kind)
    }

    /// Transform the value, keeping the error.
    #[inline]
    pub fn map<U, F: FnOnce(V) -> U>(self, f: F) -> Evaluation<U> {
        Evaluation {
            value: f(self.value),
            error: self.error,
        }
    }

    /// Convert to a `Result`, discarding the sentinel value on failure.
    pub fn into_result(self) -> Result<V, SpecialError> {
        match self.error {
            None => Ok(self.value),
            Some(e) => Err(e),
        }
    }
}

impl<V: Undefined> Evaluation<V> {
    /// Failed evaluation with an undefined (NaN) value.
    #[inline]
    pub fn failed(function: &'static str, kind: ErrorKind) -> Self {
        Self::with_error(V::undefined(), SpecialError::new(function, kind))
    }

    /// Failed evaluation carrying a context string.
    #[inline]
    pub fn domain(function: &'static str, context: &'static str) -> Self {
        Self::with_error(
            V::undefined(),
            SpecialError::new(function, ErrorKind::Domain).with_context(context),
        )
    }

    /// Lift a kernel result: `Err(kind)` becomes an undefined value with
    /// `kind` attached under `function`.
    #[inline]
    pub fn from_result(function: &'static str, result: Result<V, ErrorKind>) -> Self {
        match result {
            Ok(v) => Self::ok(v),
            Err(kind) => Self::failed(function, kind),
        }
    }
}

/// A function value together with its derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair<T> {
    pub value: T,
    pub derivative: T,
}

impl<T> Pair<T> {
    #[inline]
    pub const fn new(value: T, derivative: T) -> Self {
        Self { value, derivative }
    }
}

impl<T: SpecialFloat> Pair<T> {
    /// Multiply the value by `sv` and the derivative by `sd`.
    #[inline]
    pub(crate) fn scaled(self, sv: T, sd: T) -> Self {
        Self::new(self.value * sv, self.derivative * sd)
    }

    pub fn is_nan(&self) -> bool {
        self.value.is_nan() || self.derivative.is_nan()
    }
}

impl<T> From<(T, T)> for Pair<T> {
    fn from((value, derivative): (T, T)) -> Self {
        Self { value, derivative }
    }
}

impl<T> From<Pair<T>> for (T, T) {
    fn from(p: Pair<T>) -> Self {
        (p.value, p.derivative)
    }
}
