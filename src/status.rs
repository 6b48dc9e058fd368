//! Error sinks.
//!
//! Evaluators never touch shared mutable state: every error travels back in
//! the returned [`Evaluation`]. A sink is where the caller decides to send
//! it. The plain entry points use [`LogSink`], which forwards to the `log`
//! facade; callers that want to inspect errors programmatically pass their
//! own collector to [`Evaluation::report_to`].

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::types::{ErrorKind, Evaluation, SpecialError};

/// Destination for evaluation errors.
pub trait ErrorSink {
    fn record(&mut self, error: SpecialError);
}

/// Forwards errors to the `log` facade.
///
/// Domain, pole and range errors are expected outcomes of valid calls and
/// are logged at `debug`; algorithmic failures (no convergence, precision
/// loss, memory) are logged at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn record(&mut self, error: SpecialError) {
        if error.kind.is_routine() {
            log::debug!("{error}");
        } else {
            log::warn!("{error}");
        }
    }
}

/// Discards every error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ErrorSink for Silent {
    #[inline]
    fn record(&mut self, _error: SpecialError) {}
}

/// Collects errors in order of occurrence.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    errors: Vec<SpecialError>,
}

#[cfg(feature = "alloc")]
impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[SpecialError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Number of recorded errors of the given kind.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    /// Most recently recorded error.
    pub fn last(&self) -> Option<&SpecialError> {
        self.errors.last()
    }

    /// Remove and return every recorded error.
    pub fn take(&mut self) -> Vec<SpecialError> {
        core::mem::take(&mut self.errors)
    }
}

#[cfg(feature = "alloc")]
impl ErrorSink for ErrorLog {
    fn record(&mut self, error: SpecialError) {
        self.errors.push(error);
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    #[inline]
    fn record(&mut self, error: SpecialError) {
        (**self).record(error);
    }
}

impl<V> Evaluation<V> {
    /// Send the error (if any) to `sink` and return the value.
    #[inline]
    pub fn report_to<S: ErrorSink + ?Sized>(self, sink: &mut S) -> V {
        if let Some(error) = self.error {
            sink.record(error);
        }
        self.value
    }

    /// Log the error (if any) and return the value.
    #[inline]
    pub fn report(self) -> V {
        self.report_to(&mut LogSink)
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    #[test]
    fn error_log_collects_in_order() {
        let mut log = ErrorLog::new();
        let a: f64 = Evaluation::failed("cem_cva", ErrorKind::Domain).report_to(&mut log);
        let b: f64 = Evaluation::ok(1.5).report_to(&mut log);
        let c: f64 = Evaluation::failed("prolate_radial2_nocv", ErrorKind::NoConvergence)
            .report_to(&mut log);
        assert!(a.is_nan());
        assert_eq!(b, 1.5);
        assert!(c.is_nan());
        assert_eq!(log.len(), 2);
        assert_eq!(log.count(ErrorKind::Domain), 1);
        assert_eq!(log.last().map(|e| e.function), Some("prolate_radial2_nocv"));
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn silent_sink_keeps_value() {
        let v: f32 = Evaluation::failed("chdtr", ErrorKind::Domain).report_to(&mut Silent);
        assert!(v.is_nan());
    }
}
