//! Tolerance adjustment applied before comparing against golden tables.

/// How a tabulated tolerance is turned into an acceptance bound.
///
/// The factors are fixed by the published tables and must not be changed
/// without regenerating them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TolerancePolicy {
    /// `4 * max(tol, f64::EPSILON)`; accepted when `error <= bound`.
    #[default]
    Standard,
    /// `2 * tol`; accepted when `error < bound`. Used for complex hyp2f1.
    ComplexDoubled,
}

impl TolerancePolicy {
    /// Acceptance bound for a row with tolerance `tol`. Fallback rows are
    /// widened by `widening`.
    pub fn adjust(self, tol: f64, fallback: bool, widening: f64) -> f64 {
        let bound = match self {
            Self::Standard => 4.0 * tol.max(f64::EPSILON),
            Self::ComplexDoubled => 2.0 * tol,
        };
        if fallback {
            bound * widening
        } else {
            bound
        }
    }

    /// Whether `error` is within `bound`.
    pub fn accepts(self, error: f64, bound: f64) -> bool {
        match self {
            Self::Standard => error <= bound,
            Self::ComplexDoubled => error < bound,
        }
    }
}
