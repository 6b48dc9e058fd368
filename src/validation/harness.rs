//! Runs a function over a golden table and collects every failing row.

use std::collections::BTreeSet;
use std::fmt;

use super::config::{HarnessConfig, TablePaths};
use super::table::{Cell, Column, Components, Row, Table, TableError};
use super::tolerance::TolerancePolicy;

/// One row of a golden table.
#[derive(Debug, Clone, PartialEq)]
pub struct Case<I, O> {
    pub row: usize,
    pub input: I,
    pub expected: O,
    /// Reference value came from a lower-accuracy fallback path.
    pub fallback: bool,
    /// One tolerance per output component.
    pub tolerance: Vec<f64>,
}

fn expect_columns(table: &'static str, t: &Table, expected: usize) -> Result<(), TableError> {
    if t.columns.len() != expected {
        return Err(TableError::ColumnCount {
            table,
            expected,
            found: t.columns.len(),
        });
    }
    Ok(())
}

fn expect_rows(table: &'static str, t: &Table, expected: usize) -> Result<(), TableError> {
    let found = t.rows(table)?;
    if found != expected {
        return Err(TableError::RowCount {
            table,
            expected,
            found,
        });
    }
    Ok(())
}

/// Load the aligned input, output and tolerance tables.
///
/// The output table carries a trailing boolean `fallback` column. The
/// tolerance table has one real column per output component.
pub fn load_cases<I: Row, O: Row>(paths: &TablePaths) -> Result<Vec<Case<I, O>>, TableError> {
    let input = Table::load(&paths.input)?;
    let output = Table::load(&paths.output)?;
    let tolerance = Table::load(&paths.tolerance)?;

    expect_columns("In", &input, I::WIDTH)?;
    expect_columns("Out", &output, O::WIDTH + 1)?;
    expect_columns("Err", &tolerance, O::WIDTH)?;
    let n = input.rows("In")?;
    expect_rows("Out", &output, n)?;
    expect_rows("Err", &tolerance, n)?;

    let flags: &Column = &output.columns[O::WIDTH];
    let mut cases = Vec::with_capacity(n);
    for row in 0..n {
        let fallback = <bool as Cell>::read(flags, row).ok_or(TableError::ColumnType {
            table: "Out",
            column: O::WIDTH,
            expected: "b",
            found: flags.tag(),
        })?;
        let tol = (0..O::WIDTH)
            .map(|c| {
                <f64 as Cell>::read(&tolerance.columns[c], row).ok_or(TableError::ColumnType {
                    table: "Err",
                    column: c,
                    expected: "d",
                    found: tolerance.columns[c].tag(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        cases.push(Case {
            row,
            input: I::read("In", &input.columns, row)?,
            expected: O::read("Out", &output.columns, row)?,
            fallback,
            tolerance: tol,
        });
    }
    log::debug!("loaded {} cases from {}", cases.len(), paths.input.display());
    Ok(cases)
}

/// A row whose error exceeded its adjusted tolerance.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub row: usize,
    pub component: usize,
    pub input: String,
    pub actual: String,
    pub expected: String,
    pub error: f64,
    pub bound: f64,
    pub fallback: bool,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} [{}]: input {} out {} desired {} error {:.3e} > tol {:.3e}{}",
            self.row,
            self.component,
            self.input,
            self.actual,
            self.expected,
            self.error,
            self.bound,
            if self.fallback { " (fallback)" } else { "" }
        )
    }
}

/// Outcome of checking one table.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Report {
    pub name: String,
    pub checked: usize,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// Panic with every failing row if any row failed.
    #[track_caller]
    pub fn assert_passed(&self) {
        if self.passed() {
            return;
        }
        let mut msg = format!(
            "{}: {} of {} cases failed",
            self.name,
            self.failures.len(),
            self.checked
        );
        for failure in &self.failures {
            msg.push_str("\n  ");
            msg.push_str(&failure.to_string());
        }
        panic!("{msg}");
    }
}

/// Evaluate `f` on every case and compare each output component.
///
/// Every case is run; failures are collected rather than stopping at the
/// first one.
pub fn check<I, O, F>(
    name: &str,
    cases: &[Case<I, O>],
    policy: TolerancePolicy,
    fallback_widening: f64,
    mut f: F,
) -> Report
where
    I: Row,
    O: Row + Components,
    F: FnMut(I) -> O,
{
    let mut failures = Vec::new();
    for case in cases {
        let actual = f(case.input);
        let errors = actual.errors(&case.expected);
        for (component, (&error, &tol)) in errors.iter().zip(&case.tolerance).enumerate() {
            let bound = policy.adjust(tol, case.fallback, fallback_widening);
            if !policy.accepts(error, bound) {
                let failure = Failure {
                    row: case.row,
                    component,
                    input: format!("{:?}", case.input),
                    actual: format!("{actual:?}"),
                    expected: format!("{:?}", case.expected),
                    error,
                    bound,
                    fallback: case.fallback,
                };
                log::error!("{name}: {failure}");
                failures.push(failure);
            }
        }
    }
    let failed_rows = failures.iter().map(|failure| failure.row).collect::<BTreeSet<_>>().len();
    log::info!("{name}: {}/{} cases passed", cases.len() - failed_rows, cases.len());
    Report {
        name: name.to_string(),
        checked: cases.len(),
        failures,
    }
}

/// Golden-table runner bound to a [`HarnessConfig`].
#[derive(Debug, Clone, Default)]
pub struct Harness {
    pub config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Configuration from the environment, see [`HarnessConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(HarnessConfig::from_env())
    }

    /// Load `<function>/<signature>` and check `f` against it.
    pub fn run<I, O, F>(
        &self,
        function: &str,
        signature: &str,
        policy: TolerancePolicy,
        f: F,
    ) -> Result<Report, TableError>
    where
        I: Row,
        O: Row + Components,
        F: FnMut(I) -> O,
    {
        let paths = self.config.paths(function, signature);
        let cases = load_cases::<I, O>(&paths)?;
        let name = format!("{function} {signature}");
        Ok(check(&name, &cases, policy, self.config.fallback_widening, f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(row: usize, input: f64, expected: f64, tol: f64) -> Case<f64, f64> {
        Case {
            row,
            input,
            expected,
            fallback: false,
            tolerance: vec![tol],
        }
    }

    #[test]
    fn every_case_is_checked() {
        let cases = [case(0, 1.0, 2.0, 1e-15), case(1, 2.0, 5.0, 1e-15), case(2, 3.0, 6.0, 1e-15)];
        let report = check("double", &cases, TolerancePolicy::Standard, 1.0, |x: f64| 2.0 * x);
        assert_eq!(report.checked, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 1);
        assert!(!report.passed());
    }

    #[test]
    fn components_are_checked_separately() {
        let cases = [Case {
            row: 0,
            input: 1.0_f64,
            expected: (1.0_f64, 2.0_f64),
            fallback: false,
            tolerance: vec![1e-15, 0.1],
        }];
        let report = check("pair", &cases, TolerancePolicy::Standard, 1.0, |_x: f64| (1.0, 2.1));
        assert!(report.passed());
        let report = check("pair", &cases, TolerancePolicy::Standard, 1.0, |_x: f64| (1.1, 2.0));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].component, 0);
    }

    #[test]
    fn fallback_rows_are_widened() {
        let mut c = case(0, 1.0, 1.0, 1e-12);
        c.fallback = true;
        let report = check("widen", &[c], TolerancePolicy::Standard, 100.0, |_x: f64| 1.0 + 1e-10);
        assert!(report.passed());
    }

    #[test]
    #[should_panic(expected = "1 of 1 cases failed")]
    fn assert_passed_lists_failures() {
        let cases = [case(0, 1.0, 1.0, 0.0)];
        check("panics", &cases, TolerancePolicy::Standard, 1.0, |_x: f64| 1.5).assert_passed();
    }

    #[test]
    fn missing_tables_are_an_error() {
        let harness = Harness::new(HarnessConfig::default().with_tables_root("/nonexistent"));
        let r = harness.run("chdtr", "d_d-d", TolerancePolicy::Standard, |(v, x): (f64, f64)| {
            crate::chdtr(v, x)
        });
        assert!(matches!(r, Err(TableError::Missing { .. })));
    }
}
