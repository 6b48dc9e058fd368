//! Golden-table validation.
//!
//! Each function has a directory of tables named by type signature, e.g.
//! `chdtr/In_d_d-d.json`, `chdtr/Out_d_d-d.json` and
//! `chdtr/Err_d_d-d_<platform>.json`. Type tags are `d`, `f`, `cd`, `cf` and
//! `i`; inputs and outputs are separated by `-`.
//!
//! ```no_run
//! use special_fns::validation::{Harness, TolerancePolicy};
//!
//! let report = Harness::from_env()
//!     .run("chdtr", "d_d-d", TolerancePolicy::Standard, |(v, x): (f64, f64)| {
//!         special_fns::chdtr(v, x)
//!     })
//!     .unwrap();
//! report.assert_passed();
//! ```

mod config;
mod harness;
mod table;
mod tolerance;

pub use config::{default_platform, HarnessConfig, TablePaths, PLATFORM_ENV, TABLES_ENV};
pub use harness::{check, load_cases, Case, Failure, Harness, Report};
pub use table::{Cell, Column, Components, Real, Row, Table, TableError};
pub use tolerance::TolerancePolicy;
