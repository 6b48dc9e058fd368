//! Columnar golden tables stored as JSON.
//!
//! ```json
//! {"columns": [
//!   {"type": "d", "values": [0.5, "inf"]},
//!   {"type": "cd", "re": [1.0, 2.0], "im": [0.0, -1.0]},
//!   {"type": "b", "values": [false, true]}
//! ]}
//! ```
//!
//! Non-finite reals are written as the strings `"nan"`, `"inf"` and `"-inf"`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use num_complex::{Complex32, Complex64};
use serde::Deserialize;
use thiserror::Error;

use crate::metrics::extended_relative_error;

/// Failure to load or interpret a golden table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("table {path} not found")]
    Missing { path: PathBuf },

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{table} table has {found} columns, expected {expected}")]
    ColumnCount {
        table: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{table} column {column} has type {found}, expected {expected}")]
    ColumnType {
        table: &'static str,
        column: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{table} column {column} has {re} real and {im} imaginary parts")]
    ComplexShape {
        table: &'static str,
        column: usize,
        re: usize,
        im: usize,
    },

    #[error("{table} table has {found} rows, expected {expected}")]
    RowCount {
        table: &'static str,
        expected: usize,
        found: usize,
    },
}

/// A real number that may be spelled as `"nan"`, `"inf"` or `"-inf"`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawReal")]
pub struct Real(pub f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReal {
    Number(f64),
    Text(String),
}

impl TryFrom<RawReal> for Real {
    type Error = String;

    fn try_from(raw: RawReal) -> Result<Self, Self::Error> {
        match raw {
            RawReal::Number(x) => Ok(Real(x)),
            RawReal::Text(s) => match s.as_str() {
                "nan" | "NaN" => Ok(Real(f64::NAN)),
                "inf" | "+inf" | "Infinity" => Ok(Real(f64::INFINITY)),
                "-inf" | "-Infinity" => Ok(Real(f64::NEG_INFINITY)),
                other => Err(format!("not a number: {other:?}")),
            },
        }
    }
}

/// One typed column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Column {
    #[serde(rename = "d")]
    Double { values: Vec<Real> },
    #[serde(rename = "f")]
    Float { values: Vec<Real> },
    #[serde(rename = "cd")]
    ComplexDouble { re: Vec<Real>, im: Vec<Real> },
    #[serde(rename = "cf")]
    ComplexFloat { re: Vec<Real>, im: Vec<Real> },
    #[serde(rename = "i")]
    Int { values: Vec<i64> },
    #[serde(rename = "b")]
    Bool { values: Vec<bool> },
}

impl Column {
    /// Type tag as written in the file.
    pub fn tag(&self) -> &'static str {
        match self {
            Column::Double { .. } => "d",
            Column::Float { .. } => "f",
            Column::ComplexDouble { .. } => "cd",
            Column::ComplexFloat { .. } => "cf",
            Column::Int { .. } => "i",
            Column::Bool { .. } => "b",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Double { values } | Column::Float { values } => values.len(),
            Column::ComplexDouble { re, .. } | Column::ComplexFloat { re, .. } => re.len(),
            Column::Int { values } => values.len(),
            Column::Bool { values } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lengths of the real and imaginary parts when they differ.
    fn ragged_parts(&self) -> Option<(usize, usize)> {
        match self {
            Column::ComplexDouble { re, im } | Column::ComplexFloat { re, im }
                if re.len() != im.len() =>
            {
                Some((re.len(), im.len()))
            }
            _ => None,
        }
    }
}

/// A loaded table: aligned columns of equal length.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        if !path.is_file() {
            return Err(TableError::Missing {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of rows; columns of unequal length are a `RowCount` error and
    /// complex columns with unequal parts a `ComplexShape` error.
    pub fn rows(&self, table: &'static str) -> Result<usize, TableError> {
        for (column, c) in self.columns.iter().enumerate() {
            if let Some((re, im)) = c.ragged_parts() {
                return Err(TableError::ComplexShape { table, column, re, im });
            }
        }
        let n = self.columns.first().map_or(0, Column::len);
        for column in &self.columns {
            if column.len() != n {
                return Err(TableError::RowCount {
                    table,
                    expected: n,
                    found: column.len(),
                });
            }
        }
        Ok(n)
    }
}

/// A scalar stored in one column.
pub trait Cell: Copy + fmt::Debug {
    const TAG: &'static str;

    /// Value at `row`, or `None` if the column has another type.
    fn read(column: &Column, row: usize) -> Option<Self>;
}

impl Cell for f64 {
    const TAG: &'static str = "d";
    fn read(column: &Column, row: usize) -> Option<Self> {
        match column {
            Column::Double { values } => values.get(row).map(|v| v.0),
            _ => None,
        }
    }
}

impl Cell for f32 {
    const TAG: &'static str = "f";
    fn read(column: &Column, row: usize) -> Option<Self> {
        match column {
            Column::Float { values } => values.get(row).map(|v| v.0 as f32),
            _ => None,
        }
    }
}

impl Cell for Complex64 {
    const TAG: &'static str = "cd";
    fn read(column: &Column, row: usize) -> Option<Self> {
        match column {
            Column::ComplexDouble { re, im } => Some(Complex64::new(re.get(row)?.0, im.get(row)?.0)),
            _ => None,
        }
    }
}

impl Cell for Complex32 {
    const TAG: &'static str = "cf";
    fn read(column: &Column, row: usize) -> Option<Self> {
        match column {
            Column::ComplexFloat { re, im } => {
                Some(Complex32::new(re.get(row)?.0 as f32, im.get(row)?.0 as f32))
            }
            _ => None,
        }
    }
}

impl Cell for i32 {
    const TAG: &'static str = "i";
    fn read(column: &Column, row: usize) -> Option<Self> {
        match column {
            Column::Int { values } => values.get(row).and_then(|v| i32::try_from(*v).ok()),
            _ => None,
        }
    }
}

impl Cell for bool {
    const TAG: &'static str = "b";
    fn read(column: &Column, row: usize) -> Option<Self> {
        match column {
            Column::Bool { values } => values.get(row).copied(),
            _ => None,
        }
    }
}

fn cell<C: Cell>(table: &'static str, columns: &[Column], index: usize, row: usize) -> Result<C, TableError> {
    let column = columns.get(index).ok_or(TableError::ColumnCount {
        table,
        expected: index + 1,
        found: columns.len(),
    })?;
    C::read(column, row).ok_or(TableError::ColumnType {
        table,
        column: index,
        expected: C::TAG,
        found: column.tag(),
    })
}

/// A tuple of cells read from consecutive columns.
pub trait Row: Copy + fmt::Debug {
    const WIDTH: usize;

    /// Read row `row` from `columns[..WIDTH]`.
    fn read(table: &'static str, columns: &[Column], row: usize) -> Result<Self, TableError>;
}

/// Output values compared component by component.
pub trait Components {
    /// Extended relative error of each component against `desired`.
    fn errors(&self, desired: &Self) -> Vec<f64>;
}

macro_rules! scalar_row {
    ($($t:ty),*) => {$(
        impl Row for $t {
            const WIDTH: usize = 1;
            fn read(table: &'static str, columns: &[Column], row: usize) -> Result<Self, TableError> {
                cell(table, columns, 0, row)
            }
        }
    )*};
}

scalar_row!(f64, f32, Complex64, Complex32, i32);

macro_rules! scalar_components {
    ($($t:ty),*) => {$(
        impl Components for $t {
            fn errors(&self, desired: &Self) -> Vec<f64> {
                vec![extended_relative_error(*self, *desired)]
            }
        }
    )*};
}

scalar_components!(f64, f32, Complex64, Complex32);

macro_rules! tuple_row {
    ($width:expr; $($name:ident : $idx:tt),+) => {
        impl<$($name: Cell),+> Row for ($($name,)+) {
            const WIDTH: usize = $width;
            fn read(table: &'static str, columns: &[Column], row: usize) -> Result<Self, TableError> {
                Ok(($(cell::<$name>(table, columns, $idx, row)?,)+))
            }
        }

        impl<$($name: Cell + crate::metrics::ExtendedRelativeError),+> Components for ($($name,)+) {
            fn errors(&self, desired: &Self) -> Vec<f64> {
                vec![$(extended_relative_error(self.$idx, desired.$idx)),+]
            }
        }
    };
}

tuple_row!(1; A: 0);
tuple_row!(2; A: 0, B: 1);
tuple_row!(3; A: 0, B: 1, C: 2);
tuple_row!(4; A: 0, B: 1, C: 2, D: 3);
tuple_row!(5; A: 0, B: 1, C: 2, D: 3, E: 4);

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Table {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_typed_columns() {
        let table = parse(
            r#"{"columns": [
                {"type": "d", "values": [0.5, "inf", "nan"]},
                {"type": "cd", "re": [1.0, 2.0, 3.0], "im": [0.0, -1.0, "-inf"]},
                {"type": "b", "values": [false, true, false]}
            ]}"#,
        );
        assert_eq!(table.rows("test").unwrap(), 3);
        let (x, z, flag) = <(f64, Complex64, bool)>::read("test", &table.columns, 1).unwrap();
        assert_eq!(x, f64::INFINITY);
        assert_eq!(z, Complex64::new(2.0, -1.0));
        assert!(flag);
        let x: f64 = Row::read("test", &table.columns, 2).unwrap();
        assert!(x.is_nan());
    }

    #[test]
    fn type_mismatch_is_reported() {
        let table = parse(r#"{"columns": [{"type": "f", "values": [1.0]}]}"#);
        let err = <f64 as Row>::read("In", &table.columns, 0).unwrap_err();
        assert!(matches!(
            err,
            TableError::ColumnType {
                expected: "d",
                found: "f",
                ..
            }
        ));
        let v: f32 = Row::read("In", &table.columns, 0).unwrap();
        assert_eq!(v, 1.0);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let table = parse(
            r#"{"columns": [{"type": "d", "values": [1.0, 2.0]}, {"type": "i", "values": [1]}]}"#,
        );
        assert!(matches!(table.rows("In"), Err(TableError::RowCount { .. })));
    }

    #[test]
    fn ragged_complex_parts_are_rejected() {
        let table = parse(
            r#"{"columns": [
                {"type": "d", "values": [1.0, 2.0]},
                {"type": "cd", "re": [1.0, 2.0], "im": [0.0]}
            ]}"#,
        );
        let err = table.rows("In").unwrap_err();
        assert!(matches!(
            err,
            TableError::ComplexShape {
                column: 1,
                re: 2,
                im: 1,
                ..
            }
        ));
    }

    #[test]
    fn bad_number_fails_to_parse() {
        let r: Result<Table, _> = serde_json::from_str(r#"{"columns": [{"type": "d", "values": ["one"]}]}"#);
        assert!(r.is_err());
    }

    #[test]
    fn missing_file() {
        let err = Table::load(Path::new("/nonexistent/In_d-d.json")).unwrap_err();
        assert!(matches!(err, TableError::Missing { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn component_errors() {
        let a = (1.0_f64, Complex64::new(0.0, 2.0));
        let d = (1.0_f64, Complex64::new(0.0, 1.0));
        assert_eq!(a.errors(&d), vec![0.0, 1.0]);
    }
}
