//! Minimal column-named tables.
//!
//! A `Table` is a header plus rows of string cells, which is exactly what a
//! CSV file holds. Validators work on tables rather than typed rows so that
//! files read back from disk can be checked for missing columns.

use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use crate::error::{SynthError, SynthResult};

/// A typed row that can be laid out as table cells.
pub trait Record {
    /// Column names, in cell order.
    const COLUMNS: &'static [&'static str];

    /// Cells in [`Record::COLUMNS`] order; undefined values are empty.
    fn cells(&self) -> Vec<String>;
}

/// Render an optional float the way it is stored in a cell.
#[must_use]
pub fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

/// Header plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given header.
    #[must_use]
    pub fn new<S: Into<String>>(name: impl Into<String>, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Lay out typed records as a table.
    #[must_use]
    pub fn from_records<R: Record>(name: impl Into<String>, records: &[R]) -> Self {
        let mut table = Self::new(name, R::COLUMNS.iter().copied());
        table.rows = records.iter().map(Record::cells).collect();
        table
    }

    /// Parse comma-separated text with a header line.
    ///
    /// Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Parse`] if a data line has a different number
    /// of cells than the header, or [`SynthError::Schema`] if the text has
    /// no header at all.
    pub fn parse_csv(name: impl Into<String>, text: &str) -> SynthResult<Self> {
        let name = name.into();
        let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));

        let Some(header) = lines.by_ref().find(|l| !l.is_empty()) else {
            return Err(SynthError::schema(name, ["<header>"]));
        };
        let columns: Vec<String> = header.split(',').map(|c| c.trim().to_string()).collect();

        let mut rows = Vec::new();
        for line in lines.filter(|l| !l.is_empty()) {
            let cells: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
            if cells.len() != columns.len() {
                return Err(SynthError::Parse {
                    table: name,
                    column: format!("<{} cells, expected {}>", cells.len(), columns.len()),
                    row: rows.len(),
                    value: line.to_string(),
                });
            }
            rows.push(cells);
        }

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    /// Read a CSV file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn read_csv(name: impl Into<String>, path: &Path) -> SynthResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            SynthError::io(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::parse_csv(name, &text)
    }

    /// Render as CSV text with a trailing newline.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.columns.join(","));
        for row in &self.rows {
            let _ = writeln!(out, "{}", row.join(","));
        }
        out
    }

    /// Table name used in error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `column` in the header.
    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns error if the row width does not match the header.
    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) -> SynthResult<()> {
        let cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if cells.len() != self.columns.len() {
            return Err(SynthError::Parse {
                table: self.name.clone(),
                column: format!("<{} cells, expected {}>", cells.len(), self.columns.len()),
                row: self.rows.len(),
                value: cells.join(","),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Copy of this table without `column`. Unknown columns are ignored.
    #[must_use]
    pub fn without_column(&self, column: &str) -> Self {
        let Some(idx) = self.column_index(column) else {
            return self.clone();
        };
        let mut out = self.clone();
        out.columns.remove(idx);
        for row in &mut out.rows {
            row.remove(idx);
        }
        out
    }

    /// Accessor for one column. The caller must have checked the column
    /// exists; see [`crate::validate::assert_required_columns`].
    pub(crate) fn column<'a>(&'a self, column: &'a str) -> SynthResult<Column<'a>> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| SynthError::schema(self.name.clone(), [column]))?;
        Ok(Column {
            table: self,
            name: column,
            idx,
        })
    }
}

/// Typed access to one column of a table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column<'a> {
    table: &'a Table,
    name: &'a str,
    idx: usize,
}

impl Column<'_> {
    fn raw(&self, row: usize) -> &str {
        self.table.rows[row][self.idx].as_str()
    }

    fn parse_error(&self, row: usize) -> SynthError {
        SynthError::Parse {
            table: self.table.name.clone(),
            column: self.name.to_string(),
            row,
            value: self.raw(row).to_string(),
        }
    }

    /// Parse a required cell.
    pub(crate) fn get<T: FromStr>(&self, row: usize) -> SynthResult<T> {
        self.raw(row).parse().map_err(|_| self.parse_error(row))
    }

    /// Parse an optional cell; empty and `NaN` cells are `None`.
    pub(crate) fn get_opt_f64(&self, row: usize) -> SynthResult<Option<f64>> {
        let raw = self.raw(row);
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        let v: f64 = raw.parse().map_err(|_| self.parse_error(row))?;
        Ok(if v.is_nan() { None } else { Some(v) })
    }
}
