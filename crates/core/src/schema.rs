//! Schema guard: column presence checks and lenient cell coercion.
//!
//! `require` is the only way views read a table. It fails with a
//! `SchemaMismatch` listing every missing column, sorted, and otherwise hands
//! back a `Frame` whose records are addressed by the position of the column
//! in the requested list.
//!
//! Coercion never fails a view. A cell that does not parse is "missing" and
//! the row drops out of whichever computation needed that field.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::table::Table;

/// Validated view over the required columns of a table.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    table: &'a Table,
    positions: Vec<usize>,
}

/// Checks that every column is present and returns a frame over them.
pub fn require<'a>(table: &'a Table, columns: &[&str]) -> Result<Frame<'a>> {
    let mut positions = Vec::with_capacity(columns.len());
    let mut missing = Vec::new();

    for column in columns {
        match table.column_index(column) {
            Some(i) => positions.push(i),
            None => missing.push(*column),
        }
    }

    if !missing.is_empty() {
        return Err(Error::schema_mismatch(table.name(), missing));
    }

    Ok(Frame { table, positions })
}

impl<'a> Frame<'a> {
    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates the rows in source order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.table.rows().iter().map(move |cells| Record {
            cells,
            positions: &self.positions,
        })
    }
}

/// One row seen through a frame.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    cells: &'a [String],
    positions: &'a [usize],
}

impl<'a> Record<'a> {
    /// Trimmed text of the `i`-th required column.
    pub fn text(&self, i: usize) -> &'a str {
        clean_text(&self.cells[self.positions[i]])
    }

    /// Trimmed text, or `None` when the cell is blank.
    pub fn non_empty(&self, i: usize) -> Option<&'a str> {
        let text = self.text(i);
        (!text.is_empty()).then_some(text)
    }

    /// Leniently parsed number.
    pub fn number(&self, i: usize) -> Option<f64> {
        parse_number(self.text(i))
    }

    /// Leniently parsed integer; fractional values are truncated.
    pub fn integer(&self, i: usize) -> Option<i64> {
        parse_integer(self.text(i))
    }
}

/// Strips leading and trailing whitespace, including non-breaking spaces.
pub fn clean_text(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{a0}' || c == '\u{202f}')
}

/// Parses a number written in either Swedish or English conventions.
///
/// - Spaces, non-breaking spaces and apostrophes are thousands separators.
/// - With both `.` and `,` present, the later one is the decimal mark.
/// - A single `,` alone is a decimal mark; repeated `,` are separators.
/// - Repeated `.` alone are separators.
pub fn parse_number(raw: &str) -> Option<f64> {
    let compact: String = raw
        .chars()
        .filter(|c| !(c.is_whitespace() || *c == '\u{a0}' || *c == '\u{202f}' || *c == '\''))
        .collect();

    if compact.is_empty() {
        return None;
    }

    let commas = compact.matches(',').count();
    let dots = compact.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) | (0, 1) => compact,
        (0, _) => compact.replace('.', ""),
        (1, 0) => compact.replace(',', "."),
        (_, 0) => compact.replace(',', ""),
        _ => {
            let last_comma = compact.rfind(',').unwrap_or(0);
            let last_dot = compact.rfind('.').unwrap_or(0);
            if last_comma > last_dot {
                compact.replace('.', "").replace(',', ".")
            } else {
                compact.replace(',', "")
            }
        }
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an integer through `parse_number`, truncating toward zero.
pub fn parse_integer(raw: &str) -> Option<i64> {
    parse_number(raw).map(|v| v.trunc() as i64)
}

/// Where a view obtains a field that may come from more than one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "columns", rename_all = "lowercase")]
pub enum FieldSource {
    /// The dedicated column exists.
    Present(String),
    /// The field is computed from these fallback columns.
    Derived(Vec<String>),
    /// Neither the column nor its fallbacks exist.
    Absent,
}

impl FieldSource {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Short label suitable for response metadata.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Present(_) => "present",
            Self::Derived(_) => "derived",
            Self::Absent => "absent",
        }
    }
}

/// Resolves a field against its dedicated column, then against a fallback
/// set that must be present in full.
pub fn resolve_field(table: &Table, column: &str, fallback: &[&str]) -> FieldSource {
    if table.has_column(column) {
        return FieldSource::Present(column.to_string());
    }
    if !fallback.is_empty() && fallback.iter().all(|c| table.has_column(c)) {
        return FieldSource::Derived(fallback.iter().map(|c| c.to_string()).collect());
    }
    FieldSource::Absent
}
