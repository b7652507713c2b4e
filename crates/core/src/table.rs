//! In-memory tabular snapshot of a dataset.
//!
//! A `Table` is immutable once built. Reloads replace the whole table; no
//! row is ever edited in place.

use std::collections::HashMap;

use crate::error::{Error, Result};

/// A named, rectangular table of raw text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table, rejecting ragged rows and duplicate headers.
    pub fn new(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self> {
        let name = name.into();

        let mut index = HashMap::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            if index.insert(header.clone(), i).is_some() {
                return Err(Error::corrupt(
                    &name,
                    format!("duplicate column '{}'", header),
                ));
            }
        }

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(Error::corrupt(
                &name,
                format!(
                    "row {} has {} cells but the header has {}",
                    i + 1,
                    row.len(),
                    headers.len()
                ),
            ));
        }

        Ok(Self {
            name,
            headers,
            index,
            rows,
        })
    }

    /// Dataset name this table was loaded as.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }
}
