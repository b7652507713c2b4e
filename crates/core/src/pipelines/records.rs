//! Pass-through tables: column selection, pagination and typed cells.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::assemble::OrderedMap;
use crate::table::Table;

static TOP_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Top (\d+)$").expect("valid top-column pattern"));

static SCORE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^score\b").expect("valid score-column pattern"));

/// Every column, in file order.
pub fn all_columns(table: &Table) -> Vec<usize> {
    (0..table.headers().len()).collect()
}

/// `key` followed by the `Top N` columns in numeric order ("Top 2" before
/// "Top 10").
pub fn key_and_top_columns(table: &Table, key: usize) -> Vec<usize> {
    let mut top: Vec<(u32, usize)> = table
        .headers()
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let n = TOP_COLUMN.captures(h.trim())?.get(1)?.as_str().parse().ok()?;
            Some((n, i))
        })
        .collect();
    top.sort();
    std::iter::once(key).chain(top.into_iter().map(|(_, i)| i)).collect()
}

/// Columns whose name does not start with the word "score".
pub fn without_score_columns(table: &Table) -> Vec<usize> {
    table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| !SCORE_COLUMN.is_match(h.trim()))
        .map(|(i, _)| i)
        .collect()
}

/// Row range for `offset` / `limit`, clamped to the table.
pub fn page(len: usize, offset: usize, limit: Option<usize>) -> Range<usize> {
    let start = offset.min(len);
    let end = limit.map_or(len, |n| start.saturating_add(n).min(len));
    start..end
}

/// A cell as JSON: blank is null, integers and decimals are numbers,
/// anything else stays text.
pub fn cell_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if raw.contains('.') {
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

/// Rows in `range` as records over the selected columns.
pub fn project<'t>(
    table: &'t Table,
    columns: &[usize],
    range: Range<usize>,
) -> Vec<OrderedMap<&'t str, Value>> {
    let headers = table.headers();
    table.rows()[range]
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|&i| (headers[i].as_str(), cell_value(&row[i])))
                .collect()
        })
        .collect()
}
