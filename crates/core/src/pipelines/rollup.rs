//! Unique-count rollups.

use std::collections::{HashMap, HashSet};

/// One customer row after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerRow<'a> {
    pub id: &'a str,
    pub country: &'static str,
}

/// Number of distinct customers in a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryCount {
    pub country: &'static str,
    pub customers: u64,
}

/// Counts distinct customer ids per country.
///
/// Rows without an id cannot be told apart and are skipped. Output is sorted
/// by count descending, ties by country name ascending.
pub fn customers_by_country<'a>(
    rows: impl IntoIterator<Item = CustomerRow<'a>>,
) -> Vec<CountryCount> {
    let mut seen: HashMap<&'static str, HashSet<&'a str>> = HashMap::new();
    for row in rows {
        if row.id.is_empty() {
            continue;
        }
        seen.entry(row.country).or_default().insert(row.id);
    }

    let mut counts: Vec<CountryCount> = seen
        .into_iter()
        .map(|(country, ids)| CountryCount {
            country,
            customers: ids.len() as u64,
        })
        .collect();
    counts.sort_by(|a, b| {
        b.customers
            .cmp(&a.customers)
            .then_with(|| a.country.cmp(b.country))
    });
    counts
}
