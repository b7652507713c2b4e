//! Age and gender cross-tabulation.

use std::collections::{BTreeMap, BTreeSet};

use crate::limits::{MAX_AGE, MIN_AGE};

/// Gender labels the cross-tab reports, in output order.
pub const GENDERS: [&str; 2] = ["Female", "Male"];

/// A `customer_summary` row; `gender` is already title-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRow {
    pub country: &'static str,
    pub age: Option<f64>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeGender {
    /// Every age present anywhere in the result, ascending.
    pub ages: Vec<i64>,
    /// Alphabetical by country; genders in [`GENDERS`] order, only those
    /// with rows; ages ascending.
    pub by_country: Vec<(&'static str, Vec<(&'static str, Vec<(i64, u64)>)>)>,
}

/// Counts rows per (country, gender, age).
///
/// Rows outside the plausible age range or with another gender are left
/// out. Fractional ages are truncated after the range check.
pub fn age_gender(rows: impl IntoIterator<Item = PersonRow>) -> AgeGender {
    let mut ages = BTreeSet::new();
    let mut counts: BTreeMap<&'static str, BTreeMap<usize, BTreeMap<i64, u64>>> = BTreeMap::new();

    for row in rows {
        let Some(age) = row
            .age
            .filter(|a| *a >= MIN_AGE as f64 && *a <= MAX_AGE as f64)
            .map(|a| a.trunc() as i64)
        else {
            continue;
        };
        let Some(gender) = row
            .gender
            .as_deref()
            .and_then(|g| GENDERS.iter().position(|known| *known == g))
        else {
            continue;
        };
        ages.insert(age);
        *counts
            .entry(row.country)
            .or_default()
            .entry(gender)
            .or_default()
            .entry(age)
            .or_default() += 1;
    }

    let by_country = counts
        .into_iter()
        .map(|(country, genders)| {
            let genders = genders
                .into_iter()
                .map(|(g, by_age)| (GENDERS[g], by_age.into_iter().collect()))
                .collect();
            (country, genders)
        })
        .collect();

    AgeGender {
        ages: ages.into_iter().collect(),
        by_country,
    }
}
