//! Return-interval buckets.

use crate::error::{Error, Result};
use crate::schema::parse_number;

/// Bucket labels in display order.
pub const RETURN_BUCKETS: [&str; 16] = [
    "week 1",
    "week 2",
    "week 3",
    "1 month",
    "2 months",
    "3 months",
    "4 months",
    "5 months",
    "6 months",
    "7 months",
    "8 months",
    "9 months",
    "10 months",
    "11 months",
    "12 months",
    "> 1 year",
];

/// Position of a label in [`RETURN_BUCKETS`], ignoring case and spacing.
pub fn bucket_position(label: &str) -> Option<usize> {
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
    RETURN_BUCKETS
        .iter()
        .position(|b| b.eq_ignore_ascii_case(&label))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketCount {
    pub bucket: &'static str,
    pub customers: u64,
}

/// Orders bucket rows given as (label, customers cell) and sums duplicates.
///
/// Buckets without rows are not listed. An unknown label or a customer
/// count that is not a non-negative whole number makes the table corrupt.
pub fn return_buckets<'a>(
    dataset: &str,
    rows: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Vec<BucketCount>> {
    let mut sums: [Option<u64>; RETURN_BUCKETS.len()] = [None; RETURN_BUCKETS.len()];
    for (label, customers) in rows {
        let position = bucket_position(label).ok_or_else(|| {
            Error::corrupt(dataset, format!("unknown return bucket '{}'", label))
        })?;
        let customers = parse_number(customers)
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .ok_or_else(|| {
                Error::corrupt(
                    dataset,
                    format!("customers for '{}' is not a whole number: '{}'", label, customers),
                )
            })? as u64;
        *sums[position].get_or_insert(0) += customers;
    }

    Ok(RETURN_BUCKETS
        .iter()
        .zip(sums)
        .filter_map(|(bucket, sum)| {
            sum.map(|customers| BucketCount {
                bucket: *bucket,
                customers,
            })
        })
        .collect())
}
