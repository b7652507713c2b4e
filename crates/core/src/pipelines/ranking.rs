//! Stable top-N per group.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Sorts rows by group ascending, then by `rank_cmp` within the group, and
/// keeps the first `limit` rows of each group (all of them when `None`).
///
/// The sort is stable, so rows `rank_cmp` considers equal keep their input
/// order. Groups with fewer rows than `limit` are returned as they are.
pub fn top_n_per_group<T, K, G, C>(
    mut rows: Vec<T>,
    group: G,
    rank_cmp: C,
    limit: Option<usize>,
) -> Vec<T>
where
    K: Ord,
    G: Fn(&T) -> K,
    C: Fn(&T, &T) -> Ordering,
{
    rows.sort_by(|a, b| group(a).cmp(&group(b)).then_with(|| rank_cmp(a, b)));

    let Some(limit) = limit else {
        return rows;
    };

    let mut out = Vec::with_capacity(rows.len());
    let mut current: Option<K> = None;
    let mut taken = 0;
    for row in rows {
        let key = group(&row);
        if current.as_ref() != Some(&key) {
            current = Some(key);
            taken = 0;
        }
        if taken < limit {
            out.push(row);
            taken += 1;
        }
    }
    out
}

/// Ordering for tables that already carry a rank: rank ascending with
/// unranked rows last, then `count` descending.
pub fn by_rank_then_count(
    a_rank: Option<i64>,
    a_count: Option<i64>,
    b_rank: Option<i64>,
    b_count: Option<i64>,
) -> Ordering {
    let rank = match (a_rank, b_rank) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    rank.then_with(|| b_count.unwrap_or(0).cmp(&a_count.unwrap_or(0)))
}

/// Keeps the first row of every key, preserving order.
pub fn dedup_first<T, K, F>(rows: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    rows.into_iter().filter(|row| seen.insert(key(row))).collect()
}
