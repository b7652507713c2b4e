//! Customer segmentation by distinct order count.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::limits::{LOYAL_MIN_ORDERS, REPEAT_MIN_ORDERS};

use super::money::share_pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Segment {
    New,
    Repeat,
    Loyal,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::New, Segment::Repeat, Segment::Loyal];

    /// Segment for a distinct order count; `None` for customers without
    /// orders.
    pub fn classify(orders: usize) -> Option<Self> {
        match orders {
            0 => None,
            n if n >= LOYAL_MIN_ORDERS => Some(Self::Loyal),
            n if n >= REPEAT_MIN_ORDERS => Some(Self::Repeat),
            _ => Some(Self::New),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Repeat => "Repeat",
            Self::Loyal => "Loyal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentShare {
    pub count: u64,
    pub pct: f64,
}

/// Segment counts of one country, always listing all three segments.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySegments {
    pub country: &'static str,
    pub total: u64,
    pub segments: [(Segment, SegmentShare); 3],
}

/// Classifies every customer by the number of distinct orders found for
/// them in `lines` (pairs of customer id and order id).
///
/// A customer listed twice keeps the country of the first row. Customers
/// with no orders are left out of the totals, but their country is still
/// reported, with zero counts. Lines for customers missing from the
/// customer snapshot are ignored. Countries are alphabetical.
pub fn segment_customers<'a>(
    customers: impl IntoIterator<Item = (&'a str, &'static str)>,
    lines: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<CountrySegments> {
    let mut orders: HashMap<&'a str, HashSet<&'a str>> = HashMap::new();
    for (customer, order) in lines {
        if customer.is_empty() || order.is_empty() {
            continue;
        }
        orders.entry(customer).or_default().insert(order);
    }

    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut counts: BTreeMap<&'static str, [u64; 3]> = BTreeMap::new();
    for (id, country) in customers {
        if id.is_empty() || !seen.insert(id) {
            continue;
        }
        let slots = counts.entry(country).or_default();
        let n = orders.get(id).map_or(0, HashSet::len);
        if let Some(segment) = Segment::classify(n) {
            slots[segment as usize] += 1;
        }
    }

    counts
        .into_iter()
        .map(|(country, slots)| {
            let total: u64 = slots.iter().sum();
            let segments = Segment::ALL.map(|segment| {
                let count = slots[segment as usize];
                (
                    segment,
                    SegmentShare {
                        count,
                        pct: share_pct(count, total),
                    },
                )
            });
            CountrySegments {
                country,
                total,
                segments,
            }
        })
        .collect()
}
