//! Orders derived from transaction lines.

use std::collections::{BTreeMap, HashMap};

use crate::calendar::YearMonth;
use crate::normalize::OTHER;

use super::revenue::{RevenueFigures, Totals};

/// One transaction line after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionLine<'a> {
    pub order_id: &'a str,
    pub customer_id: &'a str,
    /// `None` when the revenue (or price/quantity) did not parse.
    pub revenue: Option<f64>,
    /// Canonical country, `None` when the raw hint was blank.
    pub country: Option<&'static str>,
    pub month: Option<YearMonth>,
}

/// An order assembled from its lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    pub id: &'a str,
    /// First non-blank customer id on the order's lines.
    pub customer_id: Option<&'a str>,
    pub revenue: f64,
    /// Month of the earliest dated line.
    pub month: Option<YearMonth>,
    pub country: &'static str,
}

#[derive(Default)]
struct Draft<'a> {
    customer_id: Option<&'a str>,
    revenue: f64,
    month: Option<YearMonth>,
    // (country, votes) in first-seen order
    votes: Vec<(&'static str, u32)>,
}

/// Groups lines by order id, in order of first appearance.
///
/// Lines without an order id are skipped. The order country is the most
/// frequent non-blank country of its lines; ties go to the country seen
/// first, and an order with no country at all is [`OTHER`].
pub fn derive_orders<'a>(lines: impl IntoIterator<Item = TransactionLine<'a>>) -> Vec<Order<'a>> {
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut drafts: Vec<(&'a str, Draft<'a>)> = Vec::new();

    for line in lines {
        if line.order_id.is_empty() {
            continue;
        }
        let slot = *positions.entry(line.order_id).or_insert_with(|| {
            drafts.push((line.order_id, Draft::default()));
            drafts.len() - 1
        });
        let draft = &mut drafts[slot].1;

        if draft.customer_id.is_none() && !line.customer_id.is_empty() {
            draft.customer_id = Some(line.customer_id);
        }
        if let Some(revenue) = line.revenue {
            draft.revenue += revenue;
        }
        if let Some(month) = line.month {
            draft.month = Some(draft.month.map_or(month, |m| m.min(month)));
        }
        if let Some(country) = line.country {
            match draft.votes.iter_mut().find(|(c, _)| *c == country) {
                Some((_, n)) => *n += 1,
                None => draft.votes.push((country, 1)),
            }
        }
    }

    drafts
        .into_iter()
        .map(|(id, draft)| Order {
            id,
            customer_id: draft.customer_id,
            revenue: draft.revenue,
            month: draft.month,
            country: mode_country(&draft.votes),
        })
        .collect()
}

fn mode_country(votes: &[(&'static str, u32)]) -> &'static str {
    let mut best: Option<(&'static str, u32)> = None;
    for &(country, n) in votes {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((country, n));
        }
    }
    best.map(|(c, _)| c).unwrap_or(OTHER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryOrders {
    pub country: &'static str,
    pub figures: RevenueFigures,
}

/// Per-country revenue, order count and average order value. Alphabetical.
pub fn orders_by_country(orders: &[Order<'_>]) -> Vec<CountryOrders> {
    let mut totals: BTreeMap<&'static str, Totals> = BTreeMap::new();
    for order in orders {
        totals
            .entry(order.country)
            .or_default()
            .add(Some(order.revenue), Some(1));
    }
    totals
        .into_iter()
        .map(|(country, t)| CountryOrders {
            country,
            figures: t.figures(),
        })
        .collect()
}
