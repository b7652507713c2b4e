//! Channel breakdowns per country.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::calendar::YearMonth;
use crate::normalize::Channel;

/// Customer counts per reported channel, in [`Channel::REPORTED`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBreakdown {
    pub country: &'static str,
    pub channels: [(Channel, u64); 3],
}

impl ChannelBreakdown {
    fn zeroed(country: &'static str) -> Self {
        Self {
            country,
            channels: Channel::REPORTED.map(|c| (c, 0)),
        }
    }

    fn add(&mut self, channel: Channel, n: u64) {
        if let Some((_, count)) = self.channels.iter_mut().find(|(c, _)| *c == channel) {
            *count += n;
        }
    }
}

/// A `countries_by_channel` summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCountRow {
    pub country: &'static str,
    pub channel: Channel,
    pub customers: Option<i64>,
}

/// Sums summary rows per (country, channel).
///
/// Rows of the `Other` channel are not counted, but their country is still
/// listed with zeros. Countries are alphabetical.
pub fn channel_breakdown(rows: impl IntoIterator<Item = ChannelCountRow>) -> Vec<ChannelBreakdown> {
    let mut out: BTreeMap<&'static str, ChannelBreakdown> = BTreeMap::new();
    for row in rows {
        let entry = out
            .entry(row.country)
            .or_insert_with(|| ChannelBreakdown::zeroed(row.country));
        if let Some(n) = row.customers.filter(|n| *n > 0) {
            entry.add(row.channel, n as u64);
        }
    }
    out.into_values().collect()
}

/// Counts distinct customers per (country, channel) from raw transaction
/// lines given as (country, channel, customer id).
pub fn channel_breakdown_from_lines<'a>(
    lines: impl IntoIterator<Item = (&'static str, Channel, &'a str)>,
) -> Vec<ChannelBreakdown> {
    let mut seen: HashSet<(&'static str, Channel, &'a str)> = HashSet::new();
    let mut out: BTreeMap<&'static str, ChannelBreakdown> = BTreeMap::new();
    for (country, channel, customer) in lines {
        let entry = out
            .entry(country)
            .or_insert_with(|| ChannelBreakdown::zeroed(country));
        if customer.is_empty() || !seen.insert((country, channel, customer)) {
            continue;
        }
        entry.add(channel, 1);
    }
    out.into_values().collect()
}

/// A `countries_by_channel_by_month` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMonthRow {
    pub country: &'static str,
    pub channel: Channel,
    pub month: Option<YearMonth>,
    pub customers: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelMonth {
    pub year_month: YearMonth,
    pub customers_count: u64,
}

/// Monthly customer counts per country and channel.
///
/// Countries are alphabetical, channels in reported order (only those with
/// rows), months ascending. Rows without a month or on the `Other` channel
/// are skipped; an unparsed count adds 0.
pub fn channel_months(
    rows: impl IntoIterator<Item = ChannelMonthRow>,
) -> Vec<(&'static str, Vec<(Channel, Vec<ChannelMonth>)>)> {
    let mut sums: BTreeMap<&'static str, BTreeMap<Channel, BTreeMap<YearMonth, u64>>> =
        BTreeMap::new();
    for row in rows {
        let Some(month) = row.month else {
            continue;
        };
        if !row.channel.is_reported() {
            continue;
        }
        *sums
            .entry(row.country)
            .or_default()
            .entry(row.channel)
            .or_default()
            .entry(month)
            .or_default() += row.customers.filter(|n| *n > 0).unwrap_or(0) as u64;
    }

    sums.into_iter()
        .map(|(country, channels)| {
            let channels = channels
                .into_iter()
                .map(|(channel, months)| {
                    let points = months
                        .into_iter()
                        .map(|(year_month, customers_count)| ChannelMonth {
                            year_month,
                            customers_count,
                        })
                        .collect();
                    (channel, points)
                })
                .collect();
            (country, channels)
        })
        .collect()
}
