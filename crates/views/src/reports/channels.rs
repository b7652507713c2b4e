//! Channel views.

use analytics_core::calendar::YearMonth;
use analytics_core::normalize::{canonical_channel, canonical_country};
use analytics_core::pipelines::channels::{
    channel_breakdown, channel_breakdown_from_lines, channel_months, ChannelBreakdown,
    ChannelCountRow, ChannelMonth, ChannelMonthRow,
};
use analytics_core::pipelines::share_pct;
use analytics_core::{require, OrderedMap, Result};
use serde::Serialize;
use tracing::warn;

use crate::engine::{body, Inputs};

#[derive(Serialize)]
struct CountriesByChannel {
    countries_by_channel: OrderedMap<&'static str, OrderedMap<&'static str, u64>>,
}

pub fn countries_by_channel(inputs: &Inputs) -> Result<String> {
    let frame = require(
        inputs.table("countries_by_channel")?,
        &["country", "channel", "customers_count"],
    )?;
    let breakdown = channel_breakdown(frame.records().map(|r| ChannelCountRow {
        country: canonical_country(r.text(0)),
        channel: canonical_channel(r.text(1)),
        customers: r.integer(2),
    }));

    body(&CountriesByChannel {
        countries_by_channel: breakdown
            .into_iter()
            .map(|b| {
                let counts = b.channels.iter().map(|(c, n)| (c.as_str(), *n)).collect();
                (b.country, counts)
            })
            .collect(),
    })
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Share {
    customers: u64,
    pct: f64,
}

#[derive(Serialize)]
struct ChannelShare {
    channel_share: OrderedMap<&'static str, OrderedMap<&'static str, Share>>,
}

fn shares(breakdown: &ChannelBreakdown) -> OrderedMap<&'static str, Share> {
    let total: u64 = breakdown.channels.iter().map(|(_, n)| n).sum();
    breakdown
        .channels
        .iter()
        .map(|(channel, n)| {
            (
                channel.as_str(),
                Share {
                    customers: *n,
                    pct: share_pct(*n, total),
                },
            )
        })
        .collect()
}

/// Distinct customers per channel computed from raw transaction lines.
pub fn channel_share(inputs: &Inputs) -> Result<String> {
    let frame = require(
        inputs.table("transactions")?,
        &["invoiceCountryId", "type", "shopUserId"],
    )?;
    let breakdown = channel_breakdown_from_lines(
        frame
            .records()
            .map(|r| (canonical_country(r.text(0)), canonical_channel(r.text(1)), r.text(2))),
    );

    body(&ChannelShare {
        channel_share: breakdown.iter().map(|b| (b.country, shares(b))).collect(),
    })
}

pub fn countries_by_channel_by_month(inputs: &Inputs) -> Result<String> {
    let frame = require(
        inputs.table("countries_by_channel_by_month")?,
        &["country", "channel", "year_month", "customers_count"],
    )?;
    let rows: Vec<ChannelMonthRow> = frame
        .records()
        .map(|r| ChannelMonthRow {
            country: canonical_country(r.text(0)),
            channel: canonical_channel(r.text(1)),
            month: YearMonth::from_cell(r.text(2)),
            customers: r.integer(3),
        })
        .collect();
    let undated = rows.iter().filter(|r| r.month.is_none()).count();
    if undated > 0 {
        warn!(
            dataset = "countries_by_channel_by_month",
            rows = undated,
            "Skipping rows without a parseable year_month"
        );
    }
    let months = channel_months(rows);

    let payload: OrderedMap<&'static str, OrderedMap<&'static str, Vec<ChannelMonth>>> = months
        .into_iter()
        .map(|(country, channels)| {
            let channels = channels
                .into_iter()
                .map(|(channel, points)| (channel.as_str(), points))
                .collect();
            (country, channels)
        })
        .collect();
    body(&payload)
}
