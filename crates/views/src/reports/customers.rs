//! Customer views: counts by country, segments and demographics.

use analytics_core::normalize::{canonical_country, canonical_gender};
use analytics_core::pipelines::demographics::{age_gender, PersonRow, GENDERS};
use analytics_core::pipelines::rollup::{self, CustomerRow};
use analytics_core::pipelines::segments::{segment_customers, SegmentShare};
use analytics_core::{require, OrderedMap, Result, ViewQuery};
use serde::Serialize;

use super::{country_matches, ensure_found};
use crate::engine::{body, Inputs};

const CUSTOMER_COLUMNS: [&str; 2] = ["shopUserId", "invoiceCountryId"];

#[derive(Serialize)]
struct CustomersByCountry<'a> {
    customers_by_country: OrderedMap<&'a str, u64>,
}

pub fn customers_by_country(inputs: &Inputs) -> Result<String> {
    let frame = require(inputs.table("customers")?, &CUSTOMER_COLUMNS)?;
    let counts = rollup::customers_by_country(frame.records().map(|r| CustomerRow {
        id: r.text(0),
        country: canonical_country(r.text(1)),
    }));

    body(&CustomersByCountry {
        customers_by_country: counts.iter().map(|c| (c.country, c.customers)).collect(),
    })
}

#[derive(Serialize)]
struct SegmentsPayload {
    total: u64,
    segments: OrderedMap<&'static str, SegmentShare>,
}

#[derive(Serialize)]
struct CustomerSegments {
    customer_segments: OrderedMap<&'static str, SegmentsPayload>,
}

pub fn customer_segments(inputs: &Inputs, query: &ViewQuery) -> Result<String> {
    let customers = require(inputs.table("customers")?, &CUSTOMER_COLUMNS)?;
    let lines = require(inputs.table("transactions")?, &["shopUserId", "orderId"])?;

    let filter = query.country_filter();
    let mut countries = segment_customers(
        customers
            .records()
            .map(|r| (r.text(0), canonical_country(r.text(1)))),
        lines.records().map(|r| (r.text(0), r.text(1))),
    );
    countries.retain(|c| country_matches(filter.as_ref(), c.country));
    ensure_found(&countries, "customers", &[("country", filter.as_ref())])?;

    body(&CustomerSegments {
        customer_segments: countries
            .into_iter()
            .map(|c| {
                let segments = c
                    .segments
                    .iter()
                    .map(|(segment, share)| (segment.as_str(), *share))
                    .collect();
                (
                    c.country,
                    SegmentsPayload {
                        total: c.total,
                        segments,
                    },
                )
            })
            .collect(),
    })
}

#[derive(Serialize)]
struct AgeGenderPayload {
    ages_sorted: Vec<i64>,
    genders: [&'static str; 2],
    by_country: OrderedMap<&'static str, OrderedMap<&'static str, OrderedMap<i64, u64>>>,
}

pub fn customers_age_gender(inputs: &Inputs) -> Result<String> {
    let frame = require(inputs.table("customer_summary")?, &["country", "age", "gender"])?;
    let tab = age_gender(frame.records().map(|r| PersonRow {
        country: canonical_country(r.text(0)),
        age: r.number(1),
        gender: canonical_gender(r.text(2)),
    }));

    body(&AgeGenderPayload {
        ages_sorted: tab.ages,
        genders: GENDERS,
        by_country: tab
            .by_country
            .into_iter()
            .map(|(country, genders)| {
                let genders = genders
                    .into_iter()
                    .map(|(gender, ages)| (gender, ages.into_iter().collect()))
                    .collect();
                (country, genders)
            })
            .collect(),
    })
}
