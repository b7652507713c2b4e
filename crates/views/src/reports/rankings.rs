//! Ranked summary views and return buckets.

use std::cmp::Ordering;
use std::collections::HashSet;

use analytics_core::pipelines::buckets::{return_buckets, BucketCount, RETURN_BUCKETS};
use analytics_core::pipelines::ranking::{by_rank_then_count, dedup_first, top_n_per_group};
use analytics_core::pipelines::records::cell_value;
use analytics_core::{require, Error, GroupFilter, Result};
use serde::Serialize;
use serde_json::Value;

use super::{country_matches, ensure_found};
use crate::engine::{body, Inputs};
use crate::view::ViewRequest;

/// Ranks rows per group, keeps the best row of each duplicate key, then
/// applies the limit.
fn rank_rows<T, K, D, G, C, F>(
    rows: Vec<T>,
    group: G,
    cmp: C,
    dedup: F,
    limit: Option<usize>,
) -> Vec<T>
where
    K: Ord,
    D: Eq + std::hash::Hash,
    G: Fn(&T) -> K,
    C: Fn(&T, &T) -> Ordering,
    F: Fn(&T) -> D,
{
    let sorted = top_n_per_group(rows, &group, &cmp, None);
    top_n_per_group(dedup_first(sorted, dedup), group, cmp, limit)
}

#[derive(Serialize)]
struct Meta<'a> {
    rows: usize,
    etag: String,
    country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    season_label: Option<Option<&'a str>>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct Ranked<'a, T> {
    data: Vec<T>,
    meta: Meta<'a>,
}

impl<'a, T> Ranked<'a, T> {
    fn new(
        data: Vec<T>,
        inputs: &Inputs,
        country: Option<&'a GroupFilter>,
        season: Option<Option<&'a GroupFilter>>,
        limit: Option<usize>,
    ) -> Self {
        let meta = Meta {
            rows: data.len(),
            etag: inputs.token(),
            country: country.map(GroupFilter::as_str),
            season_label: season.map(|s| s.map(GroupFilter::as_str)),
            limit,
        };
        Self { data, meta }
    }
}

#[derive(Serialize)]
struct BucketsMeta {
    total_customers: u64,
    buckets: usize,
    order: [&'static str; 16],
    etag: String,
}

#[derive(Serialize)]
struct Returning {
    data: Vec<BucketRecord>,
    meta: BucketsMeta,
}

#[derive(Serialize)]
struct BucketRecord {
    bucket: &'static str,
    customers: u64,
}

pub fn returning(inputs: &Inputs) -> Result<String> {
    let table = inputs.table("return_buckets")?;
    let frame = require(table, &["bucket", "customers"])?;
    let counts: Vec<BucketCount> =
        return_buckets(table.name(), frame.records().map(|r| (r.text(0), r.text(1))))?;

    body(&Returning {
        meta: BucketsMeta {
            total_customers: counts.iter().map(|c| c.customers).sum(),
            buckets: counts.len(),
            order: RETURN_BUCKETS,
            etag: inputs.token(),
        },
        data: counts
            .into_iter()
            .map(|c| BucketRecord {
                bucket: c.bucket,
                customers: c.customers,
            })
            .collect(),
    })
}

#[derive(Debug, Serialize)]
struct BrandRow {
    country: String,
    brand: String,
    count: Option<i64>,
    rank: Option<i64>,
}

pub fn top_brands(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let limit = request.limit()?;
    let filter = request.query.country_filter();
    let frame = require(inputs.table("top_brands")?, &["country", "brand", "count", "rank"])?;

    let rows: Vec<BrandRow> = frame
        .records()
        .map(|r| BrandRow {
            country: r.text(0).trim().to_string(),
            brand: r.text(1).to_string(),
            count: r.integer(2),
            rank: r.integer(3),
        })
        .filter(|row| country_matches(filter.as_ref(), &row.country) && !row.brand.is_empty())
        .collect();
    let ranked = rank_rows(
        rows,
        |r| r.country.clone(),
        |a, b| by_rank_then_count(a.rank, a.count, b.rank, b.count),
        |r| (r.country.clone(), r.brand.to_lowercase()),
        limit,
    );
    ensure_found(&ranked, "brands", &[("country", filter.as_ref())])?;

    body(&Ranked::new(ranked, inputs, filter.as_ref(), None, limit))
}

#[derive(Debug, Serialize)]
struct CategoryRow {
    country: String,
    season_label: String,
    category: String,
    count: Option<i64>,
    rank: Option<i64>,
}

pub fn top_categories(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let limit = request.limit()?;
    let country = request.query.country_filter();
    let season = request.query.season_filter();
    let frame = require(
        inputs.table("top_categories")?,
        &["country", "season_label", "category", "count", "rank"],
    )?;

    let rows: Vec<CategoryRow> = frame
        .records()
        .map(|r| CategoryRow {
            country: r.text(0).trim().to_string(),
            season_label: r.text(1).to_string(),
            category: r.text(2).to_string(),
            count: r.integer(3),
            rank: r.integer(4),
        })
        .filter(|row| {
            country_matches(country.as_ref(), &row.country)
                && season.as_ref().map_or(true, |s| s.matches(&row.season_label))
                && !row.category.is_empty()
        })
        .collect();
    let ranked = rank_rows(
        rows,
        |r| (r.country.clone(), r.season_label.clone()),
        |a, b| by_rank_then_count(a.rank, a.count, b.rank, b.count),
        |r| (r.country.clone(), r.season_label.clone(), r.category.to_lowercase()),
        limit,
    );
    ensure_found(
        &ranked,
        "categories",
        &[("country", country.as_ref()), ("season_label", season.as_ref())],
    )?;

    body(&Ranked::new(
        ranked,
        inputs,
        country.as_ref(),
        Some(season.as_ref()),
        limit,
    ))
}

#[derive(Debug, Serialize)]
struct ProductRow {
    #[serde(skip)]
    season_label: String,
    product: String,
    product_id: Value,
    brand: String,
    count: Option<i64>,
    rank: Option<i64>,
}

#[derive(Serialize)]
struct SeasonLabels {
    country: String,
    season_labels: Vec<String>,
}

/// Top products of one country and season; without a season, the seasons
/// available for the country.
pub fn top_products(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let limit = request.limit()?;
    let country = request
        .query
        .country_filter()
        .ok_or_else(|| Error::invalid_parameter("country is required"))?;
    let season = request.query.season_filter();
    let frame = require(
        inputs.table("top_groups")?,
        &["country", "season_label", "value", "name", "brand", "count", "rank"],
    )?;

    let mut matched_country = None;
    let rows: Vec<ProductRow> = frame
        .records()
        .filter(|r| {
            let c = r.text(0).trim();
            let keep = country_matches(Some(&country), c);
            if keep && matched_country.is_none() {
                matched_country = Some(c.to_string());
            }
            keep
        })
        .map(|r| ProductRow {
            season_label: r.text(1).to_string(),
            product: r.text(3).to_string(),
            product_id: cell_value(r.text(2)),
            brand: r.text(4).to_string(),
            count: r.integer(5),
            rank: r.integer(6),
        })
        .collect();
    ensure_found(&rows, "products", &[("country", Some(&country))])?;
    let country_name = matched_country.unwrap_or_default();

    let Some(season) = season else {
        let mut seen = HashSet::new();
        let season_labels = rows
            .into_iter()
            .map(|r| r.season_label)
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        return body(&SeasonLabels {
            country: country_name,
            season_labels,
        });
    };

    let rows: Vec<ProductRow> = rows
        .into_iter()
        .filter(|r| season.matches(&r.season_label))
        .collect();
    let ranked = rank_rows(
        rows,
        |_| (),
        |a, b| by_rank_then_count(a.rank, a.count, b.rank, b.count),
        |r| r.product_id.to_string(),
        limit,
    );
    ensure_found(
        &ranked,
        "products",
        &[("country", Some(&country)), ("season_label", Some(&season))],
    )?;

    body(&Ranked::new(
        ranked,
        inputs,
        Some(&country),
        Some(Some(&season)),
        limit,
    ))
}

#[derive(Debug, Serialize)]
struct RepurchaseRow {
    country: String,
    product: String,
    product_id: Value,
    brand: String,
    repurchasers: Option<i64>,
    rank: Option<i64>,
}

pub fn top_repurchase(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let limit = request.limit()?;
    let filter = request.query.country_filter();
    let frame = require(
        inputs.table("top_repurchase")?,
        &["country", "value", "name", "brand", "repurchasers", "rank"],
    )?;

    let rows: Vec<RepurchaseRow> = frame
        .records()
        .map(|r| RepurchaseRow {
            country: r.text(0).trim().to_string(),
            product_id: cell_value(r.text(1)),
            product: r.text(2).to_string(),
            brand: r.text(3).to_string(),
            repurchasers: r.integer(4),
            rank: r.integer(5),
        })
        .filter(|row| country_matches(filter.as_ref(), &row.country))
        .collect();
    let ranked = rank_rows(
        rows,
        |r| r.country.clone(),
        |a, b| by_rank_then_count(a.rank, a.repurchasers, b.rank, b.repurchasers),
        |r| (r.country.clone(), r.product_id.to_string()),
        limit,
    );
    ensure_found(&ranked, "repurchase leaders", &[("country", filter.as_ref())])?;

    body(&Ranked::new(ranked, inputs, filter.as_ref(), None, limit))
}
