//! Revenue views: cities, countries, derived orders and the monthly series.

use analytics_core::calendar::YearMonth;
use analytics_core::normalize::{canonical_city, canonical_country, is_unknown_city};
use analytics_core::pipelines::orders::{
    derive_orders, orders_by_country as rollup_orders, TransactionLine,
};
use analytics_core::pipelines::revenue::{
    revenue_by_country, top_cities_by_customers, top_cities_by_revenue, CityCustomers,
    CityRevenueRow, CountryRevenueRow, RevenueFigures,
};
use analytics_core::pipelines::timeseries::{monthly_revenue, MonthPoint, MonthlyRevenueRow};
use analytics_core::schema::resolve_field;
use analytics_core::{
    group_records, require, Error, FieldSource, GroupOrder, OrderedMap, Result, ViewQuery,
};
use serde::Serialize;

use super::{country_matches, ensure_found};
use crate::engine::{body, Inputs};
use crate::view::ViewRequest;

#[derive(Serialize)]
struct TopCities {
    country_id: &'static str,
    country: &'static str,
    top_cities: Vec<CityCustomers>,
}

pub fn top_cities(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let market = request.market()?;
    let limit = request.limit()?;
    let frame = require(
        inputs.table("city_summary")?,
        &["country", "city", "customers_count"],
    )?;

    let rows = frame.records().filter_map(|r| {
        if canonical_country(r.text(0)) != market.name {
            return None;
        }
        let city = canonical_city(r.text(1));
        if is_unknown_city(&city) {
            return None;
        }
        Some(CityRevenueRow {
            country: market.name,
            city,
            customers: r.integer(2),
            revenue: None,
            orders: None,
        })
    });
    let cities = top_cities_by_customers(rows, limit);
    if cities.is_empty() {
        return Err(Error::not_found(format!("no cities for country id {}", market.id)));
    }

    body(&TopCities {
        country_id: market.id,
        country: market.name,
        top_cities: cities,
    })
}

#[derive(Serialize)]
struct CityRecord {
    city: String,
    ksek: i64,
    avg_order_value_sek: Option<i64>,
}

#[derive(Serialize)]
struct CitiesByRevenue {
    top_cities_by_revenue_ksek: OrderedMap<&'static str, Vec<CityRecord>>,
}

pub fn cities_by_revenue(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let limit = request.limit()?;
    let filter = request.query.country_filter();
    let frame = require(
        inputs.table("city_summary")?,
        &["country", "city", "total_revenue_sek", "total_orders"],
    )?;

    let rows = frame.records().filter_map(|r| {
        let country = canonical_country(r.text(0));
        let city = canonical_city(r.text(1));
        if !country_matches(filter.as_ref(), country) || is_unknown_city(&city) {
            return None;
        }
        Some(CityRevenueRow {
            country,
            city,
            customers: None,
            revenue: r.number(2),
            orders: r.integer(3),
        })
    });
    let ranked = top_cities_by_revenue(rows, limit);
    ensure_found(&ranked, "cities", &[("country", filter.as_ref())])?;

    body(&CitiesByRevenue {
        top_cities_by_revenue_ksek: group_records(
            ranked,
            |c| c.country,
            GroupOrder::Sorted,
            |c| CityRecord {
                city: c.city,
                ksek: c.figures.ksek,
                avg_order_value_sek: c.figures.avg_order_value_sek,
            },
        ),
    })
}

#[derive(Serialize)]
struct CountriesByRevenue {
    revenue_by_country_ksek: OrderedMap<&'static str, i64>,
    avg_order_value_by_country_sek: OrderedMap<&'static str, Option<i64>>,
    orders_count_by_country: OrderedMap<&'static str, u64>,
}

pub fn countries_by_revenue(inputs: &Inputs) -> Result<String> {
    let frame = require(
        inputs.table("country_summary")?,
        &["country", "total_revenue_sek", "total_orders"],
    )?;
    let countries = revenue_by_country(frame.records().map(|r| CountryRevenueRow {
        country: canonical_country(r.text(0)),
        revenue: r.number(1),
        orders: r.integer(2),
    }));

    body(&CountriesByRevenue {
        revenue_by_country_ksek: countries.iter().map(|c| (c.country, c.figures.ksek)).collect(),
        avg_order_value_by_country_sek: countries
            .iter()
            .map(|c| (c.country, c.figures.avg_order_value_sek))
            .collect(),
        orders_count_by_country: countries.iter().map(|c| (c.country, c.figures.orders)).collect(),
    })
}

#[derive(Serialize)]
struct OrdersByCountry {
    orders_by_country: OrderedMap<&'static str, RevenueFigures>,
    revenue_source: FieldSource,
}

/// Columns every derived-order computation needs.
const ORDER_COLUMNS: [&str; 4] = ["orderId", "shopUserId", "invoiceCountryId", "created"];

pub fn orders_by_country(inputs: &Inputs) -> Result<String> {
    let table = inputs.table("transactions")?;
    let source = resolve_field(table, "revenue", &["price", "quantity"]);

    let mut columns = ORDER_COLUMNS.to_vec();
    match &source {
        FieldSource::Present(column) => columns.push(column.as_str()),
        FieldSource::Derived(_) | FieldSource::Absent => columns.extend(["price", "quantity"]),
    }
    let frame = require(table, &columns)?;

    let lines = frame.records().map(|r| TransactionLine {
        order_id: r.text(0),
        customer_id: r.text(1),
        country: r.non_empty(2).map(canonical_country),
        month: YearMonth::from_cell(r.text(3)),
        revenue: if source.is_present() {
            r.number(4)
        } else {
            r.number(4).zip(r.number(5)).map(|(price, qty)| price * qty)
        },
    });
    let orders = derive_orders(lines);

    body(&OrdersByCountry {
        orders_by_country: rollup_orders(&orders)
            .into_iter()
            .map(|c| (c.country, c.figures))
            .collect(),
        revenue_source: source,
    })
}

#[derive(Serialize)]
struct SalesMonth {
    sales_month_ksek: OrderedMap<&'static str, Vec<MonthPoint>>,
    start_month: YearMonth,
    end_month: YearMonth,
    month_source: FieldSource,
}

pub fn sales_month(inputs: &Inputs, query: &ViewQuery) -> Result<String> {
    let start = query.start_month()?;
    let table = inputs.table("city_monthly_revenue")?;
    let source = resolve_field(table, "year_month", &["order_date"]);
    let month_column = match &source {
        FieldSource::Present(column) => column.as_str(),
        FieldSource::Derived(columns) => columns[0].as_str(),
        FieldSource::Absent => "year_month",
    };
    let frame = require(table, &["country", "total_revenue_sek", month_column])?;

    let series = monthly_revenue(
        frame.records().map(|r| MonthlyRevenueRow {
            country: canonical_country(r.text(0)),
            revenue: r.number(1),
            month: YearMonth::from_cell(r.text(2)),
        }),
        start,
    );

    body(&SalesMonth {
        sales_month_ksek: series.countries.into_iter().collect(),
        start_month: series.start,
        end_month: series.end,
        month_source: source,
    })
}
