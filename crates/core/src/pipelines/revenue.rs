//! Revenue rollups over precomputed country and city summaries.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::money::{average_order_value, to_ksek};
use super::ranking::top_n_per_group;

/// Summed revenue and order count for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub revenue: f64,
    pub orders: u64,
}

impl Totals {
    /// Adds a row; a missing figure is skipped without dropping the other.
    pub fn add(&mut self, revenue: Option<f64>, orders: Option<i64>) {
        if let Some(revenue) = revenue {
            self.revenue += revenue;
        }
        if let Some(orders) = orders.filter(|n| *n > 0) {
            self.orders += orders as u64;
        }
    }

    pub fn figures(&self) -> RevenueFigures {
        RevenueFigures {
            ksek: to_ksek(self.revenue),
            orders: self.orders,
            avg_order_value_sek: average_order_value(self.revenue, self.orders),
        }
    }
}

/// Rounded figures for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevenueFigures {
    pub ksek: i64,
    pub orders: u64,
    pub avg_order_value_sek: Option<i64>,
}

/// A `country_summary` row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryRevenueRow {
    pub country: &'static str,
    pub revenue: Option<f64>,
    pub orders: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryRevenue {
    pub country: &'static str,
    pub figures: RevenueFigures,
}

/// Re-aggregates country rows, so duplicates are summed. Alphabetical.
pub fn revenue_by_country(
    rows: impl IntoIterator<Item = CountryRevenueRow>,
) -> Vec<CountryRevenue> {
    let mut totals: BTreeMap<&'static str, Totals> = BTreeMap::new();
    for row in rows {
        totals
            .entry(row.country)
            .or_default()
            .add(row.revenue, row.orders);
    }
    totals
        .into_iter()
        .map(|(country, t)| CountryRevenue {
            country,
            figures: t.figures(),
        })
        .collect()
}

/// A `city_summary` row with a canonical, known city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRevenueRow {
    pub country: &'static str,
    pub city: String,
    pub customers: Option<i64>,
    pub revenue: Option<f64>,
    pub orders: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityRevenue {
    pub country: &'static str,
    pub city: String,
    pub revenue: f64,
    pub figures: RevenueFigures,
}

/// Top cities per country by kSEK.
///
/// Ties on kSEK fall back to the unrounded revenue, then to first-seen
/// order of the city.
pub fn top_cities_by_revenue(
    rows: impl IntoIterator<Item = CityRevenueRow>,
    limit: Option<usize>,
) -> Vec<CityRevenue> {
    let mut positions: HashMap<(&'static str, String), usize> = HashMap::new();
    let mut grouped: Vec<(&'static str, String, Totals)> = Vec::new();
    for row in rows {
        let slot = *positions
            .entry((row.country, row.city.clone()))
            .or_insert_with(|| {
                grouped.push((row.country, row.city.clone(), Totals::default()));
                grouped.len() - 1
            });
        grouped[slot].2.add(row.revenue, row.orders);
    }

    let cities = grouped
        .into_iter()
        .map(|(country, city, totals)| CityRevenue {
            country,
            city,
            revenue: totals.revenue,
            figures: totals.figures(),
        })
        .collect();

    top_n_per_group(
        cities,
        |c| c.country,
        |a, b| {
            b.figures
                .ksek
                .cmp(&a.figures.ksek)
                .then_with(|| b.revenue.total_cmp(&a.revenue))
        },
        limit,
    )
}

/// Customers per city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCustomers {
    pub city: String,
    pub unique_customers: u64,
}

/// Top cities of one country by customer count; duplicate city rows are
/// summed and rows without a count are skipped.
pub fn top_cities_by_customers(
    rows: impl IntoIterator<Item = CityRevenueRow>,
    limit: Option<usize>,
) -> Vec<CityCustomers> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut cities: Vec<CityCustomers> = Vec::new();
    for row in rows {
        let Some(customers) = row.customers.filter(|n| *n >= 0) else {
            continue;
        };
        let slot = *positions.entry(row.city.clone()).or_insert_with(|| {
            cities.push(CityCustomers {
                city: row.city.clone(),
                unique_customers: 0,
            });
            cities.len() - 1
        });
        cities[slot].unique_customers += customers as u64;
    }

    cities.sort_by(|a, b| b.unique_customers.cmp(&a.unique_customers));
    if let Some(n) = limit {
        cities.truncate(n);
    }
    cities
}
