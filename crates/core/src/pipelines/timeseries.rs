//! Zero-filled monthly revenue per country.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::calendar::YearMonth;

use super::money::to_ksek;

/// A `city_monthly_revenue` row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRevenueRow {
    pub country: &'static str,
    pub month: Option<YearMonth>,
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    pub month: YearMonth,
    pub ksek: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    pub start: YearMonth,
    pub end: YearMonth,
    /// Alphabetical by country; every country has one point per month.
    pub countries: Vec<(&'static str, Vec<MonthPoint>)>,
}

impl MonthlySeries {
    pub fn months(&self) -> usize {
        YearMonth::range_inclusive(self.start, self.end).len()
    }
}

/// Builds the series from `start` to the latest month in the data.
///
/// Rows without a month are ignored. Rows outside the window are dropped;
/// a country appearing anywhere inside it reports every month, with 0 kSEK
/// for months without rows. When the data holds nothing at or after `start`,
/// the series is empty and ends where it starts.
pub fn monthly_revenue(
    rows: impl IntoIterator<Item = MonthlyRevenueRow>,
    start: YearMonth,
) -> MonthlySeries {
    let rows: Vec<MonthlyRevenueRow> = rows.into_iter().filter(|r| r.month.is_some()).collect();
    let end = rows
        .iter()
        .filter_map(|r| r.month)
        .max()
        .filter(|max| *max >= start)
        .unwrap_or(start);

    let mut sums: BTreeMap<&'static str, HashMap<YearMonth, f64>> = BTreeMap::new();
    for row in &rows {
        let Some(month) = row.month.filter(|m| *m >= start && *m <= end) else {
            continue;
        };
        *sums
            .entry(row.country)
            .or_default()
            .entry(month)
            .or_default() += row.revenue.unwrap_or(0.0);
    }

    let months = YearMonth::range_inclusive(start, end);
    let countries = sums
        .into_iter()
        .map(|(country, by_month)| {
            let points = months
                .iter()
                .map(|month| MonthPoint {
                    month: *month,
                    ksek: to_ksek(by_month.get(month).copied().unwrap_or(0.0)),
                })
                .collect();
            (country, points)
        })
        .collect();

    MonthlySeries {
        start,
        end,
        countries,
    }
}
