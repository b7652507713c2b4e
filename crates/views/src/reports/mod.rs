//! Per-view computations: schema check, normalization, pipeline, assembly.

pub mod channels;
pub mod customers;
pub mod rankings;
pub mod revenue;
pub mod tables;

use analytics_core::normalize::{canonical_country, OTHER};
use analytics_core::{Error, GroupFilter, Result};

/// Whether a country label passes a country filter.
///
/// The filter may name the country or give one of its codes; the label may
/// be a name or a code as well.
pub(crate) fn country_matches(filter: Option<&GroupFilter>, country: &str) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    if filter.matches(country) {
        return true;
    }
    let resolved = canonical_country(filter.as_str());
    resolved != OTHER && resolved == canonical_country(country)
}

/// Turns an empty filtered result into `NotFound`.
pub(crate) fn ensure_found<T>(
    rows: &[T],
    what: &str,
    filters: &[(&str, Option<&GroupFilter>)],
) -> Result<()> {
    let active: Vec<String> = filters
        .iter()
        .filter_map(|(name, f)| f.map(|f| format!("{}='{}'", name, f.as_str())))
        .collect();
    if rows.is_empty() && !active.is_empty() {
        return Err(Error::not_found(format!(
            "no {} for {}",
            what,
            active.join(", ")
        )));
    }
    Ok(())
}
