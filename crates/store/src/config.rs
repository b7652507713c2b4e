//! Dataset store configuration and the default catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Dataset names and their default backing files.
pub const CATALOG: [(&str, &str); 19] = [
    ("customers", "customers_clean.csv"),
    ("transactions", "transactions_clean.csv"),
    ("customer_summary", "customer_summary.csv"),
    ("country_summary", "country_summary.csv"),
    ("city_summary", "city_summary.csv"),
    ("city_monthly_revenue", "city_monthly_revenue.csv"),
    ("countries_by_channel", "countries_by_channel.csv"),
    ("countries_by_channel_by_month", "countries_by_channel_by_month.csv"),
    ("return_buckets", "return_buckets.csv"),
    ("top_brands", "top_brands.csv"),
    ("top_categories", "top_categories.csv"),
    ("top_groups", "top_groups.csv"),
    ("top_repurchase", "top_repurchase.csv"),
    ("cooccurring_groups", "cooccurring_groups.csv"),
    ("complements", "complements.csv"),
    ("basket_cf", "basket_cf.csv"),
    ("semantic_similarity_recs", "semantic_similarity_recs.csv"),
    ("top_same_brand", "top_same_brand.csv"),
    ("hybrid", "hybrid.csv"),
];

/// Dataset store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory the dataset files are resolved against
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Dataset name to file name (relative to `data_dir`) or absolute path
    #[serde(default = "default_datasets")]
    pub datasets: BTreeMap<String, String>,
    /// Extra attempts after a transient read failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base retry backoff in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("/app/data")
}

fn default_datasets() -> BTreeMap<String, String> {
    CATALOG
        .iter()
        .map(|(name, file)| (name.to_string(), file.to_string()))
        .collect()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    50
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            datasets: default_datasets(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl StoreConfig {
    /// Default catalog rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Resolves the backing path of a dataset.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        let file = self.datasets.get(name)?;
        Some(self.data_dir.join(file))
    }

    /// Configured dataset names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let config = StoreConfig::with_data_dir("/data");
        assert_eq!(
            config.path_for("customers"),
            Some(PathBuf::from("/data/customers_clean.csv"))
        );
        assert_eq!(config.path_for("nope"), None);
        assert_eq!(config.names().count(), CATALOG.len());
    }

    #[test]
    fn test_absolute_file_overrides_dir() {
        let mut config = StoreConfig::with_data_dir("/data");
        config
            .datasets
            .insert("hybrid".into(), "/srv/recs/hybrid_v2.csv".into());
        assert_eq!(
            config.path_for("hybrid"),
            Some(PathBuf::from("/srv/recs/hybrid_v2.csv"))
        );
    }
}
