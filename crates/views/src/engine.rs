//! The view engine: the one entry point the routing layer calls.

use std::sync::Arc;
use std::time::Instant;

use analytics_core::{Error, Result, Table};
use dataset_store::{combined_token, DatasetStore, Snapshot};
use serde::Serialize;
use telemetry::metrics;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, RenderCache, Rendered};
use crate::reports;
use crate::view::{ViewName, ViewRequest};

/// Snapshots of every dataset one request reads.
pub struct Inputs {
    snapshots: Vec<(&'static str, Arc<Snapshot>)>,
}

impl Inputs {
    pub fn new(snapshots: Vec<(&'static str, Arc<Snapshot>)>) -> Self {
        Self { snapshots }
    }

    /// Table loaded for `name`.
    pub fn table(&self, name: &str) -> Result<&Table> {
        self.snapshots
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| s.table())
            .ok_or_else(|| Error::internal(format!("dataset '{}' was not fetched", name)))
    }

    /// Freshness token of all inputs.
    pub fn token(&self) -> String {
        combined_token(self.snapshots.iter().map(|(_, s)| s.signature()))
    }
}

/// Renders named views over the dataset store.
pub struct Views {
    store: Arc<DatasetStore>,
    cache: RenderCache,
    max_age_secs: u64,
}

impl Views {
    pub fn new(store: Arc<DatasetStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            cache: RenderCache::new(config),
            max_age_secs: config.max_age_secs,
        }
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    /// `Cache-Control: max-age` value for rendered views.
    pub fn max_age_secs(&self) -> u64 {
        self.max_age_secs
    }

    /// Renders a view, or returns the cached body for the same request and
    /// unchanged data.
    ///
    /// Parameters are validated before any dataset is fetched.
    pub fn render(&self, request: &ViewRequest) -> Result<Rendered> {
        let start = Instant::now();
        metrics().view_requests.inc();

        let result = self.render_uncounted(request);

        metrics()
            .view_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        if let Err(e) = &result {
            metrics().view_failures.inc();
            if e.is_client_error() {
                debug!(view = request.view.as_str(), error = %e, "View rejected");
            } else {
                warn!(view = request.view.as_str(), error = %e, "View failed");
            }
        }
        result
    }

    /// Freshness token a render of `request` would carry right now, without
    /// loading any dataset.
    pub fn current_token(&self, request: &ViewRequest) -> Result<String> {
        request.validate()?;
        let signatures = request
            .view
            .datasets()
            .iter()
            .map(|name| self.store.signature(name))
            .collect::<Result<Vec<_>>>()?;
        Ok(combined_token(&signatures))
    }

    /// Drops every cached body.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn render_uncounted(&self, request: &ViewRequest) -> Result<Rendered> {
        request.validate()?;

        let inputs = self.fetch(request.view)?;
        let etag = inputs.token();
        let key = RenderCache::key(&request.key(), &etag);

        if let Some(hit) = self.cache.get(&key) {
            metrics().view_cache_hits.inc();
            debug!(view = request.view.as_str(), etag = %etag, "View cache hit");
            return Ok(hit);
        }

        let body = self.compute(request, &inputs)?;
        let rendered = Rendered {
            body: Arc::from(body),
            etag,
        };
        self.cache.insert(key, rendered.clone());
        Ok(rendered)
    }

    fn fetch(&self, view: ViewName) -> Result<Inputs> {
        let snapshots = view
            .datasets()
            .iter()
            .map(|name| Ok((*name, self.store.get(name)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Inputs { snapshots })
    }

    fn compute(&self, request: &ViewRequest, inputs: &Inputs) -> Result<String> {
        let q = &request.query;
        match request.view {
            ViewName::CustomersByCountry => reports::customers::customers_by_country(inputs),
            ViewName::TopCities => reports::revenue::top_cities(inputs, request),
            ViewName::CitiesByRevenue => reports::revenue::cities_by_revenue(inputs, request),
            ViewName::CountriesByRevenue => reports::revenue::countries_by_revenue(inputs),
            ViewName::OrdersByCountry => reports::revenue::orders_by_country(inputs),
            ViewName::CustomerSegments => reports::customers::customer_segments(inputs, q),
            ViewName::CustomersAgeGender => reports::customers::customers_age_gender(inputs),
            ViewName::SalesMonth => reports::revenue::sales_month(inputs, q),
            ViewName::CountriesByChannel => reports::channels::countries_by_channel(inputs),
            ViewName::ChannelShare => reports::channels::channel_share(inputs),
            ViewName::CountriesByChannelByMonth => {
                reports::channels::countries_by_channel_by_month(inputs)
            }
            ViewName::Returning => reports::rankings::returning(inputs),
            ViewName::TopBrandsByCountry => reports::rankings::top_brands(inputs, request),
            ViewName::TopCategoriesBySeason => reports::rankings::top_categories(inputs, request),
            ViewName::TopProductsBySeason => reports::rankings::top_products(inputs, request),
            ViewName::TopRepurchaseByCountry => {
                reports::rankings::top_repurchase(inputs, request)
            }
            ViewName::Cooccurrence
            | ViewName::Complements
            | ViewName::SemanticSimilarityRecs
            | ViewName::TopSameBrand => reports::tables::records(inputs, request),
            ViewName::BasketCf => reports::tables::basket_cf(inputs, request),
            ViewName::Hybrid => reports::tables::hybrid(inputs, request),
        }
    }
}

/// Serializes a payload into its response body.
pub(crate) fn body<T: Serialize>(payload: &T) -> Result<String> {
    serde_json::to_string(payload)
        .map_err(|e| Error::internal(format!("failed to serialize view: {}", e)))
}
