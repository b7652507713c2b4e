//! The catalog of named views and request validation.

use analytics_core::limits::{DEFAULT_CITY_LIMIT, MAX_LIMIT, PRODUCT_LIMIT};
use analytics_core::normalize::{market_by_id, Market};
use analytics_core::{Error, Result, ViewQuery};

/// Every view the dashboard can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    CustomersByCountry,
    TopCities,
    CitiesByRevenue,
    CountriesByRevenue,
    OrdersByCountry,
    CustomerSegments,
    CustomersAgeGender,
    SalesMonth,
    CountriesByChannel,
    ChannelShare,
    CountriesByChannelByMonth,
    Returning,
    TopBrandsByCountry,
    TopCategoriesBySeason,
    TopProductsBySeason,
    TopRepurchaseByCountry,
    Cooccurrence,
    Complements,
    BasketCf,
    SemanticSimilarityRecs,
    TopSameBrand,
    Hybrid,
}

impl ViewName {
    pub const ALL: [ViewName; 22] = [
        Self::CustomersByCountry,
        Self::TopCities,
        Self::CitiesByRevenue,
        Self::CountriesByRevenue,
        Self::OrdersByCountry,
        Self::CustomerSegments,
        Self::CustomersAgeGender,
        Self::SalesMonth,
        Self::CountriesByChannel,
        Self::ChannelShare,
        Self::CountriesByChannelByMonth,
        Self::Returning,
        Self::TopBrandsByCountry,
        Self::TopCategoriesBySeason,
        Self::TopProductsBySeason,
        Self::TopRepurchaseByCountry,
        Self::Cooccurrence,
        Self::Complements,
        Self::BasketCf,
        Self::SemanticSimilarityRecs,
        Self::TopSameBrand,
        Self::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomersByCountry => "customers_by_country",
            Self::TopCities => "top_cities",
            Self::CitiesByRevenue => "cities_by_revenue",
            Self::CountriesByRevenue => "countries_by_revenue",
            Self::OrdersByCountry => "orders_by_country",
            Self::CustomerSegments => "customer_segments",
            Self::CustomersAgeGender => "customers_age_gender",
            Self::SalesMonth => "sales_month",
            Self::CountriesByChannel => "countries_by_channel",
            Self::ChannelShare => "channel_share",
            Self::CountriesByChannelByMonth => "countries_by_channel_by_month",
            Self::Returning => "returning",
            Self::TopBrandsByCountry => "top_brands_by_country",
            Self::TopCategoriesBySeason => "top_categories_by_season",
            Self::TopProductsBySeason => "top_products_by_season",
            Self::TopRepurchaseByCountry => "top_repurchase_by_country",
            Self::Cooccurrence => "cooccurrence",
            Self::Complements => "complements",
            Self::BasketCf => "basket_cf",
            Self::SemanticSimilarityRecs => "semantic_similarity_recs",
            Self::TopSameBrand => "top_same_brand",
            Self::Hybrid => "hybrid",
        }
    }

    /// Datasets the view reads, in the order their tokens are joined.
    pub fn datasets(&self) -> &'static [&'static str] {
        match self {
            Self::CustomersByCountry => &["customers"],
            Self::TopCities | Self::CitiesByRevenue => &["city_summary"],
            Self::CountriesByRevenue => &["country_summary"],
            Self::OrdersByCountry | Self::ChannelShare => &["transactions"],
            Self::CustomerSegments => &["customers", "transactions"],
            Self::CustomersAgeGender => &["customer_summary"],
            Self::SalesMonth => &["city_monthly_revenue"],
            Self::CountriesByChannel => &["countries_by_channel"],
            Self::CountriesByChannelByMonth => &["countries_by_channel_by_month"],
            Self::Returning => &["return_buckets"],
            Self::TopBrandsByCountry => &["top_brands"],
            Self::TopCategoriesBySeason => &["top_categories"],
            Self::TopProductsBySeason => &["top_groups"],
            Self::TopRepurchaseByCountry => &["top_repurchase"],
            Self::Cooccurrence => &["cooccurring_groups"],
            Self::Complements => &["complements"],
            Self::BasketCf => &["basket_cf"],
            Self::SemanticSimilarityRecs => &["semantic_similarity_recs"],
            Self::TopSameBrand => &["top_same_brand"],
            Self::Hybrid => &["hybrid"],
        }
    }

    /// Default and ceiling of `limit`, for views that take one.
    pub fn limit_bounds(&self) -> Option<(Option<u32>, u32)> {
        match self {
            Self::TopCities | Self::CitiesByRevenue => Some((Some(DEFAULT_CITY_LIMIT), MAX_LIMIT)),
            Self::TopBrandsByCountry | Self::TopCategoriesBySeason | Self::Cooccurrence => {
                Some((None, MAX_LIMIT))
            }
            Self::TopProductsBySeason | Self::TopRepurchaseByCountry => {
                Some((Some(PRODUCT_LIMIT), PRODUCT_LIMIT))
            }
            _ => None,
        }
    }
}

/// A view plus everything the caller supplied for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub view: ViewName,
    pub query: ViewQuery,
    /// Path segment of the top-cities route.
    pub country_id: Option<String>,
}

impl ViewRequest {
    pub fn new(view: ViewName) -> Self {
        Self {
            view,
            query: ViewQuery::default(),
            country_id: None,
        }
    }

    pub fn with_query(mut self, query: ViewQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_country_id(mut self, id: impl Into<String>) -> Self {
        self.country_id = Some(id.into());
        self
    }

    /// Effective limit of this request.
    pub fn limit(&self) -> Result<Option<usize>> {
        match self.view.limit_bounds() {
            Some((default, max)) => self.query.limit_or(default, max),
            None => {
                self.query.check()?;
                Ok(None)
            }
        }
    }

    /// Market named by the path segment of the top-cities route.
    pub fn market(&self) -> Result<&'static Market> {
        let id = self.country_id.as_deref().map(str::trim).unwrap_or_default();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_parameter(format!(
                "country id must be numeric, got '{}'",
                id
            )));
        }
        market_by_id(id).ok_or_else(|| Error::not_found(format!("unknown country id {}", id)))
    }

    /// Checks everything that can be checked without touching a dataset.
    pub fn validate(&self) -> Result<()> {
        self.limit()?;
        match self.view {
            ViewName::TopCities => {
                self.market()?;
            }
            ViewName::SalesMonth => {
                self.query.start_month()?;
            }
            ViewName::TopProductsBySeason if self.query.country_filter().is_none() => {
                return Err(Error::invalid_parameter("country is required"));
            }
            _ => {}
        }
        Ok(())
    }

    /// Cache key without the freshness token.
    pub fn key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.view.as_str(),
            self.country_id.as_deref().map(str::trim).unwrap_or_default(),
            self.query.cache_key()
        )
    }
}
