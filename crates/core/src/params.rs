//! Request parameters accepted by views.
//!
//! All checks here run before any dataset is touched, so a malformed request
//! never triggers a reload.

use serde::Deserialize;
use validator::Validate;

use crate::calendar::YearMonth;
use crate::error::{Error, Result};
use crate::limits::{DEFAULT_START_MONTH, MAX_LIMIT, MIN_LIMIT};

/// Raw query parameters as they arrive from the routing layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Validate)]
pub struct ViewQuery {
    /// Country filter, case-insensitive exact match.
    pub country: Option<String>,
    /// Season filter, case-insensitive exact match.
    #[serde(alias = "season")]
    pub season_label: Option<String>,
    /// Top N per group.
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
    /// Rows to skip in paginated pass-through views.
    pub offset: Option<u32>,
    /// First month of a time series, `YYYY-MM`.
    pub start_month: Option<String>,
    /// Keep score columns in the hybrid recommendations table.
    #[serde(default)]
    pub include_scores: bool,
}

impl ViewQuery {
    /// Runs the derive validations and maps failures to `InvalidParameter`.
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(|e| {
            Error::invalid_parameter(format!(
                "{} (limit must be between {} and {})",
                e, MIN_LIMIT, MAX_LIMIT
            ))
        })
    }

    pub fn country_filter(&self) -> Option<GroupFilter> {
        GroupFilter::new(self.country.as_deref())
    }

    pub fn season_filter(&self) -> Option<GroupFilter> {
        GroupFilter::new(self.season_label.as_deref())
    }

    /// Effective limit: the requested one, else `default`, bounded by `max`.
    pub fn limit_or(&self, default: Option<u32>, max: u32) -> Result<Option<usize>> {
        self.check()?;
        match self.limit.or(default) {
            Some(n) if n > max => Err(Error::invalid_parameter(format!(
                "limit must be between {} and {}",
                MIN_LIMIT, max
            ))),
            Some(n) => Ok(Some(n as usize)),
            None => Ok(None),
        }
    }

    /// Parsed `start_month`, defaulting when absent.
    pub fn start_month(&self) -> Result<YearMonth> {
        match self.start_month.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => YearMonth::parse_param(raw),
            _ => YearMonth::parse_param(DEFAULT_START_MONTH),
        }
    }

    /// Stable textual form used as part of cache keys.
    pub fn cache_key(&self) -> String {
        format!(
            "country={}&season={}&limit={}&offset={}&start={}&scores={}",
            self.country_filter().map(|f| f.key()).unwrap_or_default(),
            self.season_filter().map(|f| f.key()).unwrap_or_default(),
            self.limit.map(|n| n.to_string()).unwrap_or_default(),
            self.offset.map(|n| n.to_string()).unwrap_or_default(),
            self.start_month.as_deref().map(str::trim).unwrap_or_default(),
            self.include_scores,
        )
    }
}

/// Case-insensitive exact-match filter on a group value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFilter {
    display: String,
    folded: String,
}

impl GroupFilter {
    /// Builds a filter; blank input means no filter.
    pub fn new(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            display: trimmed.to_string(),
            folded: trimmed.to_lowercase(),
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        value.trim().to_lowercase() == self.folded
    }

    /// The filter as the caller wrote it, trimmed.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    fn key(&self) -> String {
        self.display.clone()
    }
}
