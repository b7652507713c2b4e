//! Bounds and defaults for view parameters and coercion.
//!
//! Limits are inclusive. Views that cap lower than `MAX_LIMIT` declare their
//! own ceiling next to their default.

// === Top-N limits ===

/// Smallest accepted `limit`.
pub const MIN_LIMIT: u32 = 1;

/// Largest accepted `limit` for ranked views.
pub const MAX_LIMIT: u32 = 100;

/// Default N for city rankings.
pub const DEFAULT_CITY_LIMIT: u32 = 10;

/// Default and ceiling for product and repurchase rankings.
/// The source tables carry ten groups per season.
pub const PRODUCT_LIMIT: u32 = 10;

// === Time series ===

/// Default first month of the monthly revenue series.
pub const DEFAULT_START_MONTH: &str = "2024-06";

// === Demographics ===

/// Plausible age range, inclusive.
pub const MIN_AGE: i64 = 0;
pub const MAX_AGE: i64 = 120;

// === Segmentation ===

/// Order count at which a customer becomes `Loyal`.
pub const LOYAL_MIN_ORDERS: usize = 4;

/// Order count range classified as `Repeat`.
pub const REPEAT_MIN_ORDERS: usize = 2;
