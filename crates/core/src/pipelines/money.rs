//! The one rounding rule per figure.
//!
//! Every view that reports kSEK, an average order value or a percentage goes
//! through these functions, so a figure is never rounded two different ways.

/// Converts a currency total to thousands, rounding half up.
///
/// Equivalent to `(total + 500) // 1000` on integers: 1499 → 1, 1500 → 2,
/// -1500 → -1.
pub fn to_ksek(total: f64) -> i64 {
    ((total + 500.0) / 1000.0).floor() as i64
}

/// Average order value rounded half up, or `None` when there are no orders.
pub fn average_order_value(revenue: f64, orders: u64) -> Option<i64> {
    if orders == 0 {
        return None;
    }
    Some((revenue / orders as f64 + 0.5).floor() as i64)
}

/// `count / total * 100` rounded half up to one decimal; 0.0 when the
/// total is zero.
pub fn share_pct(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Tenths of a percent, rounded half up in integer arithmetic.
    let tenths = (count * 2000 + total) / (2 * total);
    tenths as f64 / 10.0
}
