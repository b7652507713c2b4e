//! Named aggregation pipelines.
//!
//! Every pipeline is a pure function over rows the views have already passed
//! through the schema guard and the normalization layer. Output is flat and
//! already ordered; [`crate::assemble`] nests it for the response.

pub mod buckets;
pub mod channels;
pub mod demographics;
pub mod money;
pub mod orders;
pub mod ranking;
pub mod records;
pub mod revenue;
pub mod rollup;
pub mod segments;
pub mod timeseries;

pub use money::{average_order_value, share_pct, to_ksek};
