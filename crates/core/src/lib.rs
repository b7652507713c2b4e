//! Core types and pure transforms for the dashboard analytics service.
//!
//! Nothing in this crate performs I/O. Tables come in from the dataset store,
//! go through the schema guard and normalization, are reduced by a pipeline
//! and leave as ordered, serializable structures.

pub mod assemble;
pub mod calendar;
pub mod error;
pub mod limits;
pub mod normalize;
pub mod params;
pub mod pipelines;
pub mod schema;
pub mod table;

pub use assemble::{group_by, group_records, GroupOrder, OrderedMap};
pub use calendar::YearMonth;
pub use error::{Error, ErrorCode, Result};
pub use params::{GroupFilter, ViewQuery};
pub use schema::{require, FieldSource, Frame, Record};
pub use table::Table;
