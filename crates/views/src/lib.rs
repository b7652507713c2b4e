//! Named dashboard views.
//!
//! [`Views::render`] is the narrow interface the routing layer uses: it
//! validates parameters, fetches the datasets a view reads, and returns the
//! rendered JSON body with the freshness token of those datasets.

pub mod cache;
pub mod engine;
pub mod reports;
pub mod view;

pub use cache::{CacheConfig, RenderCache, Rendered};
pub use engine::{Inputs, Views};
pub use view::{ViewName, ViewRequest};
