//! HTTP routing layer for the dashboard analytics views.
//!
//! Handlers only translate between HTTP and [`views::Views`]: query
//! extraction, conditional requests and error mapping live here, everything
//! else lives behind the view engine.

pub mod extractors;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
