//! Shared setup for the end-to-end tests.

pub mod fixtures;
pub mod setup;
