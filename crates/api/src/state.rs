//! Application state shared across handlers.

use std::sync::Arc;

use views::Views;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// View engine over the dataset store
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(views: Arc<Views>) -> Self {
        Self { views }
    }
}
