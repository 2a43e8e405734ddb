//! Shared application state.

use std::sync::Arc;

use carbot_prompts::PromptStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The prompt store backing every page.
    pub store: Arc<PromptStore>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(store: Arc<PromptStore>) -> Self {
        Self { store }
    }
}
