//! Shared application state.

use crate::core::ScrubService;

/// State shared by all route handlers
pub struct AppState {
    pub service: ScrubService,
}

impl AppState {
    pub fn new(service: ScrubService) -> Self {
        Self { service }
    }
}
