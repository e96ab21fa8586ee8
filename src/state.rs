//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;

/// Handles owned by the process entry point and shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>) -> Self {
        Self { link_service }
    }
}
