//! Shared application state.

use std::sync::Arc;

use crate::service::AnalysisService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The analysis service behind every route.
    pub service: Arc<AnalysisService>,
}

impl AppState {
    /// Wrap a service for sharing across handlers.
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
