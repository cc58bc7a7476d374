//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::Registry;

/// Application state cloned into each request.
///
/// Holds the single [`Registry`] built at startup; cloning only bumps the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}
