//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /url`          - List all records
//! - `POST /url`          - Create a short link
//! - `GET  /url/{id}`     - Redirect by internal id
//! - `GET  /favicon.ico`  - 204, never hits the store
//! - `GET  /health`       - Store health check
//! - `GET  /{path}`       - Redirect by token
//!
//! Static segments win over the `{path}` capture, and tokens are hex only, so
//! none of the fixed paths can shadow a token.

use crate::api;
use crate::api::handlers::{favicon_handler, health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// All routes with tracing, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(api::routes::url_routes())
        .route("/favicon.ico", get(favicon_handler))
        .route("/health", get(health_handler))
        .route("/{path}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/url/` lists records.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
