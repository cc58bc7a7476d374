//! API route configuration.

use crate::api::handlers::{create_url_handler, get_url_by_id_handler, list_urls_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Routes of the `/url` resource.
///
/// # Endpoints
///
/// - `GET  /url`        - List all records
/// - `POST /url`        - Create a record
/// - `GET  /url/{id}`   - Redirect by internal id
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/url", get(list_urls_handler).post(create_url_handler))
        .route("/url/{id}", get(get_url_by_id_handler))
}
