//! Handler for short token redirects.

use axum::{
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Resolves a token and redirects to its destination.
///
/// # Endpoint
///
/// `GET /{path}`
///
/// # Errors
///
/// Returns 400 Bad Request if the path is blank or not valid UTF-8.
/// Returns 404 Not Found if no record has the token.
pub async fn redirect_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(path) = path?;
    let record = state.registry.get_by_token(&path).await?;

    debug!(token = %record.shortened, "Redirecting");

    found(&record.url)
}

/// Answers browser favicon probes without touching the store.
///
/// `GET /favicon.ico` → 204 No Content
pub async fn favicon_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Builds a `302 Found` response pointing at `location`.
///
/// Destinations are stored unvalidated, so one that cannot be a header value
/// (control characters, for instance) is reported as a server error.
pub(crate) fn found(location: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_bytes(location.as_bytes()).map_err(|e| {
        AppError::storage(
            "Stored destination is not a valid Location header",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
