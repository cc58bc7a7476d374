//! Handlers for the `/url` resource.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::url::{CreateUrlRequest, UrlResponse};
use crate::api::handlers::redirect::found;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every stored record.
///
/// # Endpoint
///
/// `GET /url`
///
/// # Response
///
/// ```json
/// [
///   { "id": "0190d3c2-...", "url": "https://example.com", "shortened": "3f2a9c01b7de" }
/// ]
/// ```
///
/// Order is whatever the store yields. Not paginated.
pub async fn list_urls_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<UrlResponse>>, AppError> {
    let records = state.registry.list_all().await?;

    Ok(Json(records.into_iter().map(UrlResponse::from).collect()))
}

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed body, a missing `url` or an empty one.
/// Returns 500 if token generation or the store fails.
pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let record = state.registry.create(payload.url).await?;

    Ok((StatusCode::CREATED, Json(UrlResponse::from(record))).into_response())
}

/// Redirects to the destination of the record with the given internal id.
///
/// # Endpoint
///
/// `GET /url/{id}`
///
/// # Errors
///
/// Returns 400 if the id is blank or not valid UTF-8, and 404 if no record has it.
pub async fn get_url_by_id_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let record = state.registry.get_by_id(&id).await?;

    found(&record.url)
}
