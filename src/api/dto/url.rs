//! DTOs for URL record endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request to create a short link.
///
/// The destination is stored verbatim; only an empty value is rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,
}

/// A stored record as returned to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlResponse {
    pub id: Uuid,
    pub url: String,
    pub shortened: String,
}

impl From<UrlRecord> for UrlResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            id: record.id,
            url: record.url,
            shortened: record.shortened,
        }
    }
}
