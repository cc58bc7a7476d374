//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};

/// PostgreSQL repository for URL records.
///
/// Relies on the `url_shortened_key` unique constraint for token uniqueness and
/// on the column default `gen_random_uuid()` for ids.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Classifies a SQLx error by kind rather than by message text.
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation {
            constraint: db.constraint().map(str::to_string),
        },
        unavailable @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)) => {
            StoreError::Unavailable(unavailable.to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn insert(&self, new_record: &NewUrlRecord) -> Result<Uuid, StoreError> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO url (url, shortened) VALUES ($1, $2) RETURNING id",
        )
        .bind(&new_record.url)
        .bind(&new_record.shortened)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UrlRecord>, StoreError> {
        sqlx::query_as::<_, UrlRecord>("SELECT id, url, shortened FROM url WHERE shortened = $1")
            .bind(token)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UrlRecord>, StoreError> {
        sqlx::query_as::<_, UrlRecord>("SELECT id, url, shortened FROM url WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError> {
        sqlx::query_as::<_, UrlRecord>("SELECT id, url, shortened FROM url")
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }
}
