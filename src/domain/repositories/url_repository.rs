//! Repository trait for URL record storage.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{NewUrlRecord, UrlRecord};

/// Failure kinds reported by a store.
///
/// A missing row is not an error: lookups return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the insert (token collision).
    #[error("Unique constraint violation")]
    UniqueViolation { constraint: Option<String> },

    /// The store could not be reached or no connection was available.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

/// Repository interface for URL records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a record and returns its store-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UniqueViolation`] if `shortened` is already taken.
    async fn insert(&self, new_record: &NewUrlRecord) -> Result<Uuid, StoreError>;

    /// Finds a record by its token.
    async fn find_by_token(&self, token: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Finds a record by its internal id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UrlRecord>, StoreError>;

    /// Returns every record in store-defined order.
    async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError>;

    /// Checks that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
