//! In-process implementation of the URL repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};

/// Name reported for token collisions, matching the PostgreSQL constraint.
const SHORTENED_CONSTRAINT: &str = "url_shortened_key";

/// Repository backed by sharded concurrent maps.
///
/// Records are keyed by token, with a secondary id → token index. The
/// uniqueness check and the insert happen under one shard lock through the
/// entry API, so concurrent inserts of the same token cannot both succeed.
///
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    by_token: DashMap<String, UrlRecord>,
    id_index: DashMap<Uuid, String>,
}

impl MemoryUrlRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        debug!("Using in-memory URL store");
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    /// Whether no record has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn insert(&self, new_record: &NewUrlRecord) -> Result<Uuid, StoreError> {
        match self.by_token.entry(new_record.shortened.clone()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation {
                constraint: Some(SHORTENED_CONSTRAINT.to_string()),
            }),
            Entry::Vacant(slot) => {
                let id = Uuid::new_v4();
                slot.insert(UrlRecord::new(
                    id,
                    new_record.url.clone(),
                    new_record.shortened.clone(),
                ));
                self.id_index.insert(id, new_record.shortened.clone());
                Ok(id)
            }
        }
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.by_token.get(token).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UrlRecord>, StoreError> {
        let Some(token) = self.id_index.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };

        self.find_by_token(&token).await
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError> {
        Ok(self
            .by_token
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
