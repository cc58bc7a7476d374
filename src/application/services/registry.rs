//! URL record creation and lookup service.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::error::AppError;
use crate::utils::token_generator::generate_token;

/// Default number of tokens tried before `create` gives up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Default deadline for a single store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns persistence and lookup of URL records.
///
/// Built once at startup and shared through [`crate::state::AppState`].
/// Token uniqueness is enforced by the store; the registry only reacts to
/// the store's verdict by retrying with a fresh token.
pub struct Registry {
    repository: Arc<dyn UrlRepository>,
    max_attempts: usize,
    store_timeout: Duration,
}

impl Registry {
    /// Creates a registry with default retry and timeout settings.
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self {
            repository,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Sets how many tokens `create` tries on collisions. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the deadline applied to every store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Creates a record for `url` under a freshly generated token.
    ///
    /// # Collisions
    ///
    /// A uniqueness violation from the store triggers a retry with a new token,
    /// up to `max_attempts` tokens in total.
    ///
    /// # Confirmation read
    ///
    /// After the insert, the record is read back by token so store-side values are
    /// reflected. If that read fails, the in-memory values are returned instead;
    /// the insert already succeeded.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidInput`] if `url` is empty or whitespace
    /// - [`AppError::Generation`] if the random source fails
    /// - [`AppError::Storage`] on store failure or when every attempt collided
    /// - [`AppError::Timeout`] if the insert exceeds the store deadline
    pub async fn create(&self, url: String) -> Result<UrlRecord, AppError> {
        if url.trim().is_empty() {
            return Err(AppError::bad_request(
                "The 'url' field must not be empty",
                json!({ "field": "url" }),
            ));
        }

        for attempt in 1..=self.max_attempts {
            let new_record = NewUrlRecord {
                url: url.clone(),
                shortened: generate_token()?,
            };

            let outcome = self
                .with_deadline("insert", self.repository.insert(&new_record))
                .await?;

            match outcome {
                Ok(id) => {
                    metrics::counter!("urlmap_records_created_total").increment(1);
                    info!(%id, token = %new_record.shortened, attempt, "Short link created");
                    return Ok(self.confirm(id, new_record).await);
                }
                Err(StoreError::UniqueViolation { constraint }) => {
                    metrics::counter!("urlmap_token_collisions_total").increment(1);
                    warn!(
                        token = %new_record.shortened,
                        attempt,
                        ?constraint,
                        "Token collision, retrying with a new token"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::storage(
            "Failed to allocate a unique token",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Retrieves a record by its token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for an empty token and
    /// [`AppError::NotFound`] if no record carries it.
    pub async fn get_by_token(&self, token: &str) -> Result<UrlRecord, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::bad_request("Path missing", json!({})));
        }

        self.with_deadline("find_by_token", self.repository.find_by_token(token))
            .await??
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "token": token })))
    }

    /// Retrieves a record by its internal id.
    ///
    /// A string that is not a UUID cannot name any record and yields `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidInput`] for an empty id and
    /// [`AppError::NotFound`] if no record has it.
    pub async fn get_by_id(&self, id: &str) -> Result<UrlRecord, AppError> {
        if id.trim().is_empty() {
            return Err(AppError::bad_request("ID missing", json!({})));
        }

        let Ok(uuid) = Uuid::parse_str(id) else {
            debug!(id, "Lookup with a malformed id");
            return Err(AppError::not_found("Record not found", json!({ "id": id })));
        };

        self.with_deadline("find_by_id", self.repository.find_by_id(uuid))
            .await??
            .ok_or_else(|| AppError::not_found("Record not found", json!({ "id": id })))
    }

    /// Returns every record, in whatever order the store yields them.
    pub async fn list_all(&self) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self
            .with_deadline("list_all", self.repository.list_all())
            .await??)
    }

    /// Checks that the store answers within the deadline.
    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.with_deadline("ping", self.repository.ping()).await??)
    }

    /// Reads back a freshly inserted record, falling back to what was inserted.
    async fn confirm(&self, id: Uuid, new_record: NewUrlRecord) -> UrlRecord {
        let reread = self
            .with_deadline(
                "find_by_token",
                self.repository.find_by_token(&new_record.shortened),
            )
            .await;

        match reread {
            Ok(Ok(Some(record))) => return record,
            Ok(Ok(None)) => {
                warn!(%id, token = %new_record.shortened, "Inserted record not visible on re-read");
            }
            Ok(Err(e)) => {
                warn!(%id, token = %new_record.shortened, error = %e, "Re-read after insert failed");
            }
            Err(e) => {
                warn!(%id, token = %new_record.shortened, error = %e, "Re-read after insert timed out");
            }
        }

        UrlRecord::new(id, new_record.url, new_record.shortened)
    }

    /// Runs a store call under the configured deadline.
    ///
    /// The outer error is the timeout; the inner result is the store's own answer,
    /// left unconverted so callers can react to specific [`StoreError`] kinds.
    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<Result<T, StoreError>, AppError> {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| {
                AppError::timeout(
                    "Store call timed out",
                    json!({
                        "operation": operation,
                        "timeout_ms": self.store_timeout.as_millis() as u64,
                    }),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::utils::token_generator::{TOKEN_LENGTH, is_valid_token};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(id: Uuid, url: &str, token: &str) -> UrlRecord {
        UrlRecord::new(id, url.to_string(), token.to_string())
    }

    fn registry(mock: MockUrlRepository) -> Registry {
        Registry::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn test_create_success_returns_reread_record() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();

        mock.expect_insert()
            .withf(|new_record| {
                new_record.url == "https://example.com" && is_valid_token(&new_record.shortened)
            })
            .times(1)
            .returning(move |_| Ok(id));

        mock.expect_find_by_token()
            .times(1)
            .returning(move |token| Ok(Some(record(id, "https://example.com", token))));

        let result = registry(mock)
            .create("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(result.id, id);
        assert_eq!(result.url, "https://example.com");
        assert_eq!(result.shortened.len(), TOKEN_LENGTH);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_url() {
        let mut mock = MockUrlRepository::new();
        mock.expect_insert().times(0);

        let result = registry(mock).create("   ".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_create_keeps_non_url_text() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();

        mock.expect_insert()
            .withf(|new_record| new_record.url == "not a url")
            .times(1)
            .returning(move |_| Ok(id));
        mock.expect_find_by_token()
            .returning(move |token| Ok(Some(record(id, "not a url", token))));

        let result = registry(mock).create("not a url".to_string()).await.unwrap();

        assert_eq!(result.url, "not a url");
    }

    #[tokio::test]
    async fn test_create_retries_on_collision() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        mock.expect_insert().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(StoreError::UniqueViolation {
                    constraint: Some("url_shortened_key".to_string()),
                })
            } else {
                Ok(id)
            }
        });
        mock.expect_find_by_token()
            .times(1)
            .returning(move |token| Ok(Some(record(id, "https://example.com", token))));

        let result = registry(mock).create("https://example.com".to_string()).await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_gives_up_after_max_attempts() {
        let mut mock = MockUrlRepository::new();

        mock.expect_insert().times(3).returning(|_| {
            Err(StoreError::UniqueViolation {
                constraint: Some("url_shortened_key".to_string()),
            })
        });
        mock.expect_find_by_token().times(0);

        let result = registry(mock).create("https://example.com".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_create_respects_configured_attempts() {
        let mut mock = MockUrlRepository::new();

        mock.expect_insert().times(5).returning(|_| {
            Err(StoreError::UniqueViolation { constraint: None })
        });

        let result = registry(mock)
            .with_max_attempts(5)
            .create("https://example.com".to_string())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_create_does_not_retry_other_store_errors() {
        let mut mock = MockUrlRepository::new();

        mock.expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("pool timed out".to_string())));

        let result = registry(mock).create("https://example.com".to_string()).await;

        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_create_falls_back_when_reread_fails() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();

        mock.expect_insert().times(1).returning(move |_| Ok(id));
        mock.expect_find_by_token()
            .times(1)
            .returning(|_| Err(StoreError::Backend("connection reset".to_string())));

        let result = registry(mock)
            .create("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(result.id, id);
        assert_eq!(result.url, "https://example.com");
        assert!(is_valid_token(&result.shortened));
    }

    #[tokio::test]
    async fn test_create_falls_back_when_reread_finds_nothing() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();

        mock.expect_insert().times(1).returning(move |_| Ok(id));
        mock.expect_find_by_token().times(1).returning(|_| Ok(None));

        let result = registry(mock)
            .create("https://example.com".to_string())
            .await
            .unwrap();

        assert_eq!(result.id, id);
    }

    #[tokio::test]
    async fn test_get_by_token_found() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();

        mock.expect_find_by_token()
            .withf(|token| token == "0123456789ab")
            .times(1)
            .returning(move |token| Ok(Some(record(id, "https://example.com", token))));

        let result = registry(mock).get_by_token("0123456789ab").await.unwrap();

        assert_eq!(result.url, "https://example.com");
    }

    #[tokio::test]
    async fn test_get_by_token_not_found() {
        let mut mock = MockUrlRepository::new();
        mock.expect_find_by_token().times(1).returning(|_| Ok(None));

        let result = registry(mock).get_by_token("doesnotexist").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_token_store_error_is_storage() {
        let mut mock = MockUrlRepository::new();
        mock.expect_find_by_token()
            .times(1)
            .returning(|_| Err(StoreError::Backend("boom".to_string())));

        let result = registry(mock).get_by_token("0123456789ab").await;

        assert!(matches!(result.unwrap_err(), AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_get_by_token_empty_is_invalid() {
        let mut mock = MockUrlRepository::new();
        mock.expect_find_by_token().times(0);

        let result = registry(mock).get_by_token("").await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let mut mock = MockUrlRepository::new();
        let id = Uuid::now_v7();

        mock.expect_find_by_id()
            .withf(move |candidate| *candidate == id)
            .times(1)
            .returning(move |id| Ok(Some(record(id, "https://example.com", "0123456789ab"))));

        let result = registry(mock).get_by_id(&id.to_string()).await.unwrap();

        assert_eq!(result.id, id);
    }

    #[tokio::test]
    async fn test_get_by_id_malformed_is_not_found() {
        let mut mock = MockUrlRepository::new();
        mock.expect_find_by_id().times(0);

        let result = registry(mock).get_by_id("not-a-uuid").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_empty_is_invalid() {
        let mock = MockUrlRepository::new();

        let result = registry(mock).get_by_id(" ").await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_list_all() {
        let mut mock = MockUrlRepository::new();
        mock.expect_list_all().times(1).returning(|| {
            Ok(vec![
                record(Uuid::now_v7(), "https://a.example", "aaaaaaaaaaaa"),
                record(Uuid::now_v7(), "https://b.example", "bbbbbbbbbbbb"),
            ])
        });

        let records = registry(mock).list_all().await.unwrap();

        assert_eq!(records.len(), 2);
    }

    struct SlowRepository;

    #[async_trait]
    impl UrlRepository for SlowRepository {
        async fn insert(&self, _new_record: &NewUrlRecord) -> Result<Uuid, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Uuid::now_v7())
        }

        async fn find_by_token(&self, _token: &str) -> Result<Option<UrlRecord>, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<UrlRecord>, StoreError> {
            Ok(None)
        }

        async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let registry =
            Registry::new(Arc::new(SlowRepository)).with_store_timeout(Duration::from_millis(20));

        let create = registry.create("https://example.com".to_string()).await;
        assert!(matches!(create.unwrap_err(), AppError::Timeout { .. }));

        let lookup = registry.get_by_token("0123456789ab").await;
        assert!(matches!(lookup.unwrap_err(), AppError::Timeout { .. }));
    }
}
