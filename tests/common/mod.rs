#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use urlmap::application::services::Registry;
use urlmap::domain::entities::{NewUrlRecord, UrlRecord};
use urlmap::domain::repositories::{StoreError, UrlRepository};
use urlmap::infrastructure::persistence::MemoryUrlRepository;
use urlmap::routes::router;
use urlmap::state::AppState;
use uuid::Uuid;

/// State over a fresh in-memory store.
pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    let repo = Arc::new(MemoryUrlRepository::new());
    let registry = Arc::new(Registry::new(repo.clone()));

    (AppState::new(registry), repo)
}

/// Full application router over a fresh in-memory store.
pub fn create_test_server() -> (TestServer, Arc<MemoryUrlRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    (server, repo)
}

pub async fn insert_url(repo: &MemoryUrlRepository, url: &str, token: &str) -> Uuid {
    repo.insert(&NewUrlRecord {
        url: url.to_string(),
        shortened: token.to_string(),
    })
    .await
    .unwrap()
}

/// Store whose every call fails as unreachable.
pub struct UnavailableRepository;

#[async_trait]
impl UrlRepository for UnavailableRepository {
    async fn insert(&self, _new_record: &NewUrlRecord) -> Result<Uuid, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<UrlRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

pub fn create_unavailable_server() -> TestServer {
    let registry = Arc::new(Registry::new(Arc::new(UnavailableRepository)));
    TestServer::new(router(AppState::new(registry))).unwrap()
}
