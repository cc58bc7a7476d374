//! URL record entity: the stored association between an id, a destination and a token.

use uuid::Uuid;

/// A persisted short link.
///
/// All three fields are fixed at creation; records are never edited.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UrlRecord {
    /// Store-assigned primary key. Never used as the public token.
    pub id: Uuid,
    /// Destination the token redirects to, exactly as submitted.
    pub url: String,
    /// Routable token, unique across all records.
    pub shortened: String,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(id: Uuid, url: String, shortened: String) -> Self {
        Self { id, url, shortened }
    }
}

/// Input data for inserting a record. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub url: String,
    pub shortened: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_record_creation() {
        let id = Uuid::now_v7();
        let record = UrlRecord::new(
            id,
            "https://example.com".to_string(),
            "0123456789ab".to_string(),
        );

        assert_eq!(record.id, id);
        assert_eq!(record.url, "https://example.com");
        assert_eq!(record.shortened, "0123456789ab");
    }
}
