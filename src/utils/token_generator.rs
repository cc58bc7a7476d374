//! Short token generation.
//!
//! A token is the hex digest of a freshly minted UUIDv7, cut to a fixed length.
//! The generator is stateless and never touches the store, so uniqueness is left
//! to the store's constraint and the retry loop in
//! [`Registry::create`](crate::application::services::Registry::create).

use crate::error::AppError;
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::{Builder, Uuid};

/// Number of hex characters in every token.
pub const TOKEN_LENGTH: usize = 12;

/// Random bytes mixed into the UUIDv7 after its timestamp.
const UUID_RANDOM_BYTES: usize = 10;

/// Generates a new short token.
///
/// # Algorithm
///
/// 1. Fill 10 bytes from the OS random source
/// 2. Build a UUIDv7 from the current Unix time (ms) and those bytes
/// 3. SHA-256 the canonical hyphenated UUID string
/// 4. Keep the first [`TOKEN_LENGTH`] hex characters
///
/// # Errors
///
/// Returns [`AppError::Generation`] if the OS random source fails.
///
/// # Examples
///
/// ```ignore
/// let token = generate_token()?;
/// assert_eq!(token.len(), 12);
/// assert!(is_valid_token(&token));
/// ```
pub fn generate_token() -> Result<String, AppError> {
    let id = new_uuid_v7()?;
    Ok(token_from_uuid(&id))
}

fn new_uuid_v7() -> Result<Uuid, AppError> {
    let mut random = [0u8; UUID_RANDOM_BYTES];

    getrandom::fill(&mut random).map_err(|e| {
        AppError::generation(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    // Pre-epoch clocks clamp to 0.
    let millis = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);

    Ok(Builder::from_unix_timestamp_millis(millis, &random).into_uuid())
}

/// Derives the token for a given UUID.
fn token_from_uuid(id: &Uuid) -> String {
    let digest = Sha256::digest(id.hyphenated().to_string().as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(TOKEN_LENGTH);
    hex
}

/// Returns true if `token` has the shape of a generated token.
pub fn is_valid_token(token: &str) -> bool {
    token.len() == TOKEN_LENGTH
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
