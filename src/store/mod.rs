//! Credential and session store adapters.
//!
//! The session manager only sees the two traits defined here. The credential
//! store owns account rows and secret hashes; the session store is a plain
//! key-value slot per account (`put` with TTL, `get`, `delete`) holding the
//! currently valid refresh token. Postgres implementations back the server;
//! in-memory implementations back the tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

pub mod memory;
pub mod postgres;
pub mod secret;

pub use memory::{MemoryCredentialStore, MemorySessionStore};
pub use postgres::{PgCredentialStore, PgSessionStore};

/// Public account view. The secret hash never leaves the store layer
/// except inside [`AccountRecord`] for verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(rename = "createdAt")]
    pub created_at_unix: i64,
}

/// Account plus its secret hash, for credential verification only.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: Account,
    pub secret_hash: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique identifier already taken.
    #[error("identifier already registered")]
    Conflict,
    /// The backing store is unavailable or misbehaving.
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

/// Lookup and persistence of accounts and their secret hashes.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create an account. The store assigns the identifier.
    async fn create(&self, email: &str, secret_hash: &str) -> Result<Account, StoreError>;

    /// Case-sensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, StoreError>;

    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<(), StoreError>;
}

/// One refresh-token slot per account, with per-key expiry.
///
/// `put` overwrites any previous value (last writer wins); `get` must not
/// return expired values; `delete` is idempotent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, account_id: i64, token: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, account_id: i64) -> Result<Option<String>, StoreError>;

    async fn delete(&self, account_id: i64) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_serializes_with_camel_case_created_at() {
        let account = Account {
            id: 7,
            email: "alice@example.com".to_string(),
            created_at_unix: 1_700_000_000,
        };
        let value = serde_json::to_value(&account).expect("serialize account");
        assert_eq!(value["id"], 7);
        assert_eq!(value["email"], "alice@example.com");
        assert_eq!(value["createdAt"], 1_700_000_000_i64);
        assert!(value.get("secret_hash").is_none());
    }
}
