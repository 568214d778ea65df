//! In-memory store implementations.
//!
//! Used by tests and useful for local development without Postgres. Session
//! expiry uses monotonic deadlines; expired entries are swept on access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{Account, AccountRecord, CredentialStore, SessionStore, StoreError};
use crate::token::unix_now;

#[derive(Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<Vec<AccountRecord>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(&self, email: &str, secret_hash: &str) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        if accounts.iter().any(|record| record.account.email == email) {
            return Err(StoreError::Conflict);
        }
        let account = Account {
            id: i64::try_from(accounts.len()).unwrap_or(i64::MAX) + 1,
            email: email.to_string(),
            created_at_unix: unix_now(),
        };
        accounts.push(AccountRecord {
            account: account.clone(),
            secret_hash: secret_hash.to_string(),
        });
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .iter()
            .find(|record| record.account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .iter()
            .find(|record| record.account.id == id)
            .cloned())
    }

    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().await;
        if let Some(record) = accounts.iter_mut().find(|record| record.account.id == id) {
            record.secret_hash = secret_hash.to_string();
        }
        Ok(())
    }
}

struct SessionSlot {
    token: String,
    deadline: Instant,
}

#[derive(Default)]
pub struct MemorySessionStore {
    slots: Mutex<HashMap<i64, SessionSlot>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, account_id: i64, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().await;
        slots.retain(|_, slot| slot.deadline > Instant::now());
        slots.insert(
            account_id,
            SessionSlot {
                token: token.to_string(),
                deadline: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, account_id: i64) -> Result<Option<String>, StoreError> {
        let slots = self.slots.lock().await;
        Ok(slots
            .get(&account_id)
            .filter(|slot| slot.deadline > Instant::now())
            .map(|slot| slot.token.clone()))
    }

    async fn delete(&self, account_id: i64) -> Result<(), StoreError> {
        let mut slots = self.slots.lock().await;
        slots.remove(&account_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn credential_store_enforces_unique_email() -> Result<(), StoreError> {
        let store = MemoryCredentialStore::new();
        let account = store.create("alice@example.com", "hash-1").await?;
        assert_eq!(account.id, 1);

        let duplicate = store.create("alice@example.com", "hash-2").await;
        assert!(matches!(duplicate, Err(StoreError::Conflict)));

        // Case-sensitive: a different casing is a different identifier.
        let other = store.create("Alice@example.com", "hash-3").await?;
        assert_ne!(other.id, account.id);
        Ok(())
    }

    #[tokio::test]
    async fn session_store_overwrites_and_deletes() -> Result<(), StoreError> {
        let store = MemorySessionStore::new();
        let ttl = Duration::from_secs(60);

        store.put(1, "token-a", ttl).await?;
        assert_eq!(store.get(1).await?.as_deref(), Some("token-a"));

        store.put(1, "token-b", ttl).await?;
        assert_eq!(store.get(1).await?.as_deref(), Some("token-b"));

        store.delete(1).await?;
        assert_eq!(store.get(1).await?, None);

        // Deleting an absent key is a no-op, not an error.
        store.delete(1).await?;
        Ok(())
    }

    #[tokio::test]
    async fn session_store_expires_entries() -> Result<(), StoreError> {
        let store = MemorySessionStore::new();
        store.put(1, "short-lived", Duration::from_millis(10)).await?;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get(1).await?, None);
        Ok(())
    }
}
