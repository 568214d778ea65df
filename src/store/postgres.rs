//! Postgres-backed credential and session stores.
//!
//! Queries run at the database's clock: session expiry is enforced in SQL, so
//! a stale row is indistinguishable from a deleted one. The session slot is a
//! single row per account, overwritten with `ON CONFLICT` (last writer wins).

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::Instrument;

use super::{Account, AccountRecord, CredentialStore, SessionStore, StoreError};

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> Account {
    Account {
        id: row.get("id"),
        email: row.get("email"),
        created_at_unix: row.get("created_at_unix"),
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(&self, email: &str, secret_hash: &str) -> Result<Account, StoreError> {
        let query = r"
            INSERT INTO users (email, secret_hash)
            VALUES ($1, $2)
            RETURNING id, email,
                extract(epoch FROM created_at)::bigint AS created_at_unix
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .bind(secret_hash)
            .fetch_one(&self.pool)
            .instrument(span)
            .await;

        match row {
            Ok(row) => Ok(account_from_row(&row)),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict),
            Err(err) => Err(StoreError::Unavailable(
                anyhow::Error::new(err).context("failed to insert account"),
            )),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError> {
        // Identifiers are compared exactly, no lowercasing.
        let query = r"
            SELECT id, email, secret_hash,
                extract(epoch FROM created_at)::bigint AS created_at_unix
            FROM users
            WHERE email = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account by email")?;

        Ok(row.map(|row| AccountRecord {
            secret_hash: row.get("secret_hash"),
            account: account_from_row(&row),
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, StoreError> {
        let query = r"
            SELECT id, email, secret_hash,
                extract(epoch FROM created_at)::bigint AS created_at_unix
            FROM users
            WHERE id = $1
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account by id")?;

        Ok(row.map(|row| AccountRecord {
            secret_hash: row.get("secret_hash"),
            account: account_from_row(&row),
        }))
    }

    async fn update_secret_hash(&self, id: i64, secret_hash: &str) -> Result<(), StoreError> {
        let query = "UPDATE users SET secret_hash = $1 WHERE id = $2";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(secret_hash)
            .bind(id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to update secret hash")?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn put(&self, account_id: i64, token: &str, ttl: Duration) -> Result<(), StoreError> {
        let query = r"
            INSERT INTO refresh_sessions (account_id, token, expires_at)
            VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
            ON CONFLICT (account_id)
            DO UPDATE SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        sqlx::query(query)
            .bind(account_id)
            .bind(token)
            .bind(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to write session record")?;
        Ok(())
    }

    async fn get(&self, account_id: i64) -> Result<Option<String>, StoreError> {
        // Only unexpired records count; expiry is authoritative here.
        let query = r"
            SELECT token
            FROM refresh_sessions
            WHERE account_id = $1
              AND expires_at > NOW()
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to read session record")?;
        Ok(row.map(|row| row.get("token")))
    }

    async fn delete(&self, account_id: i64) -> Result<(), StoreError> {
        // Idempotent; it's fine if no rows are deleted.
        let query = "DELETE FROM refresh_sessions WHERE account_id = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(account_id)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete session record")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
