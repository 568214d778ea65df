//! Session orchestration: login, refresh rotation, and revocation.
//!
//! The manager is the only writer of Session Records. A single account's
//! session moves through `NoSession -> Active(token) -> Active(token') -> ...`
//! where every refresh rotates both tokens, and logout or a password change
//! returns it to `NoSession`. Presenting any refresh token other than the
//! currently active one is rejected without disturbing the active session.
//!
//! Operations hold no in-process mutable state; the "at most one live refresh
//! token per account" invariant rests on the session store serializing writes
//! to a key (last writer wins). A true race between two concurrent refresh
//! calls for one account can let both succeed; this narrow race is accepted.

use std::sync::Arc;

use crate::store::{Account, CredentialStore, SessionStore, secret};
use crate::token::{TokenEngine, unix_now};

mod error;
pub use error::AuthError;


/// A freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

pub struct SessionManager {
    tokens: TokenEngine,
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        tokens: TokenEngine,
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            tokens,
            credentials,
            sessions,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenEngine {
        &self.tokens
    }

    /// Create an account with a hashed secret.
    ///
    /// # Errors
    /// `Conflict` when the identifier is already registered.
    pub async fn register(&self, email: &str, raw_secret: &str) -> Result<Account, AuthError> {
        let secret_hash = secret::hash_secret(raw_secret)?;
        Ok(self.credentials.create(email, &secret_hash).await?)
    }

    /// Verify credentials, mint a token pair, and open the session slot.
    ///
    /// Unknown identifier and wrong secret both produce the same
    /// `AuthenticationFailed`; correctness only, no timing-safety claim.
    ///
    /// # Errors
    /// `AuthenticationFailed` on any credential mismatch.
    pub async fn login(
        &self,
        email: &str,
        raw_secret: &str,
    ) -> Result<(Account, TokenPair), AuthError> {
        let Some(record) = self.credentials.find_by_email(email).await? else {
            return Err(AuthError::AuthenticationFailed);
        };
        if !secret::verify_secret(raw_secret, &record.secret_hash)? {
            return Err(AuthError::AuthenticationFailed);
        }

        let pair = self.open_session(record.account.id).await?;
        Ok((record.account, pair))
    }

    /// Rotate the token pair for a presented refresh token.
    ///
    /// The token must verify under the refresh domain *and* equal the stored
    /// Session Record exactly; anything else (reuse after rotation, logout,
    /// expiry) is `InvalidToken`. On success the record is overwritten, so
    /// the presented token becomes unusable even though it has not expired.
    ///
    /// # Errors
    /// `InvalidToken` when verification or the session check fails.
    pub async fn refresh(&self, presented: &str) -> Result<(Account, TokenPair), AuthError> {
        let claims = self.tokens.verify_refresh(presented, unix_now())?;

        let Some(record) = self.credentials.find_by_id(claims.sub).await? else {
            return Err(AuthError::InvalidToken);
        };

        match self.sessions.get(claims.sub).await? {
            Some(stored) if stored == presented => {}
            // Stale or replayed token: reject without touching the live session.
            _ => return Err(AuthError::InvalidToken),
        }

        let pair = self.open_session(claims.sub).await?;
        Ok((record.account, pair))
    }

    /// Delete the Session Record. Idempotent: deleting an absent session
    /// succeeds.
    ///
    /// # Errors
    /// Only on store failure.
    pub async fn logout(&self, account_id: i64) -> Result<(), AuthError> {
        Ok(self.sessions.delete(account_id).await?)
    }

    /// Verify the current secret, persist a new hash, and revoke the session.
    ///
    /// Revocation is deliberate policy: a secret change invalidates every
    /// outstanding refresh token, forcing re-authentication on all devices.
    ///
    /// # Errors
    /// `NotFound` when the account is missing, `AuthenticationFailed` when
    /// the current secret does not match.
    pub async fn change_secret(
        &self,
        account_id: i64,
        current_secret: &str,
        new_secret: &str,
    ) -> Result<(), AuthError> {
        let Some(record) = self.credentials.find_by_id(account_id).await? else {
            return Err(AuthError::NotFound);
        };
        if !secret::verify_secret(current_secret, &record.secret_hash)? {
            return Err(AuthError::AuthenticationFailed);
        }

        let secret_hash = secret::hash_secret(new_secret)?;
        self.credentials
            .update_secret_hash(account_id, &secret_hash)
            .await?;
        self.sessions.delete(account_id).await?;
        Ok(())
    }

    /// Pure account lookup.
    ///
    /// # Errors
    /// `NotFound` when the account is absent.
    pub async fn identity(&self, account_id: i64) -> Result<Account, AuthError> {
        let Some(record) = self.credentials.find_by_id(account_id).await? else {
            return Err(AuthError::NotFound);
        };
        Ok(record.account)
    }

    /// Verify an access token and return the account identifier it names.
    ///
    /// # Errors
    /// `InvalidToken` on any verification failure.
    pub fn verify_access(&self, token: &str) -> Result<i64, AuthError> {
        let claims = self.tokens.verify_access(token, unix_now())?;
        Ok(claims.sub)
    }

    /// Mint both tokens and overwrite the Session Record for the account.
    async fn open_session(&self, account_id: i64) -> Result<TokenPair, AuthError> {
        let now = unix_now();
        let pair = TokenPair {
            access: self.tokens.mint_access(account_id, now)?,
            refresh: self.tokens.mint_refresh(account_id, now)?,
        };
        self.sessions
            .put(account_id, &pair.refresh, self.tokens.refresh_ttl())
            .await?;
        Ok(pair)
    }
}
