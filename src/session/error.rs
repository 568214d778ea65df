//! The error taxonomy every boundary operation converts into.
//!
//! No raw store or codec error crosses the protocol boundary; internal detail
//! only surfaces in development mode.

use axum::http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    InvalidInput(&'static str),
    /// Bad identifier/secret pair. Deliberately does not say which.
    #[error("Invalid email or password")]
    AuthenticationFailed,
    /// Malformed, expired, wrong-signature, or session-mismatched token.
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Account not found")]
    NotFound,
    /// Duplicate identifier at registration.
    #[error("An account with this email already exists")]
    Conflict,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            // Duplicate registration surfaces as 400, matching the protocol table.
            Self::InvalidInput(_) | Self::Conflict => StatusCode::BAD_REQUEST,
            Self::AuthenticationFailed | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict,
            StoreError::Unavailable(err) => Self::Internal(err),
        }
    }
}

impl From<crate::token::Error> for AuthError {
    fn from(err: crate::token::Error) -> Self {
        match err {
            // An empty secret is operator error, not a bad token.
            crate::token::Error::EmptySecret => Self::Internal(anyhow::Error::new(err)),
            _ => Self::InvalidToken,
        }
    }
}
