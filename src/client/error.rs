//! Client-side error type.
//!
//! `Clone` because a single refresh outcome is fanned out to every caller
//! queued behind the in-flight refresh.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Could not reach the server at all.
    #[error("Unable to reach the server: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },
    /// A response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Parse(String),
    /// Refresh failed; the caller must re-authenticate.
    #[error("Session expired, sign in again")]
    SessionExpired,
}
