//! # Tessera (Credential Authentication & Session Service)
//!
//! `tessera` is a credential-based authentication service: registration,
//! login, logout, access/refresh token issuance, token rotation, and password
//! change.
//!
//! ## Token Lifecycle
//!
//! Authentication state travels in two signed tokens with independent key
//! material:
//!
//! - **Access token**: short-lived (15 minutes), stateless, checked on every
//!   protected request.
//! - **Refresh token**: long-lived (7 days), used only to obtain a new token
//!   pair. Possession alone is not sufficient: the server keeps one Session
//!   Record per account holding the currently valid refresh token, so any
//!   refresh token other than the latest one is rejected.
//!
//! Every refresh **rotates** both tokens and overwrites the Session Record,
//! which gives single-session-per-account semantics. Logout and password
//! change delete the record, revoking every outstanding refresh token at once.
//!
//! ## Module Layout
//!
//! - [`token`]: mints and verifies the HS256 tokens (two signing domains).
//! - [`session`]: the session manager orchestrating stores and token engine.
//! - [`store`]: credential and session store traits, Postgres and in-memory
//!   implementations.
//! - [`api`]: the axum HTTP surface and cookie handling.
//! - [`client`]: a consuming-side client that transparently repairs expired
//!   access tokens with exactly one refresh call under concurrency.
//! - [`cli`]: argument parsing, logging setup, and server bootstrap.

pub mod api;
pub mod cli;
pub mod client;
pub mod session;
pub mod store;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
