//! Cookie plumbing for the two credential carriers.
//!
//! Tokens travel exclusively in `HttpOnly` cookies; handlers never read an
//! `Authorization` header. Each cookie's `Max-Age` matches the lifetime of
//! the token it carries.

use axum::http::{
    HeaderMap, HeaderValue,
    header::{COOKIE, InvalidHeaderValue, SET_COOKIE},
};

use super::state::AuthState;
use crate::session::TokenPair;

pub const ACCESS_COOKIE_NAME: &str = "accessToken";
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Build an `HttpOnly; SameSite=Strict` cookie carrying a token.
fn token_cookie(
    name: &str,
    token: &str,
    max_age_seconds: u64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{name}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age_seconds}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{name}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Append `Set-Cookie` headers for a freshly minted token pair.
pub(super) fn set_token_cookies(
    headers: &mut HeaderMap,
    state: &AuthState,
    pair: &TokenPair,
) -> Result<(), InvalidHeaderValue> {
    let secure = state.config().cookie_secure();
    let tokens = state.sessions().tokens();
    headers.append(
        SET_COOKIE,
        token_cookie(
            ACCESS_COOKIE_NAME,
            &pair.access,
            tokens.access_ttl().as_secs(),
            secure,
        )?,
    );
    headers.append(
        SET_COOKIE,
        token_cookie(
            REFRESH_COOKIE_NAME,
            &pair.refresh,
            tokens.refresh_ttl().as_secs(),
            secure,
        )?,
    );
    Ok(())
}

/// Append `Set-Cookie` headers expiring both carriers, whatever they held.
pub(super) fn clear_token_cookies(
    headers: &mut HeaderMap,
    state: &AuthState,
) -> Result<(), InvalidHeaderValue> {
    let secure = state.config().cookie_secure();
    headers.append(SET_COOKIE, clear_cookie(ACCESS_COOKIE_NAME, secure)?);
    headers.append(SET_COOKIE, clear_cookie(REFRESH_COOKIE_NAME, secure)?);
    Ok(())
}

/// Pull a named cookie out of the request `Cookie` header.
pub(crate) fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}
