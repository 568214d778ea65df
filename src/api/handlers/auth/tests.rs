use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header::SET_COOKIE},
    response::Response,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use super::state::{AuthConfig, AuthState, Environment};
use crate::api;
use crate::session::SessionManager;
use crate::store::{MemoryCredentialStore, MemorySessionStore};
use crate::token::TokenEngine;

fn test_router() -> Router {
    test_router_with(Environment::Development)
}

fn test_router_with(environment: Environment) -> Router {
    let tokens = TokenEngine::new(
        SecretString::from("test-access-secret".to_string()),
        SecretString::from("test-refresh-secret".to_string()),
    );
    let sessions = Arc::new(SessionManager::new(
        tokens,
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(MemorySessionStore::new()),
    ));
    let config =
        AuthConfig::new("http://localhost:4001".to_string()).with_environment(environment);
    api::router(Arc::new(AuthState::new(config, sessions)))
}

fn json_request(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn bare_request(method: &str, path: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(cookies) = cookies {
        builder = builder.header("cookie", cookies);
    }
    builder.body(Body::empty()).expect("request")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Collect `Set-Cookie` values, e.g. `accessToken=...; Path=/; ...`.
fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().expect("cookie header").to_string())
        .collect()
}

/// Pull the raw token out of a `Set-Cookie` line for the named cookie.
fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    cookies.iter().find_map(|cookie| {
        let (pair, _) = cookie.split_once(';')?;
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

async fn register(router: &Router, email: &str, password: &str) -> Response {
    router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            json!({ "email": email, "password": password }),
        ))
        .await
        .expect("response")
}

async fn login(router: &Router, email: &str, password: &str) -> Response {
    router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        ))
        .await
        .expect("response")
}

/// Register + login, returning `(access, refresh)` cookie values.
async fn signed_in(router: &Router, email: &str, password: &str) -> (String, String) {
    let response = register(router, email, password).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = login(router, email, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    (
        cookie_value(&cookies, "accessToken").expect("access cookie"),
        cookie_value(&cookies, "refreshToken").expect("refresh cookie"),
    )
}

#[tokio::test]
async fn register_returns_the_created_account() {
    let router = test_router();

    let response = register(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    // Registration does not open a session.
    assert!(set_cookies(&response).is_empty());

    let body = body_json(response).await;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"]["id"].is_i64());
    assert!(body.get("account").is_none());
}

#[tokio::test]
async fn register_rejects_invalid_input() {
    let router = test_router();

    for (email, password) in [
        ("", "secret-1"),
        ("not-an-email", "secret-1"),
        ("alice@example.com", "short"),
        ("alice@example.com", ""),
    ] {
        let response = register(&router, email, password).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "accepted {email:?}/{password:?}"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "Bad Request");
    }
}

#[tokio::test]
async fn duplicate_registration_is_a_bad_request() {
    let router = test_router();

    let response = register(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = register(&router, "alice@example.com", "other-secret").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "An account with this email already exists");
}

#[tokio::test]
async fn login_sets_both_cookies() {
    let router = test_router();
    let response = register(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = login(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    let access = cookies
        .iter()
        .find(|cookie| cookie.starts_with("accessToken="))
        .expect("access cookie");
    let refresh = cookies
        .iter()
        .find(|cookie| cookie.starts_with("refreshToken="))
        .expect("refresh cookie");

    for cookie in [access, refresh] {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        // Development mode serves plain http.
        assert!(!cookie.contains("Secure"));
    }
    assert!(access.contains("Max-Age=900"));
    assert!(refresh.contains("Max-Age=604800"));

    let body = body_json(response).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn production_cookies_are_marked_secure() {
    let router = test_router_with(Environment::Production);
    let response = register(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = login(&router, "alice@example.com", "secret-1").await;
    for cookie in set_cookies(&response) {
        assert!(cookie.contains("; Secure"), "not secure: {cookie}");
    }
}

#[tokio::test]
async fn bad_credentials_and_unknown_account_look_identical() {
    let router = test_router();
    let response = register(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let wrong_password = login(&router, "alice@example.com", "wrong-secret").await;
    let unknown_account = login(&router, "nobody@example.com", "secret-1").await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_account.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_password).await,
        body_json(unknown_account).await
    );
}

#[tokio::test]
async fn me_requires_a_valid_access_cookie() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/auth/me", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Access token required");

    let response = router
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/auth/me",
            Some("accessToken=garbage"),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn me_returns_the_authenticated_account() {
    let router = test_router();
    let (access, _refresh) = signed_in(&router, "alice@example.com", "secret-1").await;

    let response = router
        .clone()
        .oneshot(bare_request(
            "GET",
            "/api/auth/me",
            Some(&format!("accessToken={access}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn refresh_without_cookie_is_a_bad_request() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/auth/refresh", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Refresh token required");
}

#[tokio::test]
async fn refresh_rotates_cookies_and_invalidates_the_prior_token() {
    let router = test_router();
    let (_access, refresh) = signed_in(&router, "alice@example.com", "secret-1").await;

    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/refresh",
            Some(&format!("refreshToken={refresh}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    let rotated = cookie_value(&cookies, "refreshToken").expect("rotated refresh cookie");
    assert!(cookie_value(&cookies, "accessToken").is_some());
    assert_ne!(rotated, refresh);

    // The replaced token no longer refreshes.
    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/refresh",
            Some(&format!("refreshToken={refresh}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The rotated one still does.
    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/refresh",
            Some(&format!("refreshToken={rotated}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_clears_cookies_and_revokes_the_session() {
    let router = test_router();
    let (access, refresh) = signed_in(&router, "alice@example.com", "secret-1").await;

    let response = router
        .clone()
        .oneshot(bare_request("POST", "/api/auth/logout", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/logout",
            Some(&format!("accessToken={access}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    for cookie in set_cookies(&response) {
        assert!(cookie.contains("Max-Age=0"), "not cleared: {cookie}");
    }

    // Revoked: the refresh token no longer works.
    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/refresh",
            Some(&format!("refreshToken={refresh}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logout is idempotent while the access token is still valid.
    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/logout",
            Some(&format!("accessToken={access}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn change_password_revokes_sessions_and_requires_the_current_one() {
    let router = test_router();
    let (access, refresh) = signed_in(&router, "alice@example.com", "secret-1").await;

    let mut request = json_request(
        "PUT",
        "/api/auth/change-password",
        json!({ "currentPassword": "wrong", "newPassword": "secret-2" }),
    );
    request
        .headers_mut()
        .insert("cookie", format!("accessToken={access}").parse().unwrap());
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut request = json_request(
        "PUT",
        "/api/auth/change-password",
        json!({ "currentPassword": "secret-1", "newPassword": "secret-2" }),
    );
    request
        .headers_mut()
        .insert("cookie", format!("accessToken={access}").parse().unwrap());
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    for cookie in set_cookies(&response) {
        assert!(cookie.contains("Max-Age=0"), "not cleared: {cookie}");
    }
    let body = body_json(response).await;
    assert_eq!(body["message"], "Password changed successfully");

    // Global revocation: the old refresh token is dead.
    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/refresh",
            Some(&format!("refreshToken={refresh}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The old password is gone, the new one works.
    let response = login(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = login(&router, "alice@example.com", "secret-2").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn change_password_rejects_a_short_new_password() {
    let router = test_router();
    let (access, _refresh) = signed_in(&router, "alice@example.com", "secret-1").await;

    let mut request = json_request(
        "PUT",
        "/api/auth/change-password",
        json!({ "currentPassword": "secret-1", "newPassword": "tiny" }),
    );
    request
        .headers_mut()
        .insert("cookie", format!("accessToken={access}").parse().unwrap());
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_revokes_the_previous_session() {
    let router = test_router();
    let (_access, first_refresh) = signed_in(&router, "alice@example.com", "secret-1").await;

    // A second login overwrites the session record.
    let response = login(&router, "alice@example.com", "secret-1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(bare_request(
            "POST",
            "/api/auth/refresh",
            Some(&format!("refreshToken={first_refresh}")),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unmapped_paths_return_a_json_404() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/api/auth/unknown", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Endpoint not found");
}

#[tokio::test]
async fn health_is_reachable_without_auth() {
    let router = test_router();

    let response = router
        .clone()
        .oneshot(bare_request("GET", "/health", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
