//! API client with a cookie-borne session and coordinated refresh.
//!
//! Requests that come back `401 Unauthorized` trigger one refresh for the
//! whole client, no matter how many requests hit the expired session at
//! once: the first caller refreshes through [`gate::RefreshGate`], the
//! rest wait for its outcome, and every caller retries at most once.
//! Calls to the auth endpoints themselves never trigger a refresh.

use crate::store::Account;
use serde::Deserialize;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod error;
pub mod gate;
pub mod transport;

pub use error::ClientError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

use gate::{RefreshGate, Ticket};

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";
const REFRESH_PATH: &str = "/api/auth/refresh";
const PASSWORD_PATH: &str = "/api/auth/change-password";
const ME_PATH: &str = "/api/auth/me";

/// Endpoints whose own 401s mean bad credentials, not an expired session.
const SKIP_REFRESH_PATHS: &[&str] = &[LOGIN_PATH, REGISTER_PATH, REFRESH_PATH];

#[derive(Debug, Deserialize)]
struct AccountEnvelope {
    #[serde(rename = "user")]
    account: Account,
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    gate: RefreshGate,
    session_expired: AtomicBool,
}

impl ApiClient {
    /// Client talking to a live server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(
            base_url,
        )?)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            gate: RefreshGate::new(),
            session_expired: AtomicBool::new(false),
        }
    }

    /// True once a refresh has failed and nobody has signed in since.
    pub fn is_session_expired(&self) -> bool {
        self.session_expired.load(Ordering::Acquire)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Account, ClientError> {
        let request = ApiRequest::post(
            REGISTER_PATH,
            json!({ "email": email, "password": password }),
        );
        let response = self.send(&request).await?;
        self.session_expired.store(false, Ordering::Release);
        decode::<AccountEnvelope>(&response).map(|envelope| envelope.account)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Account, ClientError> {
        let request =
            ApiRequest::post(LOGIN_PATH, json!({ "email": email, "password": password }));
        let response = self.send(&request).await?;
        self.session_expired.store(false, Ordering::Release);
        decode::<AccountEnvelope>(&response).map(|envelope| envelope.account)
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = ApiRequest::post_empty(LOGOUT_PATH);
        self.send(&request).await.map(|_| ())
    }

    pub async fn me(&self) -> Result<Account, ClientError> {
        let request = ApiRequest::get(ME_PATH);
        let response = self.send(&request).await?;
        decode::<AccountEnvelope>(&response).map(|envelope| envelope.account)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let request = ApiRequest::put(
            PASSWORD_PATH,
            json!({
                "currentPassword": current_password,
                "newPassword": new_password,
            }),
        );
        self.send(&request).await.map(|_| ())
    }

    /// Send a request, refreshing the session and retrying once on 401.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.send(request).await?;

        if response.status != 401 || is_skip_refresh_path(&request.path) {
            return into_result(response);
        }

        self.ensure_fresh_session().await?;

        let retried = self.transport.send(request).await?;
        into_result(retried)
    }

    /// Refresh the session exactly once across concurrent callers.
    async fn ensure_fresh_session(&self) -> Result<(), ClientError> {
        match self.gate.enter().await {
            Ticket::Leader => {
                let outcome = self.refresh_session().await;
                self.gate.release(outcome.clone()).await;
                outcome
            }
            Ticket::Follower(rx) => rx.await.unwrap_or(Err(ClientError::SessionExpired)),
        }
    }

    async fn refresh_session(&self) -> Result<(), ClientError> {
        let request = ApiRequest::post_empty(REFRESH_PATH);
        let outcome = match self.transport.send(&request).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(_) | Err(_) => Err(ClientError::SessionExpired),
        };

        if outcome.is_err() {
            self.session_expired.store(true, Ordering::Release);
        }

        outcome
    }
}

fn is_skip_refresh_path(path: &str) -> bool {
    SKIP_REFRESH_PATHS
        .iter()
        .any(|skip| path.trim_end_matches('/').ends_with(skip))
}

fn into_result(response: ApiResponse) -> Result<ApiResponse, ClientError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Http {
            status: response.status,
            message: transport::sanitize_body(&response.body),
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: &ApiResponse) -> Result<T, ClientError> {
    serde_json::from_str(&response.body)
        .map_err(|err| ClientError::Parse(format!("Failed to decode response: {err}")))
}
