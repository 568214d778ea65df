//! Auth configuration and shared handler state.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::session::SessionManager;

/// Deployment mode. Cookies are marked `Secure` only in `Production`;
/// internal error detail surfaces only in `Development`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "Invalid environment: {other} (expected development or production)"
            )),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    environment: Environment,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            environment: Environment::Development,
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub(crate) fn cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }

    pub(crate) fn development(&self) -> bool {
        self.environment == Environment::Development
    }
}

pub struct AuthState {
    config: AuthConfig,
    sessions: Arc<SessionManager>,
}

impl AuthState {
    pub fn new(config: AuthConfig, sessions: Arc<SessionManager>) -> Self {
        Self { config, sessions }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}
