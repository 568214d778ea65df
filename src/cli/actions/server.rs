use crate::api::{self, AuthConfig, Environment};
use crate::token::TokenEngine;
use anyhow::Result;
use secrecy::SecretString;
use std::time::Duration;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub frontend_base_url: String,
    pub environment: Environment,
    pub access_secret: SecretString,
    pub refresh_secret: SecretString,
    pub access_ttl_seconds: u64,
    pub refresh_ttl_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let tokens = TokenEngine::new(args.access_secret, args.refresh_secret)
        .with_access_ttl(Duration::from_secs(args.access_ttl_seconds))
        .with_refresh_ttl(Duration::from_secs(args.refresh_ttl_seconds));

    let auth_config =
        AuthConfig::new(args.frontend_base_url).with_environment(args.environment);

    api::new(args.port, args.dsn, tokens, auth_config).await
}
