//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the
//! appropriate action, such as starting the API server with its full
//! configuration state.

use crate::api::Environment;
use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{auth, secrets};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(4002);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    // Signing secrets have no defaults; refuse to start without them.
    crate::cli::commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    let access_secret = matches
        .get_one::<String>(secrets::ARG_ACCESS_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --access-secret")?;
    let refresh_secret = matches
        .get_one::<String>(secrets::ARG_REFRESH_SECRET)
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --refresh-secret")?;

    let frontend_base_url = matches
        .get_one::<String>(auth::ARG_FRONTEND_BASE_URL)
        .cloned()
        .context("missing required argument: --frontend-base-url")?;
    let environment = matches
        .get_one::<String>(auth::ARG_ENVIRONMENT)
        .cloned()
        .context("missing required argument: --environment")?
        .parse::<Environment>()
        .map_err(|e| anyhow::anyhow!(e))?;

    let access_ttl_seconds = matches
        .get_one::<u64>(auth::ARG_ACCESS_TTL)
        .copied()
        .unwrap_or(900);
    let refresh_ttl_seconds = matches
        .get_one::<u64>(auth::ARG_REFRESH_TTL)
        .copied()
        .unwrap_or(604_800);

    Ok(Action::Server(Args {
        port,
        dsn,
        frontend_base_url,
        environment,
        access_secret,
        refresh_secret,
        access_ttl_seconds,
        refresh_ttl_seconds,
    }))
}
