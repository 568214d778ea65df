//! Signing-secret arguments.
//!
//! There are no defaults: the server must not start without both secrets,
//! and they must differ so the two signing domains stay independent.

use clap::{Arg, Command};

pub const ARG_ACCESS_SECRET: &str = "access-secret";
pub const ARG_REFRESH_SECRET: &str = "refresh-secret";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ACCESS_SECRET)
                .long(ARG_ACCESS_SECRET)
                .help("HS256 secret for the access token signing domain")
                .env("TESSERA_ACCESS_SECRET"),
        )
        .arg(
            Arg::new(ARG_REFRESH_SECRET)
                .long(ARG_REFRESH_SECRET)
                .help("HS256 secret for the refresh token signing domain")
                .env("TESSERA_REFRESH_SECRET"),
        )
}

/// Validate the secret pair: both present, non-empty, and distinct.
///
/// # Errors
/// Returns an error string naming the offending argument.
pub fn validate(matches: &clap::ArgMatches) -> Result<(), String> {
    let access = matches
        .get_one::<String>(ARG_ACCESS_SECRET)
        .filter(|secret| !secret.trim().is_empty())
        .ok_or_else(|| format!("Missing required argument: --{ARG_ACCESS_SECRET}"))?;
    let refresh = matches
        .get_one::<String>(ARG_REFRESH_SECRET)
        .filter(|secret| !secret.trim().is_empty())
        .ok_or_else(|| format!("Missing required argument: --{ARG_REFRESH_SECRET}"))?;

    if access == refresh {
        return Err(format!(
            "--{ARG_ACCESS_SECRET} and --{ARG_REFRESH_SECRET} must differ"
        ));
    }
    Ok(())
}
