use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;

const fn level_for(verbosity: u8) -> Option<tracing::Level> {
    match verbosity {
        0 => None,
        1 => Some(tracing::Level::WARN),
        2 => Some(tracing::Level::INFO),
        3 => Some(tracing::Level::DEBUG),
        _ => Some(tracing::Level::TRACE),
    }
}

/// Parse the command line, bring up logging, and resolve the action to run.
/// The binary stays a thin shim around this.
///
/// # Errors
///
/// Returns an error when the configuration is incomplete (missing or equal
/// signing secrets, bad environment name) or logging cannot be installed.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    let level = level_for(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );

    telemetry::init(level)?;

    dispatch::handler(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), None);
        assert_eq!(level_for(1), Some(tracing::Level::WARN));
        assert_eq!(level_for(2), Some(tracing::Level::INFO));
        assert_eq!(level_for(3), Some(tracing::Level::DEBUG));
        assert_eq!(level_for(9), Some(tracing::Level::TRACE));
    }
}
