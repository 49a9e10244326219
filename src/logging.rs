//! Tracing subscriber setup

use anyhow::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, otherwise `directives`
pub fn env_filter(directives: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(directives)?),
    }
}

/// Install a global fmt subscriber
///
/// Fails if the directives are invalid or a global subscriber is already set.
pub fn init_logging(directives: &str) -> Result<()> {
    let filter = env_filter(directives)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    tracing::info!(filter = directives, "theme engine tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_directives() {
        assert!(env_filter("info,theme_editor=debug").is_ok());
    }

    #[test]
    fn test_second_init_fails() {
        init_logging("warn").unwrap();
        assert!(init_logging("warn").is_err());
    }
}
