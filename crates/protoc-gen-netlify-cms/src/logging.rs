use eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `directive`. stdout carries the
/// plugin response and must stay clean.
pub fn init(directive: &str) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| eyre!("Invalid log filter '{directive}': {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {e}"))?;

    tracing::debug!(filter = directive, "Tracing initialized");
    Ok(())
}
