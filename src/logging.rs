//! Structured logging on stderr, driven by an `EnvFilter` directive.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter for a directive such as `warn` or `transcript_replay=debug`.
pub fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| format!("invalid log filter {directive:?}"))
}

/// Install the global subscriber. Must be called at most once per process.
///
/// Output goes to stderr so stdout only carries what the user is meant to read.
pub fn init_logging(directive: &str) -> Result<()> {
    let filter = build_filter(directive)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(())
}
