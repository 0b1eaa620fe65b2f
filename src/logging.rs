//! Tracing subscriber setup for the binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the embedding application. Logs go to stderr so command output on
//! stdout stays machine-readable.

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter honouring `RUST_LOG`, falling back to `level`.
pub fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(level: Level, json: bool) -> eyre::Result<()> {
    let include_target = matches!(level, Level::DEBUG | Level::TRACE);
    let registry = tracing_subscriber::registry().with(env_filter(level));

    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_target(include_target).with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}
