//! Tracing setup: subscriber installation, span definitions, and event types.

pub mod events;
pub mod spans;

use tacit_core::config::ObservabilityConfig;
use tacit_core::errors::{ConfigError, TacitResult};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level. Returns `false` when a
/// subscriber was already installed (tests, embedding hosts).
pub fn init(config: &ObservabilityConfig) -> TacitResult<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| ConfigError::Parse {
            reason: format!("invalid log level {:?}: {e}", config.log_level),
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    Ok(installed.is_ok())
}
