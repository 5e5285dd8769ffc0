//! Tracing subscriber setup for the `remnant` binary.
//!
//! The library only emits events; installing a subscriber is left to binaries.
//! The filter comes from `--log-level` when given, else from `REMNANT_LOG` (which may
//! be set in a `.env` file), else defaults to `warn` so training-range warnings
//! are always visible.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "REMNANT_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Configure the global tracing subscriber (logs go to stderr).
pub fn init_tracing(level: Option<&str>) -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| AppError::new(2, format!("Invalid log level '{directive}': {e}")))?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialise logging: {e}")))
}
