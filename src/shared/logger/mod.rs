//! Tracing subscriber setup.

use anyhow::Result;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigTrait};

const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Production environments log
/// JSON, everything else gets the pretty console format. Fails (without
/// panicking) if a global subscriber is already installed.
pub fn init(cfg: &Config) -> Result<()> {
    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or(DEFAULT_LEVEL);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init()?;
    }

    Ok(())
}
