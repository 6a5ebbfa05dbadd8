//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::api::{Result, RuntimeError};

/// Directive applied when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Fails if a global subscriber is already installed, which lets tests and
/// embedding hosts call it unconditionally and ignore the error.
pub fn init() -> Result<()> {
    init_with(DEFAULT_DIRECTIVE)
}

/// Same as [`init`] with a custom fallback directive such as
/// `"character_core=debug"`.
pub fn init_with(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| RuntimeError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RuntimeError::Logging(e.to_string()))?;

    tracing::debug!("logging initialized");
    Ok(())
}
