//! Tracing subscriber setup.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `level` is an `EnvFilter` directive string (e.g. `info` or
/// `manganato_core=debug,info`); `format` is `text` or `json`.
pub fn init(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if format == "json" {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {}", e))
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {}", e))
    }
}
