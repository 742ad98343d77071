pub mod cli;
pub mod schema;

pub use cli::{parse as parse_args, parse_os, CliArgs, Command, USAGE};
pub use schema::{Metrics, MonitorConfig, SamplingConfig, SourcesConfig};

use std::path::{Path, PathBuf};
use termon_core::{MonitorError, Result};

/// Load configuration from a TOML file.  Returns `MonitorConfig::default()` if
/// the file doesn't exist so a bare `termon` always runs.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: MonitorConfig =
        toml::from_str(&raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;

    if config.sampling.samples == 0 {
        return Err(MonitorError::Config("sampling.samples must be at least 1".into()));
    }
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("termon").join("termon.toml")
}
