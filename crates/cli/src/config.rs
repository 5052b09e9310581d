//! CLI configuration loading

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use waypoint_frontend_common::RuntimeConfig;

/// Load the runtime configuration.
///
/// Sources, later ones winning: built-in defaults, `file` (or
/// `<config_dir>/config.toml` when present), `WAYPOINT_*` environment variables.
pub fn load_runtime_config(file: Option<&Path>, config_dir: &Path) -> Result<RuntimeConfig> {
    let defaults = RuntimeConfig::default();

    let file_source = match file {
        Some(path) => config::File::from(path).required(true),
        None => config::File::from(config_dir.join("config.toml")).required(false),
    };

    let settings = config::Config::builder()
        .set_default("api_base", defaults.api_base)?
        .set_default("app_name", defaults.app_name)?
        .add_source(file_source)
        .add_source(config::Environment::with_prefix("WAYPOINT").try_parsing(true))
        .build()
        .context("Failed to load configuration")?;

    let config: RuntimeConfig = settings
        .try_deserialize()
        .context("Invalid configuration")?;
    debug!(?config, "Loaded configuration");
    Ok(config)
}
