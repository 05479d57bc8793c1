//! Layered configuration loading

use anyhow::Context;
use config::{Config, Environment, File};
use std::path::Path;

use cryptogap_core::AppConfig;

pub const ENV_PREFIX: &str = "CRYPTOGAP";
pub const DEFAULT_CONFIG_FILE: &str = "cryptogap.toml";

/// Defaults, then the optional config file, then `CRYPTOGAP__*` variables
pub fn load(file: &Path) -> anyhow::Result<AppConfig> {
    let config: AppConfig = Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("reading configuration from {}", file.display()))?
        .try_deserialize()
        .context("invalid configuration values")?;

    config.validate()?;
    Ok(config)
}
