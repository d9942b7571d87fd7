//! Configuration loader with layered sources.

use crate::AppConfig;
use clinica_core::ClinicaError;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::{debug, info};

/// Loads the application configuration.
///
/// Configuration is loaded from multiple sources in order, later sources
/// overriding earlier ones:
/// 1. `{config_dir}/default.toml` - default values
/// 2. `{config_dir}/{environment}.toml` - environment-specific overrides
/// 3. `{config_dir}/local.toml` - local overrides (not committed)
/// 4. Environment variables with the `CLINICA_` prefix (`__` separator)
pub fn load_config(config_dir: &str) -> Result<AppConfig, ClinicaError> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file found or error loading it: {}", e);
    }

    let environment =
        std::env::var("CLINICA_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    let default_path = format!("{}/default.toml", config_dir);
    if Path::new(&default_path).exists() {
        debug!("Loading default config from: {}", default_path);
        builder = builder.add_source(File::with_name(&default_path).required(false));
    }

    let env_path = format!("{}/{}.toml", config_dir, environment);
    if Path::new(&env_path).exists() {
        debug!("Loading environment config from: {}", env_path);
        builder = builder.add_source(File::with_name(&env_path).required(false));
    }

    let local_path = format!("{}/local.toml", config_dir);
    if Path::new(&local_path).exists() {
        debug!("Loading local config from: {}", local_path);
        builder = builder.add_source(File::with_name(&local_path).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("CLINICA")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ClinicaError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ClinicaError::Configuration(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Loads configuration from the default location (`./config`).
pub fn load_default_config() -> Result<AppConfig, ClinicaError> {
    load_config("./config")
}

fn validate_config(config: &AppConfig) -> Result<(), ClinicaError> {
    if config.database.url.is_empty() {
        return Err(ClinicaError::Configuration(
            "database.url must not be empty".to_string(),
        ));
    }
    if config.database.max_connections == 0 {
        return Err(ClinicaError::Configuration(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }
    if config.cache.enabled && config.cache.url.is_empty() {
        return Err(ClinicaError::Configuration(
            "cache.url must not be empty when caching is enabled".to_string(),
        ));
    }
    Ok(())
}
