//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use messenger_core::MessengerError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Environment variable naming the active environment.
pub const ENVIRONMENT_VAR: &str = "MESSENGER_ENVIRONMENT";

/// Prefix of environment variable overrides, e.g. `MESSENGER__DATABASE__URL`.
pub const ENV_PREFIX: &str = "MESSENGER";

/// Configuration loader with reload support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `MESSENGER__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, MessengerError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, MessengerError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), MessengerError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, MessengerError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_messenger_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_messenger_error)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| MessengerError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_messenger_error(err: ConfigError) -> MessengerError {
    MessengerError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        let config = loader.get().await;

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cleanup.cron, "0 0 2 * * *");
        assert_eq!(config.cleanup.inactive_after_days, 1095);
    }

    #[tokio::test]
    async fn test_default_toml_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [server]
            port = 9000

            [cleanup]
            enabled = false
            "#,
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        let config = loader.get().await;

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.cleanup.enabled);
    }

    #[tokio::test]
    async fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
            [database]
            min_connections = 50
            max_connections = 5
            "#,
        )
        .unwrap();

        let err = ConfigLoader::new(dir.path().to_string_lossy()).err().unwrap();
        assert!(matches!(err, MessengerError::Configuration(_)));
        assert!(err.to_string().contains("Invalid pool size"));
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("default.toml");
        fs::write(&file, "[server]\nport = 8081\n").unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy()).unwrap();
        assert_eq!(loader.get().await.server.port, 8081);

        fs::write(&file, "[server]\nport = 8082\n").unwrap();
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.server.port, 8082);
    }
}
