//! Configuration module with client-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `api` - Marketplace API endpoints, timeouts and credential persistence
//! - `environment` - Environment detection and logging configuration

pub mod api;
pub mod environment;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use api::ApiConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use config::ConfigError;

/// Prefix for layered environment overrides, e.g. `CAMPUS_NEST__API__BASE_URL`
pub const ENV_PREFIX: &str = "CAMPUS_NEST";

/// Complete client configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Marketplace API configuration
    pub api: ApiConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            api: ApiConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig::new("https://api.campusnest.app/api/").with_timeout_secs(15),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Preset for the given environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        }
    }

    /// Load configuration from plain environment variables
    ///
    /// Reads `ENVIRONMENT` for the preset, then applies `API_*`,
    /// `CREDENTIALS_PATH` and `LOG_LEVEL` overrides.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = Self::for_environment(env);
        config.api = config.api.merge_env();
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        config
    }

    /// Load layered configuration
    ///
    /// Sources, lowest precedence first:
    /// 1. the preset for the detected environment (see [`AppConfig::from_env`])
    /// 2. an optional `config.<environment>.toml` in the working directory
    /// 3. `CAMPUS_NEST__*` environment variables (`__` separates sections)
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::from_env();
        let file_name = defaults.environment.config_file().to_string();

        config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name(&file_name).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
