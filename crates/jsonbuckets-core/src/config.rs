//! Configuration management for jsonbuckets.
//!
//! Supports defaults, optional config files, and environment variable
//! overrides, validated after load.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::limiter::RateLimits;

/// Root configuration for the jsonbuckets service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct JsonbucketsConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub rate_limits: RateLimits,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Socket address the server binds to.
    pub bind_address: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Storage engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://jsonbuckets.db".to_string(),
        }
    }
}

impl JsonbucketsConfig {
    /// Load configuration with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file specified by JSONBUCKETS_CONFIG env var
    /// 3. ./config/jsonbuckets.yaml
    /// 4. Hardcoded defaults (lowest priority)
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = Self::set_defaults(builder)?;

        if let Ok(config_path) = std::env::var("JSONBUCKETS_CONFIG") {
            builder = builder.add_source(File::with_name(&config_path).required(false));
        }

        builder = builder.add_source(File::with_name("./config/jsonbuckets").required(false));

        // Example: JSONBUCKETS_RATE_LIMITS__PER_HOUR=100
        builder = builder.add_source(
            Environment::with_prefix("JSONBUCKETS")
                .separator("__")
                .try_parsing(true),
        );

        let config: JsonbucketsConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn set_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = RateLimits::default();
        builder
            .set_default("api.bind_address", ApiConfig::default().bind_address)?
            .set_default("database.url", DatabaseConfig::default().url)?
            .set_default("rate_limits.per_day", u64::from(defaults.per_day))?
            .set_default("rate_limits.per_hour", u64::from(defaults.per_hour))?
            .set_default(
                "rate_limits.read_per_minute",
                u64::from(defaults.read_per_minute),
            )?
            .set_default(
                "rate_limits.write_per_minute",
                u64::from(defaults.write_per_minute),
            )
    }

    /// Validates cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Message(format!(
                "api.bind_address `{}` is not a valid socket address",
                self.api.bind_address
            )));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "database.url must not be empty".to_string(),
            ));
        }
        let limits = &self.rate_limits;
        if limits.per_day == 0
            || limits.per_hour == 0
            || limits.read_per_minute == 0
            || limits.write_per_minute == 0
        {
            return Err(ConfigError::Message(
                "rate limit ceilings must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
