//! Configuration schemas.
//!
//! Settings are deserialized from TOML files via the `config` crate and may
//! be overridden by `CSP__`-prefixed environment variables. Each sub-module
//! represents a logical configuration section.

pub mod aws;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::aws::AwsSettings;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Environment variable prefix for overrides (`CSP__AWS__REGION=...`).
pub const ENV_PREFIX: &str = "CSP";

/// Root configuration.
///
/// Every section has defaults, so an absent file yields a usable config that
/// defers entirely to the AWS SDK's own configuration chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CspConfig {
    /// AWS SDK overrides.
    #[serde(default)]
    pub aws: AwsSettings,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CspConfig {
    /// Load configuration from TOML files and the process environment.
    ///
    /// Merges `config/default.toml`, an optional `config/{env}.toml` overlay,
    /// and environment variables prefixed with `CSP__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(Self::environment());

        Self::build(builder)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
