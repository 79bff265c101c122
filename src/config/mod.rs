//! Configuration module for server_request.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use server_request::config::Config;
//! use server_request::factory::SimulatedServerRequestFactory;
//!
//! let config = Config::from_env()?;
//! let factory = SimulatedServerRequestFactory::from_config(&config.factory);
//! ```

mod error;
mod factory;
mod logging;
mod parse;

pub use error::ConfigError;
pub use factory::FactoryConfig;
pub use logging::LoggingConfig;
pub use parse::{parse_server_params, parse_size};

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Request factory configuration.
    pub factory: FactoryConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            factory: FactoryConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Log filter: {}", self.logging.filter);

        if self.factory.default_server_params.is_empty() {
            info!("  Default server params: none");
        } else {
            info!(
                "  Default server params: {}",
                self.factory.default_server_params.to_json()
            );
        }

        info!(
            "  Upload spool threshold: {} bytes",
            self.factory.upload_limits.spool_threshold
        );

        match self.factory.upload_limits.max_file_size {
            Some(max) => info!("  Upload max file size: {} bytes", max),
            None => info!("  Upload max file size: unlimited"),
        }
    }
}
