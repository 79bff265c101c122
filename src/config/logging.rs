//! Logging configuration.

use tracing_subscriber::EnvFilter;

use super::parse::{env_opt, env_or};
use super::ConfigError;

const DEFAULT_FILTER: &str = "server_request=info";
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Validated filter directives.
    pub filter: String,
    /// Service name for structured logging.
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            service_name: "server_request".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// - `LOG_LEVEL`: one of trace, debug, info, warn, error; scoped to this crate
    /// - `RUST_LOG`: full filter syntax, used when `LOG_LEVEL` is unset
    /// - `SERVICE_NAME`: `ctx.service` of every log line
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            filter: Self::resolve_filter(env_opt("LOG_LEVEL"), env_opt("RUST_LOG"))?,
            service_name: env_or("SERVICE_NAME", "server_request"),
        })
    }

    /// Pick the filter from `LOG_LEVEL` or `RUST_LOG` and check it parses.
    fn resolve_filter(
        log_level: Option<String>,
        rust_log: Option<String>,
    ) -> Result<String, ConfigError> {
        if let Some(level) = log_level {
            let level = level.to_lowercase();
            if !LEVELS.contains(&level.as_str()) {
                return Err(ConfigError::Invalid {
                    key: "LOG_LEVEL".into(),
                    message: format!("expected one of {}, got '{}'", LEVELS.join(", "), level),
                });
            }
            return Ok(format!("server_request={}", level));
        }

        let Some(filter) = rust_log else {
            return Ok(DEFAULT_FILTER.to_string());
        };

        EnvFilter::try_new(&filter).map_err(|e| ConfigError::Parse {
            key: "RUST_LOG".into(),
            value: filter.clone(),
            error: e.to_string(),
        })?;
        Ok(filter)
    }
}
