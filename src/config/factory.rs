//! Factory configuration.

use super::parse::{env_opt, env_size, parse_server_params};
use super::ConfigError;
use crate::request::{UploadLimits, DEFAULT_SPOOL_THRESHOLD};
use crate::types::Environment;

/// Factory configuration loaded from environment.
#[derive(Clone, Debug, Default)]
pub struct FactoryConfig {
    /// Overrides for the built-in environment baseline.
    pub default_server_params: Environment,
    /// Limits applied to uploaded files.
    pub upload_limits: UploadLimits,
}

impl FactoryConfig {
    /// Load configuration from environment variables.
    ///
    /// - `DEFAULT_SERVER_PARAMS`: `KEY=VALUE;KEY=VALUE`
    /// - `UPLOAD_SPOOL_THRESHOLD`: bytes kept in memory per file (default 2M)
    /// - `UPLOAD_MAX_FILE_SIZE`: largest accepted file, `off` for no limit
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_server_params = match env_opt("DEFAULT_SERVER_PARAMS") {
            Some(raw) => parse_server_params(&raw).map_err(|message| ConfigError::Invalid {
                key: "DEFAULT_SERVER_PARAMS".into(),
                message,
            })?,
            None => Environment::new(),
        };

        let spool_threshold = env_size("UPLOAD_SPOOL_THRESHOLD", "2M")?
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .unwrap_or(DEFAULT_SPOOL_THRESHOLD);
        let max_file_size = env_size("UPLOAD_MAX_FILE_SIZE", "off")?;

        Ok(Self {
            default_server_params,
            upload_limits: UploadLimits {
                spool_threshold,
                max_file_size,
            },
        })
    }
}
