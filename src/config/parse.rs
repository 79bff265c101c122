//! Environment variable parsing utilities.

use super::ConfigError;
use crate::types::{Environment, ServerValue};

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse size string (e.g., "512", "64K", "2M", "1G").
/// Returns None for "off" or "0".
pub fn parse_size(s: &str) -> Result<Option<u64>, String> {
    let s = s.trim().to_lowercase();

    if s == "off" || s == "0" || s.is_empty() {
        return Ok(None);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('k') {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('g') {
        (n, 1024 * 1024 * 1024)
    } else {
        // Plain bytes
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid size: {}", s))?;

    num.checked_mul(multiplier)
        .map(Some)
        .ok_or_else(|| format!("size too large: {}", s))
}

/// Parse environment variable as size; `default` is used when unset.
pub fn env_size(key: &str, default: &str) -> Result<Option<u64>, ConfigError> {
    let value = env_or(key, default);
    parse_size(&value).map_err(|e| ConfigError::Parse {
        key: key.into(),
        value,
        error: e,
    })
}

/// Parse `KEY=VALUE;KEY=VALUE` into an environment.
/// All-digit values become integers.
pub fn parse_server_params(s: &str) -> Result<Environment, String> {
    let mut env = Environment::new();

    for pair in s.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty key in '{}'", pair));
        }

        env.set(key.to_string(), ServerValue::parse(value.trim()));
    }

    Ok(env)
}
