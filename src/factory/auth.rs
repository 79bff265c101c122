//! Authorization header handling.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use super::keys;
use crate::core::{Error, Request, Result};
use crate::types::Environment;

/// Standard alphabet, padding optional.
const BASIC_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Apply the first Authorization header value to the environment.
///
/// `Basic` sets `PHP_AUTH_USER`, `PHP_AUTH_PW` and `AUTH_TYPE`; `Bearer`
/// copies the header verbatim into `HTTP_AUTHORIZATION`. Any other scheme
/// is rejected. Without the header this is a no-op.
pub fn apply_authorization(env: &mut Environment, request: &Request) -> Result<()> {
    let Some(header) = request.authorization() else {
        return Ok(());
    };

    if let Some(payload) = header.strip_prefix("Basic ") {
        let decoded = BASIC_ENGINE
            .decode(payload)
            .map_err(|e| Error::InvalidBasicEncoding(e.to_string()))?;
        let decoded = String::from_utf8_lossy(&decoded);

        let creds: Vec<&str> = decoded.split(':').collect();
        let [user, password] = creds.as_slice() else {
            return Err(Error::MalformedBasicCredentials { parts: creds.len() });
        };

        env.set(keys::PHP_AUTH_USER, user.to_string());
        env.set(keys::PHP_AUTH_PW, password.to_string());
        env.set(keys::AUTH_TYPE, "Basic");
        tracing::debug!(user = %user, "authorization: basic credentials applied");
    } else if header.starts_with("Bearer ") {
        env.set(keys::HTTP_AUTHORIZATION, header.into_owned());
        tracing::debug!("authorization: bearer token applied");
    } else {
        let scheme = header.split_whitespace().next().unwrap_or_default();
        return Err(Error::UnsupportedAuthScheme(scheme.to_string()));
    }

    Ok(())
}
