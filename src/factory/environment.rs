//! Server environment synthesis.

use std::time::{SystemTime, UNIX_EPOCH};

use http::Uri;

use super::{auth, keys, values};
use crate::core::{Request, Result};
use crate::request::{build_query_string, decode_html_entities, parse_query_string};
use crate::types::Environment;

/// Conventional defaults every synthesized environment starts from.
pub fn baseline() -> Environment {
    let request_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let mut env = Environment::with_capacity(24);
    env.set(keys::SERVER_NAME, values::LOCALHOST);
    env.set(keys::SERVER_PORT, values::PORT_80);
    env.set(keys::HTTP_HOST, values::LOCALHOST);
    env.set(keys::HTTP_USER_AGENT, crate::USER_AGENT);
    env.set(keys::HTTP_ACCEPT, values::ACCEPT);
    env.set(keys::HTTP_ACCEPT_LANGUAGE, values::ACCEPT_LANGUAGE);
    env.set(keys::HTTP_ACCEPT_CHARSET, values::ACCEPT_CHARSET);
    env.set(keys::REMOTE_ADDR, values::LOOPBACK);
    env.set(keys::SCRIPT_NAME, "");
    env.set(keys::SCRIPT_FILENAME, "");
    env.set(keys::SERVER_PROTOCOL, values::PROTOCOL_HTTP_11);
    env.set(keys::REQUEST_TIME, request_time);
    env
}

/// URI components in the shape `parse_url` reports them.
#[derive(Debug, Default, PartialEq, Eq)]
struct UriParts<'a> {
    scheme: Option<&'a str>,
    host: Option<&'a str>,
    port: Option<u16>,
    user: Option<&'a str>,
    password: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> UriParts<'a> {
    fn from_uri(uri: &'a Uri) -> Self {
        let userinfo = uri
            .authority()
            .and_then(|a| a.as_str().rsplit_once('@'))
            .map(|(info, _)| info);
        let (user, password) = match userinfo {
            Some(info) => match info.split_once(':') {
                Some((user, password)) => (Some(user), Some(password)),
                None => (Some(info), None),
            },
            None => (None, None),
        };

        Self {
            scheme: uri.scheme_str(),
            host: uri.host(),
            port: uri.port_u16(),
            user,
            password,
            path: uri.path(),
            query: uri.query(),
        }
    }
}

/// Build the server environment for a request.
///
/// Precedence, lowest first: baseline, caller defaults, URI components,
/// Authorization header.
pub fn synthesize(defaults: &Environment, request: &Request) -> Result<Environment> {
    let mut env = baseline();
    env.extend_from(defaults);

    let method = request.method().as_str().to_ascii_uppercase();
    env.set(keys::PATH_INFO, "");
    env.set(keys::REQUEST_METHOD, method.clone());

    let parts = UriParts::from_uri(request.uri());

    if let Some(host) = parts.host {
        env.set(keys::SERVER_NAME, host.to_string());
        env.set(keys::HTTP_HOST, host.to_string());
    }

    if let Some(scheme) = parts.scheme {
        if scheme == "https" {
            env.set(keys::HTTPS, values::HTTPS_ON);
            env.set(keys::SERVER_PORT, values::PORT_443);
        } else {
            env.remove(keys::HTTPS);
            env.set(keys::SERVER_PORT, values::PORT_80);
        }
    }

    if let Some(port) = parts.port {
        env.set(keys::SERVER_PORT, port);
        let host = env
            .get(keys::HTTP_HOST)
            .map(|h| h.to_string())
            .unwrap_or_default();
        env.set(keys::HTTP_HOST, format!("{}:{}", host, port));
    }

    if let Some(user) = parts.user {
        env.set(keys::PHP_AUTH_USER, user.to_string());
    }
    if let Some(password) = parts.password {
        env.set(keys::PHP_AUTH_PW, password.to_string());
    }

    let path = if parts.path.is_empty() { "/" } else { parts.path };

    // Header credentials override URI credentials.
    auth::apply_authorization(&mut env, request)?;

    if matches!(method.as_str(), "POST" | "PUT" | "DELETE") && !env.contains_key(keys::CONTENT_TYPE)
    {
        env.set(keys::CONTENT_TYPE, values::FORM_URLENCODED);
    }

    let query_string = parts
        .query
        .map(|q| build_query_string(&parse_query_string(&decode_html_entities(q))))
        .unwrap_or_default();

    let request_uri = if query_string.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query_string)
    };
    env.set(keys::REQUEST_URI, request_uri);
    env.set(keys::QUERY_STRING, query_string);

    tracing::debug!(
        method = %method,
        uri = %request.uri(),
        vars = env.len(),
        "synthesize: server environment built"
    );

    Ok(env)
}
