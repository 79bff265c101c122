//! Conversion of client requests into server requests.
//!
//! [`SimulatedServerRequestFactory`] synthesizes what a server would have
//! recorded out-of-band for a request: the environment, parsed body,
//! uploaded files and query parameters.
//!
//! # Example
//!
//! ```rust,ignore
//! use server_request::factory::{ServerRequestFactory, SimulatedServerRequestFactory};
//!
//! let factory = SimulatedServerRequestFactory::new();
//! let req = http::Request::get("https://example.com/a?b=1").body(bytes::Bytes::new())?;
//! let server_req = factory.convert_to_server_request(req.into())?;
//! assert_eq!(server_req.query_param("b"), Some("1"));
//! ```

mod auth;
mod body;
mod environment;

use std::sync::Arc;

use crate::config::FactoryConfig;
use crate::core::{Request, Result, ServerRequest};
use crate::request::{parse_cookies, parse_query_string, UploadLimits};
use crate::types::{Environment, ParamList};

pub use auth::apply_authorization;
pub use body::{parse_body, ParsedBody};
pub use environment::{baseline, synthesize};

/// Environment key constants.
pub mod keys {
    // Server info
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
    pub const HTTPS: &str = "HTTPS";

    // Client info
    pub const REMOTE_ADDR: &str = "REMOTE_ADDR";

    // HTTP headers
    pub const HTTP_HOST: &str = "HTTP_HOST";
    pub const HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";
    pub const HTTP_ACCEPT: &str = "HTTP_ACCEPT";
    pub const HTTP_ACCEPT_LANGUAGE: &str = "HTTP_ACCEPT_LANGUAGE";
    pub const HTTP_ACCEPT_CHARSET: &str = "HTTP_ACCEPT_CHARSET";
    pub const HTTP_AUTHORIZATION: &str = "HTTP_AUTHORIZATION";

    // Script paths
    pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
    pub const SCRIPT_FILENAME: &str = "SCRIPT_FILENAME";
    pub const PATH_INFO: &str = "PATH_INFO";

    // Request info
    pub const REQUEST_TIME: &str = "REQUEST_TIME";
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const REQUEST_URI: &str = "REQUEST_URI";
    pub const QUERY_STRING: &str = "QUERY_STRING";
    pub const CONTENT_TYPE: &str = "CONTENT_TYPE";

    // Credentials
    pub const PHP_AUTH_USER: &str = "PHP_AUTH_USER";
    pub const PHP_AUTH_PW: &str = "PHP_AUTH_PW";
    pub const AUTH_TYPE: &str = "AUTH_TYPE";
}

/// Static environment values.
pub(crate) mod values {
    pub const LOCALHOST: &str = "localhost";
    pub const LOOPBACK: &str = "127.0.0.1";
    pub const PORT_80: i64 = 80;
    pub const PORT_443: i64 = 443;
    pub const HTTPS_ON: &str = "on";
    pub const PROTOCOL_HTTP_11: &str = "HTTP/1.1";
    pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
    pub const ACCEPT_LANGUAGE: &str = "en-us,en;q=0.5";
    pub const ACCEPT_CHARSET: &str = "ISO-8859-1,utf-8;q=0.7,*;q=0.7";
    pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
}

/// Convert a client-side request into one fit for server-side consumption.
pub trait ServerRequestFactory {
    fn convert_to_server_request(&self, request: Request) -> Result<ServerRequest>;
}

/// Factory that simulates the server environment for a request.
///
/// The default environment is immutable after construction and shared,
/// so one factory can serve concurrent conversions.
#[derive(Clone, Debug, Default)]
pub struct SimulatedServerRequestFactory {
    defaults: Arc<Environment>,
    limits: UploadLimits,
}

impl SimulatedServerRequestFactory {
    /// Create a factory with no default overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory whose defaults override the built-in baseline.
    pub fn with_defaults(defaults: Environment) -> Self {
        Self {
            defaults: Arc::new(defaults),
            limits: UploadLimits::default(),
        }
    }

    /// Create a factory from loaded configuration.
    pub fn from_config(config: &FactoryConfig) -> Self {
        Self {
            defaults: Arc::new(config.default_server_params.clone()),
            limits: config.upload_limits,
        }
    }

    /// Set the limits applied to uploaded files.
    pub fn upload_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn defaults(&self) -> &Environment {
        &self.defaults
    }

    /// Convert any `http::Request` whose body converts into `Bytes`.
    pub fn convert<B>(&self, request: http::Request<B>) -> Result<ServerRequest>
    where
        B: Into<bytes::Bytes>,
    {
        self.convert_to_server_request(request.into())
    }

    fn query_params(request: &Request) -> ParamList {
        match request.uri().query() {
            Some(query) if !query.is_empty() => parse_query_string(query),
            _ => ParamList::new(),
        }
    }
}

impl ServerRequestFactory for SimulatedServerRequestFactory {
    fn convert_to_server_request(&self, request: Request) -> Result<ServerRequest> {
        let parsed = parse_body(&request, &self.limits).inspect_err(|e| {
            tracing::debug!(error = %e, "convert: body parsing failed");
        })?;

        let environment = synthesize(&self.defaults, &request).inspect_err(|e| {
            tracing::debug!(error = %e, "convert: environment synthesis failed");
        })?;

        let query_params = Self::query_params(&request);
        let cookies = parse_cookies(request.header("cookie"));

        let (method, uri, headers, body, version) = request.into_parts();

        Ok(ServerRequest::new(
            environment,
            parsed.files,
            uri,
            method,
            body,
            headers,
            cookies,
            query_params,
            parsed.fields,
            version,
        ))
    }
}
