//! Outbound (client-side) HTTP request.

use std::borrow::Cow;

use bytes::Bytes;
use http::header::{self, HeaderName};
use http::{HeaderMap, Method, Uri, Version};

/// Header name constants for fast lookup.
mod header_names {
    use super::*;

    pub static AUTHORIZATION: HeaderName = header::AUTHORIZATION;
    pub static CONTENT_TYPE: HeaderName = header::CONTENT_TYPE;
}

/// HTTP request as a client builds it, before any server has seen it.
///
/// Note: Clone is intentionally not derived to prevent expensive copies.
/// Use references or move semantics instead.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    version: Version,
}

impl Request {
    /// Create a new request.
    #[inline]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            version: Version::HTTP_11,
        }
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the request body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    #[inline]
    pub fn body_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Get the HTTP version.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Set the HTTP version.
    #[inline]
    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Split into owned parts.
    pub fn into_parts(self) -> (Method, Uri, HeaderMap, Bytes, Version) {
        (self.method, self.uri, self.headers, self.body, self.version)
    }

    /// Get the first value of a header (case-insensitive name).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check whether a header is present.
    #[inline]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// All values of a header joined by ", ", or empty when absent.
    pub fn header_line(&self, name: &str) -> String {
        Self::join_values(&self.headers, name)
    }

    fn join_values<K: header::AsHeaderName>(headers: &HeaderMap, name: K) -> String {
        headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Get the Content-Type header line.
    #[inline]
    pub fn content_type(&self) -> String {
        Self::join_values(&self.headers, &header_names::CONTENT_TYPE)
    }

    /// Get the first Authorization header value.
    #[inline]
    pub fn authorization(&self) -> Option<Cow<'_, str>> {
        self.headers
            .get(&header_names::AUTHORIZATION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: Into<Bytes>,
{
    fn from(req: http::Request<B>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: body.into(),
            version: parts.version,
        }
    }
}
