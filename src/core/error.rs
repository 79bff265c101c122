//! Core error types.

use std::fmt;

/// Errors raised while converting a client request into a server request.
#[derive(Debug)]
pub enum Error {
    /// Decoded Basic credentials did not split into exactly `user:password`.
    MalformedBasicCredentials {
        parts: usize,
    },

    /// Basic credentials payload is not valid base64.
    InvalidBasicEncoding(String),

    /// Authorization header uses a scheme other than Basic or Bearer.
    UnsupportedAuthScheme(String),

    /// A multipart part could not be split into headers and body.
    MalformedMultipartPart {
        index: usize,
        reason: String,
    },

    /// I/O error while buffering an uploaded file.
    Io(std::io::Error),
}

impl Error {
    /// Whether the error stems from unusable Basic credentials.
    pub fn is_malformed_credentials(&self) -> bool {
        matches!(
            self,
            Error::MalformedBasicCredentials { .. } | Error::InvalidBasicEncoding(_)
        )
    }

    pub(crate) fn multipart(index: usize, reason: impl Into<String>) -> Self {
        Error::MalformedMultipartPart {
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedBasicCredentials { parts } => write!(
                f,
                "expected basic auth header to have base64 encoded username:password, got {} part(s)",
                parts
            ),
            Error::InvalidBasicEncoding(msg) => {
                write!(f, "basic auth header is not valid base64: {}", msg)
            }
            Error::UnsupportedAuthScheme(scheme) => {
                write!(f, "authorization scheme not supported: {}", scheme)
            }
            Error::MalformedMultipartPart { index, reason } => {
                write!(f, "malformed multipart part #{}: {}", index, reason)
            }
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
