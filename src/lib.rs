//! server_request - Simulated server-side view of client-built HTTP requests.
//!
//! Converts an outbound HTTP request (as a client constructs it) into the
//! request a server would have observed, synthesizing what a server normally
//! provides out-of-band: a `$_SERVER`-style environment, the parsed form
//! body, uploaded files and query parameters.
//!
//! # Features
//!
//! - **Environment synthesis**: host, port, HTTPS and request URI derived from the URI
//! - **Authorization**: Basic credentials decoded, Bearer tokens passed through
//! - **Form bodies**: urlencoded and multipart/form-data decoding
//! - **Uploads**: file parts buffered in spooled temporary streams
//!
//! # Example
//!
//! ```rust,ignore
//! use server_request::{ServerRequestFactory, SimulatedServerRequestFactory};
//!
//! let factory = SimulatedServerRequestFactory::new();
//! let req = http::Request::post("https://example.com/login")
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("user=alice")?;
//! let server_req = factory.convert(req)?;
//! assert_eq!(server_req.parsed_field("user"), Some("alice"));
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default `HTTP_USER_AGENT` of a synthesized environment.
pub const USER_AGENT: &str = concat!("server_request/", env!("CARGO_PKG_VERSION"));

pub mod config;
pub mod core;
pub mod factory;
pub mod logging;
pub mod request;
pub mod types;

// Re-exports for convenience
pub use crate::config::Config;
pub use crate::core::{Error, Request, Result, ServerRequest};
pub use crate::factory::{ServerRequestFactory, SimulatedServerRequestFactory};
pub use crate::types::{Environment, ServerValue, UploadedFile};
