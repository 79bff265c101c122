//! Core types for request conversion.
//!
//! - [`Request`] - outbound HTTP request, as a client builds it
//! - [`ServerRequest`] - inbound HTTP request, as a server would observe it
//! - [`Error`] - conversion errors
//!
//! # Example
//!
//! ```rust,ignore
//! use server_request::core::Request;
//!
//! let req = Request::from(http::Request::get("/").body(bytes::Bytes::new())?);
//! assert_eq!(req.header_line("accept"), "");
//! ```

mod error;
mod request;
mod server_request;

pub use error::{Error, Result};
pub use request::Request;
pub use server_request::ServerRequest;
