//! Integration tests for server_request
//!
//! These tests drive the public factory API end to end: an `http::Request`
//! goes in, a `ServerRequest` comes out.
//!
//! Run with: cargo test --test integration


mod authorization;
mod config;
mod environment;
mod multipart;
