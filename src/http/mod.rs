//! HTTP request/response plumbing
//!
//! This module provides the transient per-exchange types: incremental
//! request reading on top of `httparse`, and an express-style response
//! builder that encodes to chunked or content-length framed wire bytes.

pub mod request;
pub mod response;

#[cfg(test)]
mod tests;

pub use request::{ParsedBody, Request};
pub use response::Response;
