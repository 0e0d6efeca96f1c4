//! Middleware chain seams
//!
//! A request passes through every registered [`Middleware`] in order
//! before reaching its route handler. Middleware mutate the request or
//! response in place and decide whether the chain continues. Failures
//! anywhere in the chain are routed to the app's [`ErrorHandler`].

use crate::http::{Request, Response};
use crate::{Result, ServerError};
use async_trait::async_trait;

pub mod body_parser;
pub mod error_reporter;
pub mod pass_through;


pub use body_parser::BodyParser;
pub use error_reporter::ErrorReporter;
pub use pass_through::PassThrough;

/// Outcome of one middleware invocation
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    /// Continue to the next middleware or the route handler
    Next,
    /// The response is complete, stop the chain
    Halt,
}

/// A function in the request-handling chain
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn call(&self, request: &mut Request, response: &mut Response) -> Result<Flow>;
}

/// Receives errors raised by middleware or route handlers
///
/// The handler gets a fresh response; anything the failed handler wrote
/// has already been discarded.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(&self, error: &ServerError, request: &Request, response: &mut Response);
}
