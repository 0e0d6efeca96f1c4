use thiserror::Error;

/// Error types for the testsrv library
#[derive(Error, Debug)]
pub enum ServerError {
    /// Socket-level errors (bind, accept, read, write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Request head could not be parsed
    #[error("HTTP parsing error: {0}")]
    HttpParse(String),

    /// Request was syntactically valid but unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection closed before a full request arrived
    #[error("Incomplete request")]
    IncompleteRequest,

    /// Request body could not be decoded
    #[error("Body parsing error: {0}")]
    BodyParse(String),

    /// A route handler or middleware failed
    #[error("Handler error: {0}")]
    Handler(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for the testsrv library
pub type Result<T> = std::result::Result<T, ServerError>;

pub mod app;
pub mod config;
pub mod http;
pub mod middleware;
pub mod server;

// Re-export main types for convenience
pub use app::{App, Handler};
pub use config::ServerConfig;
pub use http::{ParsedBody, Request, Response};
pub use middleware::{BodyParser, ErrorHandler, ErrorReporter, Flow, Middleware, PassThrough};
pub use server::Server;
