use super::ErrorHandler;
use crate::ServerError;
use crate::http::{Request, Response};
use async_trait::async_trait;
use http::StatusCode;
use tracing::error;

/// The error-handling middleware
///
/// Logs the failure with request context and answers the client with a
/// fixed 500 response.
pub struct ErrorReporter;

#[async_trait]
impl ErrorHandler for ErrorReporter {
    async fn handle(&self, err: &ServerError, request: &Request, response: &mut Response) {
        error!(method = %request.method, path = %request.path, error = %err, "Request failed");
        response.send(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
    }
}
