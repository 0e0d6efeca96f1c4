use crate::http::{Request, Response};
use crate::middleware::{ErrorHandler, Flow, Middleware};
use crate::{Result, ServerError};
use async_trait::async_trait;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};
use tracing::error;

/// A route handler
///
/// Handlers build the response in place and return `Err` to hand the
/// exchange to the app's error handler.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: &mut Request, response: &mut Response) -> Result<()>;
}

struct Route {
    method: Method,
    path: String,
    handler: Box<dyn Handler>,
}

/// The application: middleware chain, route table, and error handler
///
/// Dispatch order is middleware in registration order, then the first
/// route matching method and exact path. Any error along the way reaches
/// the registered [`ErrorHandler`].
///
/// # Examples
///
/// ```no_run
/// use testsrv::{App, BodyParser, ErrorReporter, PassThrough};
///
/// let app = App::new()
///     .with(PassThrough)
///     .with(BodyParser::new())
///     .on_error(ErrorReporter);
/// ```
pub struct App {
    middleware: Vec<Box<dyn Middleware>>,
    routes: Vec<Route>,
    error_handler: Option<Box<dyn ErrorHandler>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
            routes: Vec::new(),
            error_handler: None,
        }
    }

    /// Appends a middleware to the chain
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Registers a route for the given method and exact path
    pub fn route(mut self, method: Method, path: &str, handler: impl Handler + 'static) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
        self
    }

    /// Registers a GET route
    pub fn get(self, path: &str, handler: impl Handler + 'static) -> Self {
        self.route(Method::GET, path, handler)
    }

    /// Registers the error handler
    pub fn on_error(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    /// Runs one request through the chain and produces its response
    pub async fn dispatch(&self, request: &mut Request) -> Response {
        let mut response = Response::new();

        for middleware in &self.middleware {
            match middleware.call(request, &mut response).await {
                Ok(Flow::Next) => {}
                Ok(Flow::Halt) => return response,
                Err(e) => {
                    self.fail(e, request, &mut response).await;
                    return response;
                }
            }
        }

        let route = self
            .routes
            .iter()
            .find(|r| r.method == request.method && r.path == request.path);

        match route {
            Some(route) => {
                if let Err(e) = route.handler.handle(request, &mut response).await {
                    self.fail(e, request, &mut response).await;
                }
            }
            None => {
                response.set_header(CONTENT_TYPE, HeaderValue::from_static("text/html"));
                response.send(
                    StatusCode::NOT_FOUND,
                    format!("Cannot {} {}", request.method, request.path),
                );
            }
        }

        response
    }

    async fn fail(&self, err: ServerError, request: &Request, response: &mut Response) {
        // Discard whatever the failed handler wrote
        *response = Response::new();

        match &self.error_handler {
            Some(handler) => handler.handle(&err, request, response).await,
            None => {
                error!(method = %request.method, path = %request.path, error = %err, "Request failed");
                response.send(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
