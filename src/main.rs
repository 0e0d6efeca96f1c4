use testsrv::{
    App, BodyParser, ErrorReporter, Handler, PassThrough, Request, Response, Server, ServerConfig,
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, WrapErr};
use http::header::{CONTENT_TYPE, TRANSFER_ENCODING};
use http::{HeaderValue, StatusCode};
use tracing::info;

/// `GET /` handler: writes `test` twice as a chunked `text/html` response
struct RootHandler;

#[async_trait]
impl Handler for RootHandler {
    async fn handle(&self, _request: &mut Request, response: &mut Response) -> testsrv::Result<()> {
        info!("get called");

        response.write_head(StatusCode::OK);
        response.set_header(CONTENT_TYPE, HeaderValue::from_static("text/html"));
        response.set_header(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        response.write("test");
        response.write("test");
        response.end();

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging; errors and request detail go to stderr
    tracing_subscriber::fmt()
        .with_env_filter("testsrv=info")
        .with_writer(std::io::stderr)
        .init();

    let app = App::new()
        .with(PassThrough)
        .with(BodyParser::new())
        .get("/", RootHandler)
        .on_error(ErrorReporter);

    let server = Server::new(ServerConfig::default(), app);
    server.run().await.wrap_err("Failed to run HTTP test server")?;

    Ok(())
}
