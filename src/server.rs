use crate::app::App;
use crate::config::ServerConfig;
use crate::http::{Request, Response};
use crate::{Result, ServerError};

use http::StatusCode;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::{signal, time::timeout};
use tracing::{Instrument, error, info, warn};

/// The HTTP test server
///
/// Accepts connections and serves one HTTP exchange per connection:
/// read a request, dispatch it through the [`App`], write the encoded
/// response, close. Connections beyond the configured limit are rejected.
pub struct Server {
    config: ServerConfig,
    app: Arc<App>,
    shutdown_signal: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl Server {
    /// Creates a new server for the given configuration and application
    pub fn new(config: ServerConfig, app: App) -> Self {
        let (shutdown_signal, _) = tokio::sync::broadcast::channel(1);
        Self {
            config,
            app: Arc::new(app),
            shutdown_signal: Arc::new(shutdown_signal),
        }
    }

    /// Starts the server and listens for connections
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;

        info!(address = %self.config.bind_addr, "HTTP test server listening");

        let connection_count = Arc::new(AtomicUsize::new(0));
        let mut shutdown_rx = self.shutdown_signal.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            let current_count = connection_count.load(Ordering::SeqCst);
                            if current_count >= self.config.max_connections {
                                warn!(%addr, current = current_count, limit = self.config.max_connections, "Connection rejected: limit reached");
                                continue;
                            }

                            connection_count.fetch_add(1, Ordering::SeqCst);
                            let new_count = connection_count.load(Ordering::SeqCst);
                            info!(%addr, current = new_count, "Accepted connection");

                            let config = self.config.clone();
                            let app = self.app.clone();
                            let connection_count = connection_count.clone();
                            let span = tracing::info_span!("connection", %addr, current = new_count);
                            tokio::spawn(async move {
                                if let Err(e) = Self::handle_connection(stream, addr, config, app).instrument(span).await {
                                    error!(%addr, error = %e, "Error handling connection");
                                }
                                let final_count = connection_count.fetch_sub(1, Ordering::SeqCst) - 1;
                                info!(%addr, current = final_count, "Connection closed");
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("Received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        info!("HTTP test server stopped");
        Ok(())
    }

    /// Handles a single connection: one request, one response, close
    async fn handle_connection(
        mut stream: TcpStream,
        addr: SocketAddr,
        config: ServerConfig,
        app: Arc<App>,
    ) -> Result<()> {
        let read_result = timeout(
            config.read_timeout,
            Request::read_from(&mut stream, config.buffer_size),
        )
        .await;

        let mut request = match read_result {
            Ok(Ok(Some(request))) => request,
            Ok(Ok(None)) => {
                info!(%addr, "Client closed connection");
                return Ok(());
            }
            Ok(Err(e @ ServerError::Io(_))) => {
                return Err(e);
            }
            Ok(Err(e)) => {
                warn!(%addr, error = %e, "Rejecting malformed request");
                let mut response = Response::new();
                response.send(StatusCode::BAD_REQUEST, "Bad Request");
                stream.write_all(&response.encode()).await?;
                stream.shutdown().await?;
                return Ok(());
            }
            Err(_) => {
                warn!(%addr, "Read timeout");
                return Ok(());
            }
        };

        info!(%addr, method = %request.method, path = %request.path, "Received request");

        let response = app.dispatch(&mut request).await;
        let wire = response.encode();

        match timeout(config.write_timeout, stream.write_all(&wire)).await {
            Ok(Ok(())) => {
                stream.shutdown().await?;
                info!(%addr, status = response.status().as_u16(), size = wire.len(), "Wrote response");
            }
            Ok(Err(e)) => {
                return Err(e.into());
            }
            Err(_) => {
                warn!(%addr, "Write timeout");
            }
        }

        Ok(())
    }

    /// Returns a shutdown signal sender that can be used to stop the server
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }
}
