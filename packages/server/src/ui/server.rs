//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::{Router, routing::get, serve::Listener};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    connect_info::PeerAddr,
    error::ServerError,
    handler::{http::health_check, websocket::websocket_handler},
    signal::shutdown_signal,
    state::AppState,
    tls::{TlsFiles, TlsListener},
};

/// WebSocket chat relay
///
/// # Example
///
/// ```ignore
/// let server = Server::new(Arc::new(AppState::in_memory()));
/// server.run("127.0.0.1:8080", None).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Routes served by the relay
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/chat", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind `listen_address` and serve until Ctrl+C or SIGTERM.
    ///
    /// With `tls`, every connection is wrapped in TLS before it reaches the
    /// router.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound, the TLS credentials
    /// cannot be loaded, or serving fails.
    pub async fn run(self, listen_address: &str, tls: Option<TlsFiles>) -> Result<(), ServerError> {
        let listener =
            TcpListener::bind(listen_address)
                .await
                .map_err(|source| ServerError::Bind {
                    address: listen_address.to_string(),
                    source,
                })?;

        match tls {
            Some(files) => {
                let acceptor = files.acceptor()?;
                tracing::info!(
                    "Loaded TLS credentials from {} and {}",
                    files.cert_path.display(),
                    files.key_path.display()
                );
                let listener = TlsListener::new(listener, acceptor)?;
                tracing::info!("Connect to: wss://{}/chat", listener.local_addr()?);
                self.serve_tls_with_shutdown(listener, shutdown_signal())
                    .await
            }
            None => {
                tracing::info!("Connect to: ws://{}/chat", listener.local_addr()?);
                self.serve_with_shutdown(listener, shutdown_signal()).await
            }
        }
    }

    /// Serve plain `ws://` on an already bound listener until `shutdown`
    /// resolves.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        announce(listener.local_addr()?);

        let app = self.router().into_make_service_with_connect_info::<PeerAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve `wss://` through `listener` until `shutdown` resolves.
    pub async fn serve_tls_with_shutdown<F>(
        self,
        listener: TlsListener,
        shutdown: F,
    ) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        announce(listener.local_addr()?);

        let app = self.router().into_make_service_with_connect_info::<PeerAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn announce(local_addr: SocketAddr) {
    tracing::info!("Chat relay listening on {}", local_addr);
    tracing::info!("Press Ctrl+C to shutdown gracefully");
}
