//! Optional TLS transport.
//!
//! When both credential files are present the relay serves `wss://`. TLS
//! handshakes run in their own tasks so one slow client cannot hold up the
//! accept loop; a failed handshake is logged and the connection dropped.

use std::{
    fs, io,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use axum::serve::Listener;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::mpsc,
};
use tokio_rustls::{TlsAcceptor, server::TlsStream};

use super::error::ServerError;

/// Time allowed for a TLS handshake to finish.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Handshakes finished but not yet picked up by the server.
const PENDING_CONNECTIONS: usize = 64;

/// Certificate chain and private key in PEM format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl TlsFiles {
    /// Return the pair only if both files exist.
    pub fn detect(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Option<Self> {
        let files = Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        };
        (files.cert_path.is_file() && files.key_path.is_file()).then_some(files)
    }

    /// Load and validate the credentials.
    pub fn acceptor(&self) -> Result<TlsAcceptor, ServerError> {
        let cert_pem = read(&self.cert_path)?;
        let key_pem = read(&self.key_path)?;

        let certs = rustls_pemfile::certs(&mut &cert_pem[..])
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ServerError::TlsConfig(format!("failed to parse certificates: {e}")))?;
        if certs.is_empty() {
            return Err(ServerError::TlsConfig(format!(
                "no certificate found in '{}'",
                self.cert_path.display()
            )));
        }

        let key = rustls_pemfile::private_key(&mut &key_pem[..])
            .map_err(|e| ServerError::TlsConfig(format!("failed to parse private key: {e}")))?
            .ok_or_else(|| ServerError::TlsConfig("no private key found".to_string()))?;

        let mut config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| ServerError::TlsConfig(e.to_string()))?;
        config.alpn_protocols = vec![b"http/1.1".to_vec()];

        Ok(TlsAcceptor::from(Arc::new(config)))
    }
}

fn read(path: &Path) -> Result<Vec<u8>, ServerError> {
    fs::read(path).map_err(|source| ServerError::TlsFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Listener that yields TLS streams whose handshake already completed
pub struct TlsListener {
    local_addr: SocketAddr,
    ready: mpsc::Receiver<(TlsStream<TcpStream>, SocketAddr)>,
}

impl TlsListener {
    /// Start accepting on `listener`, handshaking each connection with
    /// `acceptor` in the background.
    pub fn new(listener: TcpListener, acceptor: TlsAcceptor) -> io::Result<Self> {
        let local_addr = listener.local_addr()?;
        let (tx, ready) = mpsc::channel(PENDING_CONNECTIONS);
        tokio::spawn(accept_loop(listener, acceptor, tx));
        Ok(Self { local_addr, ready })
    }
}

async fn accept_loop(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    ready: mpsc::Sender<(TlsStream<TcpStream>, SocketAddr)>,
) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!("Failed to accept TCP connection: {}", e);
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        if ready.is_closed() {
            break;
        }

        let acceptor = acceptor.clone();
        let ready = ready.clone();
        tokio::spawn(async move {
            match tokio::time::timeout(HANDSHAKE_TIMEOUT, acceptor.accept(stream)).await {
                Ok(Ok(tls)) => {
                    // The server is shutting down if nobody is receiving.
                    let _ = ready.send((tls, addr)).await;
                }
                Ok(Err(e)) => tracing::warn!(addr = %addr, "TLS handshake failed: {}", e),
                Err(_) => tracing::warn!(addr = %addr, "TLS handshake timed out"),
            }
        });
    }
}

impl Listener for TlsListener {
    type Io = TlsStream<TcpStream>;
    type Addr = SocketAddr;

    async fn accept(&mut self) -> (Self::Io, Self::Addr) {
        match self.ready.recv().await {
            Some(accepted) => accepted,
            // The accept loop only stops once this listener is dropped.
            None => std::future::pending().await,
        }
    }

    fn local_addr(&self) -> io::Result<Self::Addr> {
        Ok(self.local_addr)
    }
}
