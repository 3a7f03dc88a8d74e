//! Kaiwa chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kaiwa-server
//! cargo run --bin kaiwa-server -- --listen 0.0.0.0:3000 --log-level debug
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use kaiwa_server::{
    domain::SessionRegistry,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemorySessionRegistry},
    ui::{Server, TlsFiles, state::AppState},
};
use kaiwa_shared::{
    config::{Config, DEFAULT_CONFIG_FILE},
    logger::setup_logger,
};

#[derive(Parser, Debug)]
#[command(name = "kaiwa-server", version)]
#[command(about = "Real-time WebSocket chat relay", long_about = None)]
struct Args {
    /// Address to listen on in format of 'host:port' (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Path of the config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Default log level; RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// TLS certificate chain (PEM); TLS is enabled when it and the key exist
    #[arg(long, default_value = "chat.crt")]
    tls_cert: PathBuf,

    /// TLS private key (PEM)
    #[arg(long, default_value = "chat.key")]
    tls_key: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    let _log_guard = setup_logger(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_BIN_NAME"),
        &args.log_level,
        args.log_file.as_deref(),
    );

    // Resolve the listen address and persist it for the next run
    let mut config = Config::read(&args.config).unwrap_or_else(|e| {
        tracing::debug!("{}", e);
        Config::default()
    });
    let listen_address = config.resolve_listen_address(args.listen.as_deref());
    config.listen_address = Some(listen_address.clone());
    if let Err(e) = config.write(&args.config) {
        tracing::error!("{}", e);
    }

    let tls = TlsFiles::detect(&args.tls_cert, &args.tls_key);
    tracing::info!(
        tls = tls.is_some(),
        "Starting server at {}",
        listen_address
    );

    // Initialize dependencies in order:
    // 1. Registry (in-memory, the single source of truth for who is online)
    // 2. MessagePusher (fans out over the registry)
    // 3. UseCases + Server
    let registry: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new(registry.clone()));
    let server = Server::new(Arc::new(AppState::new(registry, message_pusher)));
    if let Err(e) = server.run(&listen_address, tls).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
