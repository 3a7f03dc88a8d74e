//! Peer address made available to handlers as `ConnectInfo<PeerAddr>`.
//!
//! axum only knows how to pull a `SocketAddr` out of a plain
//! `TcpListener`, so both listeners the relay serves on report the remote
//! address through this type.

use std::net::SocketAddr;

use axum::{extract::connect_info::Connected, serve::IncomingStream};
use tokio::net::TcpListener;

use super::tls::TlsListener;

/// Remote address of an accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAddr(pub SocketAddr);

impl Connected<IncomingStream<'_, TcpListener>> for PeerAddr {
    fn connect_info(stream: IncomingStream<'_, TcpListener>) -> Self {
        Self(*stream.remote_addr())
    }
}

impl Connected<IncomingStream<'_, TlsListener>> for PeerAddr {
    fn connect_info(stream: IncomingStream<'_, TlsListener>) -> Self {
        Self(*stream.remote_addr())
    }
}
