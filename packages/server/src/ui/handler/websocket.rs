//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::StreamExt;

use crate::{
    domain::{ConnectionHandle, SessionToken},
    ui::{
        connect_info::PeerAddr,
        session::{ConnectionSession, InboundFrame},
        state::AppState,
    },
};

impl From<Message> for InboundFrame {
    fn from(message: Message) -> Self {
        match message {
            Message::Text(text) => Self::Text(text.as_str().to_owned()),
            Message::Close(_) => Self::Close,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => Self::Other,
        }
    }
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(PeerAddr(addr)): ConnectInfo<PeerAddr>,
) -> impl IntoResponse {
    ws.on_failed_upgrade(move |e| {
        tracing::error!(addr = %addr, "Websocket upgrade connection: {}", e);
    })
    .on_upgrade(move |socket| accept_connection(socket, state, Some(addr)))
}

/// Run one upgraded connection until it closes.
///
/// A fresh session token is generated here; it is only revealed to the
/// client by a successful login.
pub async fn accept_connection(socket: WebSocket, state: Arc<AppState>, addr: Option<SocketAddr>) {
    let token = SessionToken::generate();
    tracing::info!(token = %token, addr = ?addr, "Received connection");

    let (sender, receiver) = socket.split();
    let connection = ConnectionHandle::new(sender);
    let inbound = receiver.map(|frame| frame.map(InboundFrame::from));

    ConnectionSession::new(state, token, connection, addr)
        .run(inbound)
        .await;
}
