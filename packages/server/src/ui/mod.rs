//! UI layer: the network-facing relay server.

mod connect_info;
mod dispatcher;
mod error;
mod handler;
mod server;
mod session;
mod signal;
pub mod state;
mod tls;

pub use connect_info::PeerAddr;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::ServerError;
pub use handler::websocket::accept_connection;
pub use server::Server;
pub use session::{ConnectionSession, InboundFrame, SessionState};
pub use tls::{TlsFiles, TlsListener};
