//! Domain layer: the relay's value objects, entities and the seams
//! (`SessionRegistry`, `MessagePusher`, `OutboundSink`) that the
//! infrastructure layer implements.

pub mod entity;
pub mod error;
pub mod message;
pub mod message_pusher;
pub mod repository;
pub mod transport;
pub mod value_object;

pub use entity::{ChatEvent, ConnectedIdentity};
pub use error::{
    DisplayNameError, LoginError, MessageBodyError, MessagePushError, PostError, RosterError,
};
pub use message::ServerMessage;
pub use message_pusher::MessagePusher;
pub use repository::SessionRegistry;
pub use transport::{ConnectionHandle, OutboundSink, ReservedWrite};
pub use value_object::{
    DisplayName, MAX_DISPLAY_NAME_CHARS, MAX_MESSAGE_BODY_CHARS, MessageBody, SessionToken,
};
