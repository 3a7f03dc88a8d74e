//! Infrastructure layer: concrete implementations of the domain seams and
//! the wire format.

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod transport;
