//! UseCase layer: one use case per client request kind plus disconnect
//! cleanup.

mod disconnect;
mod list_users;
mod login;
mod post_message;

pub use disconnect::DisconnectUseCase;
pub use list_users::ListUsersUseCase;
pub use login::LoginUseCase;
pub use post_message::PostMessageUseCase;
