//! UseCase layer.
//!
//! Each use case wires domain traits together for one client-visible
//! operation. The transport layer only parses frames and calls these.

pub mod connect_participant;
pub mod delete_message;
pub mod disconnect_participant;
pub mod edit_message;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod mark_seen;
mod message_access;
pub mod react_message;
pub mod send_message;
pub mod set_typing;

pub use connect_participant::ConnectParticipantUseCase;
pub use delete_message::{DeleteMessageUseCase, DeleteScope};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use edit_message::EditMessageUseCase;
pub use error::{GetRoomDetailError, MessageActionError, SendMessageError, TypingError};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinRoomUseCase, JoinedRoom};
pub use mark_seen::MarkSeenUseCase;
pub use react_message::ReactMessageUseCase;
pub use send_message::{SendMessageUseCase, validate_draft};
pub use set_typing::SetTypingUseCase;
