//! Domain layer for the messaging relay.
//!
//! This module contains business rules and the interfaces (traits) the
//! use cases depend on. It is independent of data transfer objects (DTOs)
//! and infrastructure concerns.

pub mod broadcaster;
pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use broadcaster::RoomBroadcaster;
pub use entity::{
    ChatMessage, FileAttachment, MessageDraft, MessageKind, Participant, Reactions, ReplySnapshot,
    Room, SystemNotice,
};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::ServerEvent;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{ConnectionRegistry, Registration};
pub use repository::{MessageRepository, SortOrder};
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DEFAULT_DISPLAY_NAME, DEFAULT_ROOM_ID, DisplayName, Emoji,
    MessageId, RoomId, Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockMessageRepository;
