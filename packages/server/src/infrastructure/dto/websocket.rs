//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame shaped as
//! `{"event": "<name>", "data": { ... }}` with camelCase fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ========================================
// Inbound (client → server)
// ========================================

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum InboundEvent {
    JoinRoom(JoinRoomPayload),
    ChatMessage(ChatMessagePayload),
    Typing(TypingPayload),
    SeenMessage(SeenMessagePayload),
    EditMessage(EditMessagePayload),
    #[serde(alias = "delete-message")]
    DeleteMessageEveryone(MessageIdPayload),
    DeleteMessageMe(MessageIdPayload),
    ReactMessage(ReactMessagePayload),
}

impl InboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => "join-room",
            Self::ChatMessage(_) => "chat-message",
            Self::Typing(_) => "typing",
            Self::SeenMessage(_) => "seen-message",
            Self::EditMessage(_) => "edit-message",
            Self::DeleteMessageEveryone(_) => "delete-message-everyone",
            Self::DeleteMessageMe(_) => "delete-message-me",
            Self::ReactMessage(_) => "react-message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct JoinRoomPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

/// Message type on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    File,
    System,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagePayload {
    pub id: String,
    #[serde(rename = "type", default)]
    pub r#type: MessageType,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub file_data: Option<String>,
    #[serde(default)]
    pub reply_to_id: Option<String>,
    #[serde(default)]
    pub reply_to_text: Option<String>,
    #[serde(default)]
    pub reply_to_user: Option<String>,
}

/// Typing state, either `{"isTyping": true}` or a bare boolean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypingPayload {
    Flag(bool),
    #[serde(rename_all = "camelCase")]
    Object {
        is_typing: bool,
    },
}

impl TypingPayload {
    pub fn is_typing(&self) -> bool {
        match *self {
            Self::Flag(is_typing) | Self::Object { is_typing } => is_typing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenMessagePayload {
    pub message_id: String,
    pub sender_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMessagePayload {
    pub id: String,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageIdPayload {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReactMessagePayload {
    pub id: String,
    pub emoji: String,
    /// Accepted for compatibility; the registered display name is authoritative
    #[serde(default)]
    pub user: Option<String>,
}

// ========================================
// Outbound (server → client)
// ========================================

/// Events pushed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundEvent {
    Message(MessageDto),
    ChatHistory(ChatHistoryDto),
    RoomUsers(RoomUsersDto),
    Typing(TypingDto),
    MessageSeen(MessageSeenDto),
    MessageEdited(MessageEditedDto),
    MessageDeleted(MessageIdDto),
    MessageDeletedMe(MessageIdDto),
    MessageReacted(MessageReactedDto),
}

/// A stamped chat message or a system notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub room: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(rename = "type")]
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reactions: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryDto {
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUserDto {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUsersDto {
    pub users: Vec<RoomUserDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingDto {
    pub user: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSeenDto {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEditedDto {
    pub id: String,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageIdDto {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReactedDto {
    pub id: String,
    pub reactions: BTreeMap<String, String>,
}
