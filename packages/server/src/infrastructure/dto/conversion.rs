//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ChatMessage, FileAttachment, MessageDraft, MessageId, MessageKind, Participant, Reactions,
    ReplySnapshot, ServerEvent, SystemNotice, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

const DEFAULT_FILE_NAME: &str = "file";
const DEFAULT_FILE_TYPE: &str = "application/octet-stream";

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::MessageType> for MessageKind {
    fn from(value: dto::MessageType) -> Self {
        match value {
            dto::MessageType::Text => Self::Text,
            dto::MessageType::File => Self::File,
            dto::MessageType::System => Self::System,
            dto::MessageType::Deleted => Self::Deleted,
        }
    }
}

impl TryFrom<dto::ChatMessagePayload> for MessageDraft {
    type Error = ValueObjectError;

    fn try_from(payload: dto::ChatMessagePayload) -> Result<Self, Self::Error> {
        let file = payload.file_data.map(|data| FileAttachment {
            name: payload
                .file_name
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            mime_type: payload
                .file_type
                .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
            data,
        });

        let reply_to = payload
            .reply_to_id
            .filter(|id| !id.is_empty())
            .map(|id| ReplySnapshot {
                id,
                text: payload.reply_to_text,
                user: payload.reply_to_user,
            });

        Ok(Self {
            id: MessageId::new(payload.id)?,
            kind: payload.r#type.into(),
            text: payload.text,
            file,
            reply_to,
        })
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<MessageKind> for dto::MessageType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => Self::Text,
            MessageKind::File => Self::File,
            MessageKind::System => Self::System,
            MessageKind::Deleted => Self::Deleted,
        }
    }
}

fn reactions_to_dto(reactions: &Reactions) -> std::collections::BTreeMap<String, String> {
    reactions
        .iter()
        .map(|(reactor, emoji)| (reactor.as_str().to_string(), emoji.as_str().to_string()))
        .collect()
}

impl From<&ChatMessage> for dto::MessageDto {
    fn from(model: &ChatMessage) -> Self {
        let (file_name, file_type, file_data) = match &model.file {
            Some(file) => (
                Some(file.name.clone()),
                Some(file.mime_type.clone()),
                Some(file.data.clone()),
            ),
            None => (None, None, None),
        };
        let (reply_to_id, reply_to_text, reply_to_user) = match &model.reply_to {
            Some(reply) => (Some(reply.id.clone()), reply.text.clone(), reply.user.clone()),
            None => (None, None, None),
        };

        Self {
            id: model.id.as_str().to_string(),
            room: model.room_id.as_str().to_string(),
            user: Some(model.sender_name.as_str().to_string()),
            sender_id: Some(model.sender_id.as_str().to_string()),
            r#type: model.kind.into(),
            text: model.text.clone(),
            file_name,
            file_type,
            file_data,
            timestamp: model.created_at.value(),
            reply_to_id,
            reply_to_text,
            reply_to_user,
            reactions: Some(reactions_to_dto(&model.reactions)),
            edited: Some(model.edited),
        }
    }
}

impl From<&SystemNotice> for dto::MessageDto {
    fn from(notice: &SystemNotice) -> Self {
        Self {
            id: notice.id.as_str().to_string(),
            room: notice.room_id.as_str().to_string(),
            user: None,
            sender_id: None,
            r#type: dto::MessageType::System,
            text: Some(notice.text.clone()),
            file_name: None,
            file_type: None,
            file_data: None,
            timestamp: notice.created_at.value(),
            reply_to_id: None,
            reply_to_text: None,
            reply_to_user: None,
            reactions: None,
            edited: None,
        }
    }
}

impl From<&Participant> for dto::RoomUserDto {
    fn from(model: &Participant) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            name: model.name.as_str().to_string(),
        }
    }
}

impl From<&ServerEvent> for dto::OutboundEvent {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::Message(message) => Self::Message(message.into()),
            ServerEvent::System(notice) => Self::Message(notice.into()),
            ServerEvent::ChatHistory(messages) => Self::ChatHistory(dto::ChatHistoryDto {
                messages: messages.iter().map(Into::into).collect(),
            }),
            ServerEvent::RoomUsers(participants) => Self::RoomUsers(dto::RoomUsersDto {
                users: participants.iter().map(Into::into).collect(),
            }),
            ServerEvent::Typing { user, is_typing } => Self::Typing(dto::TypingDto {
                user: user.as_str().to_string(),
                is_typing: *is_typing,
            }),
            ServerEvent::MessageSeen { message_id } => Self::MessageSeen(dto::MessageSeenDto {
                message_id: message_id.as_str().to_string(),
            }),
            ServerEvent::MessageEdited { id, new_text } => {
                Self::MessageEdited(dto::MessageEditedDto {
                    id: id.as_str().to_string(),
                    new_text: new_text.clone(),
                })
            }
            ServerEvent::MessageDeleted { id } => Self::MessageDeleted(dto::MessageIdDto {
                id: id.as_str().to_string(),
            }),
            ServerEvent::MessageDeletedForMe { id } => Self::MessageDeletedMe(dto::MessageIdDto {
                id: id.as_str().to_string(),
            }),
            ServerEvent::MessageReacted { id, reactions } => {
                Self::MessageReacted(dto::MessageReactedDto {
                    id: id.as_str().to_string(),
                    reactions: reactions_to_dto(reactions),
                })
            }
        }
    }
}
