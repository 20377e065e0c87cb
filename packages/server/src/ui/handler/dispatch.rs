//! Inbound event dispatcher.
//!
//! Parses one text frame and calls the matching use case. Failures are only
//! logged; nothing is sent back to the client.

use thiserror::Error;

use crate::{
    domain::{ConnectionId, MessageDraft, MessageId, ValueObjectError},
    infrastructure::dto::websocket::InboundEvent,
    ui::state::AppState,
    usecase::{DeleteScope, MessageActionError, SendMessageError, TypingError},
};

#[derive(Debug, Error)]
enum DispatchError {
    #[error(transparent)]
    Send(#[from] SendMessageError),

    #[error(transparent)]
    Action(#[from] MessageActionError),

    #[error(transparent)]
    Typing(#[from] TypingError),

    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),
}

impl DispatchError {
    fn is_not_registered(&self) -> bool {
        matches!(
            self,
            Self::Send(SendMessageError::NotRegistered(_))
                | Self::Action(MessageActionError::NotRegistered(_))
                | Self::Typing(TypingError::NotRegistered(_))
        )
    }
}

/// Handle one text frame received from `connection_id`
pub(crate) async fn dispatch_frame(state: &AppState, connection_id: &ConnectionId, frame: &str) {
    let event = match serde_json::from_str::<InboundEvent>(frame) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(
                "Ignoring unparseable frame from '{}': {}",
                connection_id.as_str(),
                e
            );
            return;
        }
    };

    let name = event.name();
    tracing::debug!("Received {} from '{}'", name, connection_id.as_str());

    if let Err(e) = handle_event(state, connection_id, event).await {
        if e.is_not_registered() {
            tracing::debug!(
                "Dropped {} from unregistered connection '{}'",
                name,
                connection_id.as_str()
            );
        } else {
            tracing::warn!(
                "Rejected {} from '{}': {}",
                name,
                connection_id.as_str(),
                e
            );
        }
    }
}

async fn handle_event(
    state: &AppState,
    connection_id: &ConnectionId,
    event: InboundEvent,
) -> Result<(), DispatchError> {
    match event {
        InboundEvent::JoinRoom(payload) => {
            state
                .join_room_usecase
                .execute(
                    connection_id.clone(),
                    payload.name.as_deref(),
                    payload.room.as_deref(),
                )
                .await;
        }
        InboundEvent::ChatMessage(payload) => {
            let draft = MessageDraft::try_from(payload)?;
            state
                .send_message_usecase
                .execute(connection_id.clone(), draft)
                .await?;
        }
        InboundEvent::Typing(payload) => {
            state
                .set_typing_usecase
                .execute(connection_id, payload.is_typing())
                .await?;
        }
        InboundEvent::SeenMessage(payload) => {
            let message_id = MessageId::new(payload.message_id)?;
            let original_sender = ConnectionId::new(payload.sender_id)?;
            state
                .mark_seen_usecase
                .execute(connection_id, message_id, &original_sender)
                .await?;
        }
        InboundEvent::EditMessage(payload) => {
            state
                .edit_message_usecase
                .execute(connection_id, MessageId::new(payload.id)?, payload.new_text)
                .await?;
        }
        InboundEvent::DeleteMessageEveryone(payload) => {
            state
                .delete_message_usecase
                .execute(
                    connection_id,
                    MessageId::new(payload.id)?,
                    DeleteScope::Everyone,
                )
                .await?;
        }
        InboundEvent::DeleteMessageMe(payload) => {
            state
                .delete_message_usecase
                .execute(connection_id, MessageId::new(payload.id)?, DeleteScope::Me)
                .await?;
        }
        InboundEvent::ReactMessage(payload) => {
            state
                .react_message_usecase
                .execute(connection_id, MessageId::new(payload.id)?, payload.emoji)
                .await?;
        }
    }

    Ok(())
}
