//! UseCase: 入力中表示

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, RoomBroadcaster, ServerEvent};

use super::error::TypingError;

pub struct SetTypingUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl SetTypingUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcaster: Arc<RoomBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// 本人を除くルームの全員に入力中かどうかを知らせる
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        is_typing: bool,
    ) -> Result<(), TypingError> {
        let participant = self
            .registry
            .lookup(connection_id)
            .await
            .ok_or_else(|| TypingError::NotRegistered(connection_id.as_str().to_string()))?;

        self.broadcaster
            .broadcast_to_room_except(
                &participant.room_id,
                connection_id,
                &ServerEvent::Typing {
                    user: participant.name,
                    is_typing,
                },
            )
            .await;
        Ok(())
    }
}
