//! UseCase: メッセージ編集処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EditMessageUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 編集後の読み取りが新しい本文を返し、ルームの全員に `message-edited` が届くことを保証
//! - 所有者チェック（require_sender_match）が有効なとき他人のメッセージを編集できないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：本文の編集
//! - 異常系：存在しない ID、別ルームのメッセージ、空の本文、他人のメッセージ
//! - 競合：確認と書き込みの間に削除されたメッセージ

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessageId, MessageRepository, RoomBroadcaster, ServerEvent,
};

use super::{
    error::MessageActionError,
    message_access::{ensure_sender, load_target},
};

/// メッセージ編集のユースケース
pub struct EditMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    repository: Arc<dyn MessageRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    require_sender_match: bool,
    max_text_chars: usize,
}

impl EditMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        repository: Arc<dyn MessageRepository>,
        broadcaster: Arc<RoomBroadcaster>,
        require_sender_match: bool,
        max_text_chars: usize,
    ) -> Self {
        Self {
            registry,
            repository,
            broadcaster,
            require_sender_match,
            max_text_chars,
        }
    }

    /// 本文を置き換えてルームに通知する
    pub async fn execute(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
        new_text: String,
    ) -> Result<(), MessageActionError> {
        if new_text.trim().is_empty() {
            return Err(MessageActionError::InvalidInput(
                "edited text is empty".to_string(),
            ));
        }
        if new_text.chars().count() > self.max_text_chars {
            return Err(MessageActionError::InvalidInput(format!(
                "edited text exceeds {} characters",
                self.max_text_chars
            )));
        }

        let (participant, message) = load_target(
            self.registry.as_ref(),
            self.repository.as_ref(),
            requester,
            &message_id,
        )
        .await?;
        ensure_sender(self.require_sender_match, requester, &message)?;

        self.repository
            .update_text(&message_id, new_text.clone())
            .await?;
        tracing::debug!(
            "Message '{}' edited by '{}'",
            message_id.as_str(),
            requester.as_str()
        );

        self.broadcaster
            .broadcast_to_room(
                &participant.room_id,
                &ServerEvent::MessageEdited {
                    id: message_id,
                    new_text,
                },
            )
            .await;

        Ok(())
    }
}
