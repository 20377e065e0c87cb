//! UseCase: メッセージ削除処理
//!
//! - `Everyone`: tombstone を保存し、ルームの全員に `message-deleted` を送る
//! - `Me`: 要求者本人にだけ `message-deleted-me` を返す（ストアは変更しない）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeleteMessageUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 全員から削除したメッセージが tombstone として残ることを保証
//! - 自分だけ削除が他の参加者に漏れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員から削除、自分だけ削除
//! - 異常系：存在しない ID、他人のメッセージ（所有者チェック有効時）、削除済みのメッセージ

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessageId, MessageRepository, RoomBroadcaster, ServerEvent,
};

use super::{
    error::MessageActionError,
    message_access::{ensure_sender, load_target},
};

/// 削除の範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    Everyone,
    Me,
}

/// メッセージ削除のユースケース
pub struct DeleteMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    repository: Arc<dyn MessageRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    require_sender_match: bool,
}

impl DeleteMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        repository: Arc<dyn MessageRepository>,
        broadcaster: Arc<RoomBroadcaster>,
        require_sender_match: bool,
    ) -> Self {
        Self {
            registry,
            repository,
            broadcaster,
            require_sender_match,
        }
    }

    pub async fn execute(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
        scope: DeleteScope,
    ) -> Result<(), MessageActionError> {
        match scope {
            DeleteScope::Everyone => self.delete_for_everyone(requester, message_id).await,
            DeleteScope::Me => self.delete_for_me(requester, message_id).await,
        }
    }

    async fn delete_for_everyone(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
    ) -> Result<(), MessageActionError> {
        let (participant, message) = load_target(
            self.registry.as_ref(),
            self.repository.as_ref(),
            requester,
            &message_id,
        )
        .await?;
        ensure_sender(self.require_sender_match, requester, &message)?;

        self.repository.mark_deleted(&message_id).await?;
        tracing::debug!(
            "Message '{}' deleted for everyone by '{}'",
            message_id.as_str(),
            requester.as_str()
        );

        self.broadcaster
            .broadcast_to_room(
                &participant.room_id,
                &ServerEvent::MessageDeleted { id: message_id },
            )
            .await;
        Ok(())
    }

    async fn delete_for_me(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
    ) -> Result<(), MessageActionError> {
        if self.registry.lookup(requester).await.is_none() {
            return Err(MessageActionError::NotRegistered(
                requester.as_str().to_string(),
            ));
        }

        self.broadcaster
            .unicast(requester, &ServerEvent::MessageDeletedForMe { id: message_id })
            .await;
        Ok(())
    }
}
