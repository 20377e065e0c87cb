//! UseCase: 既読通知処理
//!
//! 既読は保存せず、元の送信者の接続だけに `message-seen` を届ける。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - MarkSeenUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 既読通知が元の送信者以外に漏れないことを保証
//! - 別ルームの接続には既読通知を送れないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームの送信者への通知
//! - 異常系：未登録の要求者、切断済み・別ルームの送信者

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessageId, RoomBroadcaster, ServerEvent};

use super::error::MessageActionError;

pub struct MarkSeenUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl MarkSeenUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcaster: Arc<RoomBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// # Arguments
    ///
    /// * `requester` - メッセージを読んだ接続
    /// * `message_id` - 読まれたメッセージ
    /// * `original_sender` - メッセージを送った接続（クライアントが `senderId` として送ってくる）
    pub async fn execute(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
        original_sender: &ConnectionId,
    ) -> Result<(), MessageActionError> {
        let reader = self
            .registry
            .lookup(requester)
            .await
            .ok_or_else(|| MessageActionError::NotRegistered(requester.as_str().to_string()))?;

        let in_same_room = self
            .registry
            .lookup(original_sender)
            .await
            .is_some_and(|sender| sender.room_id == reader.room_id);
        if !in_same_room {
            return Err(MessageActionError::RecipientUnavailable(
                original_sender.as_str().to_string(),
            ));
        }

        self.broadcaster
            .unicast(original_sender, &ServerEvent::MessageSeen { message_id })
            .await;
        Ok(())
    }
}
