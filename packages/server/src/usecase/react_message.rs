//! UseCase: リアクション処理
//!
//! リアクションした人は登録済みの表示名で識別する（クライアントの自己申告は使わない）。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ReactMessageUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 同じ人のリアクションは上書きされ、常に 1 つだけ残ることを保証
//! - 更新後のリアクション全体がルームの全員に届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：リアクションの追加と上書き、複数人のリアクション
//! - 異常系：存在しないメッセージ、空の絵文字
//! - 競合：確認と書き込みの間に削除されたメッセージ

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, Emoji, MessageId, MessageRepository, Reactions,
    RoomBroadcaster, ServerEvent,
};

use super::{error::MessageActionError, message_access::load_target};

pub struct ReactMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    repository: Arc<dyn MessageRepository>,
    broadcaster: Arc<RoomBroadcaster>,
}

impl ReactMessageUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        repository: Arc<dyn MessageRepository>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            registry,
            repository,
            broadcaster,
        }
    }

    /// リアクションを設定し、更新後のリアクション全体を返す
    pub async fn execute(
        &self,
        requester: &ConnectionId,
        message_id: MessageId,
        emoji: String,
    ) -> Result<Reactions, MessageActionError> {
        let emoji = Emoji::new(emoji)?;
        let (participant, _) = load_target(
            self.registry.as_ref(),
            self.repository.as_ref(),
            requester,
            &message_id,
        )
        .await?;

        let reactions = self
            .repository
            .set_reaction(&message_id, participant.name.clone(), emoji)
            .await?;

        self.broadcaster
            .broadcast_to_room(
                &participant.room_id,
                &ServerEvent::MessageReacted {
                    id: message_id,
                    reactions: reactions.clone(),
                },
            )
            .await;

        Ok(reactions)
    }
}
