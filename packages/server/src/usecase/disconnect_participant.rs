//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断後に Registry から消え、同じルームの残りの参加者に退出通知と参加者一覧が届くことを保証
//! - join-room 前に切断した接続では何も通知されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）、未登録の接続の切断

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessagePusher, Participant, RoomBroadcaster, ServerEvent,
    SystemNotice, Timestamp,
};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            broadcaster,
            clock,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 切断した接続の ID
    ///
    /// # Returns
    ///
    /// 登録済みだった場合はその参加者、join-room 前なら `None`
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Participant> {
        // 1. 送信チャンネルを外す（以降この接続には何も送らない）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. Registry から削除
        let participant = self.registry.remove(connection_id).await?;
        tracing::info!(
            "'{}' ({}) left room '{}'",
            participant.name.as_str(),
            connection_id.as_str(),
            participant.room_id.as_str()
        );

        // 3. 切断時点のルームに退出通知と参加者一覧を送る
        let notice = SystemNotice::left(
            &participant.name,
            participant.room_id.clone(),
            Timestamp::new(self.clock.now_millis()),
        );
        self.broadcaster
            .broadcast_to_room(&participant.room_id, &ServerEvent::System(notice))
            .await;
        self.broadcaster
            .broadcast_room_users(&participant.room_id)
            .await;

        Some(participant)
    }
}
