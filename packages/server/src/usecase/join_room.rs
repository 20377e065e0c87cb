//! UseCase: ルーム参加処理
//!
//! ## 状態遷移
//!
//! - 新規参加: Registry に登録 → 参加通知（ルーム全員）→ 履歴（本人のみ）→ 参加者一覧（ルーム全員）
//! - ルーム移動: 旧ルームに参加者一覧を再送 → 以降は新規参加と同じ
//! - 同じルームへの再参加: 参加通知は出さず、履歴と参加者一覧だけを送る
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 参加者一覧・参加通知がルームの外に漏れないことを保証
//! - 既定値（Anonymous / General）が登録前に適用されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加、ルーム移動、再参加
//! - エッジケース：名前・ルームが空、履歴の件数制限
//! - 異常系：履歴の取得失敗（空の履歴を送って参加は続行）

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRegistry, DisplayName, MessageRepository, Participant,
    Registration, RoomBroadcaster, RoomId, ServerEvent, SortOrder, SystemNotice, Timestamp,
};

/// 参加処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    pub participant: Participant,
    pub registration: Registration,
    /// 本人に送った履歴の件数
    pub history_len: usize,
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    repository: Arc<dyn MessageRepository>,
    broadcaster: Arc<RoomBroadcaster>,
    clock: Arc<dyn Clock>,
    history_limit: usize,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        repository: Arc<dyn MessageRepository>,
        broadcaster: Arc<RoomBroadcaster>,
        clock: Arc<dyn Clock>,
        history_limit: usize,
    ) -> Self {
        Self {
            registry,
            repository,
            broadcaster,
            clock,
            history_limit,
        }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続
    /// * `name` - 表示名（空なら `Anonymous`）
    /// * `room` - ルーム名（空なら `General`）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        name: Option<&str>,
        room: Option<&str>,
    ) -> JoinedRoom {
        // 1. 既定値の適用（Registry に入れる前に行う）
        let name = DisplayName::from_raw(name);
        let room_id = RoomId::from_raw(room);
        let now = Timestamp::new(self.clock.now_millis());

        // 2. Registry に登録（ルーム移動は Registry 内で原子的に行われる）
        let registration = self
            .registry
            .register(connection_id.clone(), name.clone(), room_id.clone(), now)
            .await;
        let participant = self
            .registry
            .lookup(&connection_id)
            .await
            .unwrap_or_else(|| Participant::new(connection_id.clone(), name, room_id.clone(), now));

        tracing::info!(
            "'{}' ({}) joined room '{}' ({:?})",
            participant.name.as_str(),
            connection_id.as_str(),
            room_id.as_str(),
            registration
        );

        // 3. 旧ルームの参加者一覧を更新
        if let Registration::Switched { from } = &registration {
            self.broadcaster.broadcast_room_users(from).await;
        }

        // 4. 参加通知（再参加では出さない）
        if registration != Registration::Rejoined {
            let notice = SystemNotice::joined(&participant.name, room_id.clone(), now);
            self.broadcaster
                .broadcast_to_room(&room_id, &ServerEvent::System(notice))
                .await;
        }

        // 5. 履歴を本人だけに送る
        let history = self.load_history(&room_id).await;
        let history_len = history.len();
        self.broadcaster
            .unicast(&connection_id, &ServerEvent::ChatHistory(history))
            .await;

        // 6. 参加者一覧をルーム全員に送る
        self.broadcaster.broadcast_room_users(&room_id).await;

        JoinedRoom {
            participant,
            registration,
            history_len,
        }
    }

    async fn load_history(&self, room_id: &RoomId) -> Vec<crate::domain::ChatMessage> {
        match self
            .repository
            .find_by_room(room_id, SortOrder::Ascending, self.history_limit)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    "Failed to load history for room '{}', sending empty history: {}",
                    room_id.as_str(),
                    e
                );
                Vec::new()
            }
        }
    }
}
