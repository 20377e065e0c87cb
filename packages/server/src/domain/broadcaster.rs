//! Room Broadcast Engine
//!
//! ルームに属する接続を Registry のスナップショットで解決し、
//! そのちょうどの集合にイベントを届けます。
//!
//! ## 順序
//!
//! イベントは 1 回だけシリアライズされ、各接続の FIFO チャンネルに 1 パスで積まれる。
//! そのため、ある接続が受け取る順序はこのエンジンが呼ばれた順序と一致する。

use std::sync::Arc;

use super::{ConnectionId, ConnectionRegistry, MessagePusher, RoomId, ServerEvent};

pub struct RoomBroadcaster {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// ルームの全員に送る
    ///
    /// 呼び出し時点の参加者が対象。送信した接続 ID の一覧を返す。
    pub async fn broadcast_to_room(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
    ) -> Vec<ConnectionId> {
        self.fan_out(room_id, None, event).await
    }

    /// 1 つの接続を除いてルームの全員に送る
    pub async fn broadcast_to_room_except(
        &self,
        room_id: &RoomId,
        excluded: &ConnectionId,
        event: &ServerEvent,
    ) -> Vec<ConnectionId> {
        self.fan_out(room_id, Some(excluded), event).await
    }

    /// ルームの参加者一覧をルームの全員に送る
    ///
    /// 一覧の内容と送信先は同じスナップショットから作られる。
    pub async fn broadcast_room_users(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let members = self.registry.members_of(room_id).await;
        let targets: Vec<ConnectionId> = members.iter().map(|p| p.id.clone()).collect();
        if targets.is_empty() {
            return targets;
        }

        let event = ServerEvent::RoomUsers(members);
        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), &event)
            .await
        {
            tracing::warn!(
                "Failed to broadcast room-users to room '{}': {}",
                room_id.as_str(),
                e
            );
        }

        targets
    }

    /// 1 つの接続だけに送る
    ///
    /// 切断済みなどで送れない場合は何もしない（`false` を返す）。
    pub async fn unicast(&self, connection_id: &ConnectionId, event: &ServerEvent) -> bool {
        match self.message_pusher.push_to(connection_id, event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(
                    "Skipped {} for '{}': {}",
                    event.name(),
                    connection_id.as_str(),
                    e
                );
                false
            }
        }
    }

    async fn fan_out(
        &self,
        room_id: &RoomId,
        excluded: Option<&ConnectionId>,
        event: &ServerEvent,
    ) -> Vec<ConnectionId> {
        let targets: Vec<ConnectionId> = self
            .registry
            .members_of(room_id)
            .await
            .into_iter()
            .map(|participant| participant.id)
            .filter(|id| Some(id) != excluded)
            .collect();

        if targets.is_empty() {
            return targets;
        }

        if let Err(e) = self
            .message_pusher
            .broadcast(targets.clone(), event)
            .await
        {
            tracing::warn!(
                "Failed to broadcast {} to room '{}': {}",
                event.name(),
                room_id.as_str(),
                e
            );
        } else {
            tracing::debug!(
                "Broadcasted {} to {} connection(s) in room '{}'",
                event.name(),
                targets.len(),
                room_id.as_str()
            );
        }

        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, MessageId, MessagePushError, MockMessagePusher, Timestamp},
        infrastructure::registry::InMemoryConnectionRegistry,
        test_support::RecordingPusher,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - ルーム単位のファンアウト（broadcast_to_room / broadcast_to_room_except）
    // - 単一接続への送信（unicast）
    //
    // 【なぜこのテストが必要か】
    // - 別ルームへの漏洩がないことはこのシステムの中核となる不変条件
    // - 切断済みの接続への unicast が黙って無視されることを保証する
    // ========================================

    async fn join(registry: &InMemoryConnectionRegistry, id: &str, name: &str, room: &str) {
        registry
            .register(
                ConnectionId::new(id.to_string()).unwrap(),
                DisplayName::from_raw(Some(name)),
                RoomId::from_raw(Some(room)),
                Timestamp::new(1000),
            )
            .await;
    }

    fn typing_event() -> ServerEvent {
        ServerEvent::Typing {
            user: DisplayName::from_raw(Some("Alice")),
            is_typing: true,
        }
    }

    #[tokio::test]
    async fn test_broadcast_to_room_reaches_only_room_members() {
        // テスト項目: ルームの全員に届き、別ルームには届かない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(RecordingPusher::new());
        join(&registry, "a", "Alice", "General").await;
        join(&registry, "b", "Bob", "General").await;
        join(&registry, "c", "Carol", "Random").await;
        let broadcaster = RoomBroadcaster::new(registry.clone(), pusher.clone());

        // when (操作):
        let event = ServerEvent::MessageDeleted {
            id: MessageId::new("m1".to_string()).unwrap(),
        };
        let targets = broadcaster
            .broadcast_to_room(&RoomId::from_raw(Some("General")), &event)
            .await;

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        assert_eq!(pusher.events_for("a").await, vec![event.clone()]);
        assert_eq!(pusher.events_for("b").await, vec![event]);
        assert!(pusher.events_for("c").await.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_to_room_except_skips_excluded() {
        // テスト項目: 除外指定した接続には届かない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(RecordingPusher::new());
        join(&registry, "a", "Alice", "General").await;
        join(&registry, "b", "Bob", "General").await;
        let broadcaster = RoomBroadcaster::new(registry.clone(), pusher.clone());

        // when (操作):
        let excluded = ConnectionId::new("a".to_string()).unwrap();
        let targets = broadcaster
            .broadcast_to_room_except(&RoomId::from_raw(None), &excluded, &typing_event())
            .await;

        // then (期待する結果):
        assert_eq!(targets, vec![ConnectionId::new("b".to_string()).unwrap()]);
        assert!(pusher.events_for("a").await.is_empty());
        assert_eq!(pusher.events_for("b").await, vec![typing_event()]);
    }

    #[tokio::test]
    async fn test_broadcast_room_users_sends_member_list() {
        // テスト項目: 参加者一覧がそのルームの全員に届き、一覧の内容と送信先が一致する
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(RecordingPusher::new());
        join(&registry, "a", "Alice", "General").await;
        join(&registry, "b", "Bob", "General").await;
        join(&registry, "c", "Carol", "Random").await;
        let broadcaster = RoomBroadcaster::new(registry.clone(), pusher.clone());

        // when (操作):
        let targets = broadcaster
            .broadcast_room_users(&RoomId::from_raw(Some("General")))
            .await;

        // then (期待する結果):
        assert_eq!(targets.len(), 2);
        let events = pusher.events_for("b").await;
        let [ServerEvent::RoomUsers(users)] = events.as_slice() else {
            panic!("unexpected events: {events:?}");
        };
        let ids: Vec<&ConnectionId> = users.iter().map(|p| &p.id).collect();
        assert_eq!(ids, targets.iter().collect::<Vec<_>>());
        assert!(pusher.events_for("c").await.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room_does_not_push() {
        // テスト項目: 参加者のいないルームへのブロードキャストは何もしない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let broadcaster = RoomBroadcaster::new(registry, Arc::new(pusher));

        // when (操作):
        let targets = broadcaster
            .broadcast_to_room(&RoomId::from_raw(Some("nobody")), &typing_event())
            .await;

        // then (期待する結果):
        assert!(targets.is_empty());
    }

    #[tokio::test]
    async fn test_unicast_to_unknown_connection_is_silent() {
        // テスト項目: 登録されていない接続への unicast は黙って無視される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .returning(|id, _| Err(MessagePushError::ClientNotFound(id.as_str().to_string())));
        let broadcaster = RoomBroadcaster::new(registry, Arc::new(pusher));

        // when (操作):
        let delivered = broadcaster
            .unicast(
                &ConnectionId::new("gone".to_string()).unwrap(),
                &typing_event(),
            )
            .await;

        // then (期待する結果):
        assert!(!delivered);
    }
}
