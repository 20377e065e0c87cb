//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 並び順
//!
//! ルームごとの索引は追記順で保持し、取得時に (created_at, 追記順) で整列する。
//! 作成時刻の刻印から追記までの間に別のメッセージが割り込んでも、
//! 履歴は作成時刻順に並ぶ。
//!
//! ## tombstone
//!
//! 削除済みのメッセージへの本文更新・リアクション・再削除は、
//! ロックを保持したまま `MessageDeleted` で拒否する。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, DisplayName, Emoji, MessageId, MessageRepository, Reactions, RepositoryError,
    RoomId, SortOrder,
};

#[derive(Debug)]
struct StoredMessage {
    message: ChatMessage,
    seq: u64,
}

#[derive(Debug, Default)]
struct MessageTable {
    messages: HashMap<MessageId, StoredMessage>,
    by_room: HashMap<RoomId, Vec<MessageId>>,
    next_seq: u64,
}

impl MessageTable {
    fn get_mut(&mut self, id: &MessageId) -> Result<&mut ChatMessage, RepositoryError> {
        self.messages
            .get_mut(id)
            .map(|stored| &mut stored.message)
            .ok_or_else(|| RepositoryError::MessageNotFound(id.as_str().to_string()))
    }

    /// tombstone には書き込ませない
    fn get_live_mut(&mut self, id: &MessageId) -> Result<&mut ChatMessage, RepositoryError> {
        let message = self.get_mut(id)?;
        if message.is_deleted() {
            return Err(RepositoryError::MessageDeleted(id.as_str().to_string()));
        }
        Ok(message)
    }
}

/// インメモリ Message Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryMessageRepository {
    table: Mutex<MessageTable>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されているメッセージの件数（tombstone を含む）
    pub async fn count(&self) -> usize {
        let table = self.table.lock().await;
        table.messages.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;

        if table.messages.contains_key(&message.id) {
            return Err(RepositoryError::MessageAlreadyExists(
                message.id.as_str().to_string(),
            ));
        }

        let seq = table.next_seq;
        table.next_seq += 1;
        table
            .by_room
            .entry(message.room_id.clone())
            .or_default()
            .push(message.id.clone());
        table
            .messages
            .insert(message.id.clone(), StoredMessage { message, seq });

        Ok(())
    }

    async fn find_by_room(
        &self,
        room_id: &RoomId,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let table = self.table.lock().await;

        let mut stored: Vec<&StoredMessage> = table
            .by_room
            .get(room_id)
            .into_iter()
            .flatten()
            .filter_map(|id| table.messages.get(id))
            .collect();

        // newest first, then keep the most recent `limit`
        stored.sort_by(|a, b| {
            b.message
                .created_at
                .cmp(&a.message.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });
        stored.truncate(limit);

        if order == SortOrder::Ascending {
            stored.reverse();
        }

        Ok(stored
            .into_iter()
            .map(|stored| stored.message.clone())
            .collect())
    }

    async fn find_by_id(&self, id: &MessageId) -> Result<Option<ChatMessage>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.messages.get(id).map(|stored| stored.message.clone()))
    }

    async fn update_text(&self, id: &MessageId, new_text: String) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        table.get_live_mut(id)?.edit_text(new_text);
        Ok(())
    }

    async fn mark_deleted(&self, id: &MessageId) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;
        table.get_live_mut(id)?.tombstone();
        Ok(())
    }

    async fn set_reaction(
        &self,
        id: &MessageId,
        reactor: DisplayName,
        emoji: Emoji,
    ) -> Result<Reactions, RepositoryError> {
        let mut table = self.table.lock().await;
        let message = table.get_live_mut(id)?;
        message.set_reaction(reactor, emoji);
        Ok(message.reactions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MessageKind, Timestamp};

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 追記・ID 検索・ルーム検索（並び順と件数制限）
    // - 本文更新・tombstone 化・リアクション設定
    // - 存在しない ID / 重複 ID のエラー
    // - tombstone への書き込みの拒否
    //
    // 【なぜこのテストが必要か】
    // - 履歴の再生はこのストアの並び順に依存する
    // - 編集・削除・リアクションの整合性はストアの原子的な更新に依存する
    // ========================================

    fn message(id: &str, room: &str, text: &str, created_at: i64) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(id.to_string()).unwrap(),
            room_id: RoomId::from_raw(Some(room)),
            sender_name: DisplayName::from_raw(Some("Alice")),
            sender_id: ConnectionId::new("conn-a".to_string()).unwrap(),
            kind: MessageKind::Text,
            text: Some(text.to_string()),
            file: None,
            created_at: Timestamp::new(created_at),
            reply_to: None,
            reactions: Reactions::new(),
            edited: false,
        }
    }

    fn id(value: &str) -> MessageId {
        MessageId::new(value.to_string()).unwrap()
    }

    fn texts(messages: &[ChatMessage]) -> Vec<&str> {
        messages
            .iter()
            .map(|m| m.text.as_deref().unwrap_or_default())
            .collect()
    }

    #[tokio::test]
    async fn test_append_and_find_by_id() {
        // テスト項目: 追記したメッセージを ID で取得できる
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();

        // when (操作):
        repo.append(message("m1", "General", "hi", 1000)).await.unwrap();
        let found = repo.find_by_id(&id("m1")).await.unwrap();

        // then (期待する結果):
        assert_eq!(found.unwrap().text.as_deref(), Some("hi"));
        assert_eq!(repo.find_by_id(&id("unknown")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_append_duplicate_id_is_rejected() {
        // テスト項目: 同じ ID の追記はエラーになり、元のメッセージは変わらない
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(message("m1", "General", "first", 1000))
            .await
            .unwrap();

        // when (操作):
        let result = repo.append(message("m1", "General", "second", 2000)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::MessageAlreadyExists("m1".to_string()))
        );
        let found = repo.find_by_id(&id("m1")).await.unwrap().unwrap();
        assert_eq!(found.text.as_deref(), Some("first"));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_find_by_room_orders_and_limits() {
        // テスト項目: ルームの最新 N 件が作成時刻の昇順で返され、他のルームは含まれない
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(message("m3", "General", "third", 3000)).await.unwrap();
        repo.append(message("m1", "General", "first", 1000)).await.unwrap();
        repo.append(message("m2", "General", "second", 2000)).await.unwrap();
        repo.append(message("x1", "Random", "other", 1500)).await.unwrap();

        // when (操作):
        let all = repo
            .find_by_room(&RoomId::from_raw(Some("General")), SortOrder::Ascending, 200)
            .await
            .unwrap();
        let latest_two = repo
            .find_by_room(&RoomId::from_raw(Some("General")), SortOrder::Ascending, 2)
            .await
            .unwrap();
        let newest_first = repo
            .find_by_room(&RoomId::from_raw(Some("General")), SortOrder::Descending, 2)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(texts(&all), vec!["first", "second", "third"]);
        assert_eq!(texts(&latest_two), vec!["second", "third"]);
        assert_eq!(texts(&newest_first), vec!["third", "second"]);
    }

    #[tokio::test]
    async fn test_update_text_marks_edited() {
        // テスト項目: 本文を更新すると編集済みになり、ID は変わらない
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(message("m1", "General", "hi", 1000)).await.unwrap();

        // when (操作):
        repo.update_text(&id("m1"), "hello".to_string()).await.unwrap();

        // then (期待する結果):
        let found = repo.find_by_id(&id("m1")).await.unwrap().unwrap();
        assert_eq!(found.text.as_deref(), Some("hello"));
        assert!(found.edited);
        assert_eq!(found.id, id("m1"));
    }

    #[tokio::test]
    async fn test_update_text_unknown_id() {
        // テスト項目: 存在しない ID の更新は NotFound になる
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();

        // when (操作):
        let result = repo.update_text(&id("nope"), "x".to_string()).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::MessageNotFound("nope".to_string()))
        );
    }

    #[tokio::test]
    async fn test_mark_deleted_keeps_tombstone_in_history() {
        // テスト項目: 削除したメッセージは tombstone として履歴に残る
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(message("m1", "General", "secret", 1000))
            .await
            .unwrap();

        // when (操作):
        repo.mark_deleted(&id("m1")).await.unwrap();

        // then (期待する結果):
        let found = repo.find_by_id(&id("m1")).await.unwrap().unwrap();
        assert_eq!(found.kind, MessageKind::Deleted);
        assert_eq!(found.text, None);
        let history = repo
            .find_by_room(&RoomId::from_raw(Some("General")), SortOrder::Ascending, 10)
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_deleted());
    }

    #[tokio::test]
    async fn test_set_reaction_last_write_wins() {
        // テスト項目: 同じ人のリアクションは上書きされ、他の人のリアクションは残る
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(message("m1", "General", "hi", 1000)).await.unwrap();
        let bob = DisplayName::from_raw(Some("Bob"));
        let carol = DisplayName::from_raw(Some("Carol"));

        // when (操作):
        repo.set_reaction(&id("m1"), bob.clone(), Emoji::new("👍".to_string()).unwrap())
            .await
            .unwrap();
        repo.set_reaction(&id("m1"), carol.clone(), Emoji::new("😂".to_string()).unwrap())
            .await
            .unwrap();
        let reactions = repo
            .set_reaction(&id("m1"), bob.clone(), Emoji::new("❤️".to_string()).unwrap())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(reactions.len(), 2);
        assert_eq!(reactions[&bob].as_str(), "❤️");
        assert_eq!(reactions[&carol].as_str(), "😂");
    }

    #[tokio::test]
    async fn test_writes_to_tombstone_are_rejected() {
        // テスト項目: 削除済みのメッセージには本文もリアクションも書き戻せない
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.append(message("m1", "General", "secret", 1000))
            .await
            .unwrap();
        repo.mark_deleted(&id("m1")).await.unwrap();

        // when (操作):
        let update = repo.update_text(&id("m1"), "back".to_string()).await;
        let react = repo
            .set_reaction(
                &id("m1"),
                DisplayName::from_raw(Some("Bob")),
                Emoji::new("x".to_string()).unwrap(),
            )
            .await;
        let delete_again = repo.mark_deleted(&id("m1")).await;

        // then (期待する結果):
        let deleted = Err(RepositoryError::MessageDeleted("m1".to_string()));
        assert_eq!(update, deleted);
        assert_eq!(react, Err(RepositoryError::MessageDeleted("m1".to_string())));
        assert_eq!(delete_again, deleted);

        let found = repo.find_by_id(&id("m1")).await.unwrap().unwrap();
        assert_eq!(found.kind, MessageKind::Deleted);
        assert_eq!(found.text, None);
        assert!(found.reactions.is_empty());
        assert!(!found.edited);
    }
}
