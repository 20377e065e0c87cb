//! Repository trait 定義
//!
//! ドメイン層が必要とするメッセージストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatMessage, DisplayName, Emoji, MessageId, Reactions, RepositoryError, RoomId};

/// 取得時の並び順（作成時刻基準）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Message Repository trait
///
/// キー順に追記・検索できる外部ストアの抽象。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追記する（ID が重複していればエラー）
    async fn append(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// ルームの最新 `limit` 件を `order` の順で取得する
    async fn find_by_room(
        &self,
        room_id: &RoomId,
        order: SortOrder,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// ID でメッセージを取得する
    async fn find_by_id(&self, id: &MessageId) -> Result<Option<ChatMessage>, RepositoryError>;

    /// 本文を更新し、編集済みにする
    async fn update_text(&self, id: &MessageId, new_text: String) -> Result<(), RepositoryError>;

    /// tombstone にする
    async fn mark_deleted(&self, id: &MessageId) -> Result<(), RepositoryError>;

    /// リアクションを設定し、更新後のリアクション全体を返す
    async fn set_reaction(
        &self,
        id: &MessageId,
        reactor: DisplayName,
        emoji: Emoji,
    ) -> Result<Reactions, RepositoryError>;
}
